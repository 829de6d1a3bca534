//! Document renderers - turn an assembled [`ReportDocument`] into PDF bytes.
//!
//! Three interchangeable strategies:
//! - `canvas` - fixed-coordinate drawing with printpdf
//! - `flow` - wrapped label/value table with pagination and a signature block
//! - `template` - Typst template compiled by the external `typst` CLI

pub mod canvas;
pub mod common;
pub mod flow;
pub mod template;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::logo::Logo;
use super::report::{ReportDocument, REPORT_FILENAME};
use crate::config::AppConfig;

pub use canvas::CanvasRenderer;
pub use flow::FlowRenderer;
pub use template::TemplateRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to build PDF: {0}")]
    Pdf(String),
    #[error("failed to embed logo: {0}")]
    Logo(String),
    #[error("failed to load Typst template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful render.
#[derive(Debug)]
pub struct RenderedReport {
    pub filename: String,
    pub pdf: Vec<u8>,
}

impl RenderedReport {
    pub fn new(pdf: Vec<u8>) -> Self {
        Self {
            filename: REPORT_FILENAME.to_string(),
            pdf,
        }
    }
}

pub trait DocumentRenderer {
    fn render(
        &self,
        document: &ReportDocument,
        logo: Option<&Logo>,
    ) -> Result<RenderedReport, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    Canvas,
    Flow,
    Template,
}

impl RenderStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Flow => "flow",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown renderer '{0}', expected canvas, flow or template")]
pub struct UnknownStrategy(pub String);

impl FromStr for RenderStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canvas" => Ok(Self::Canvas),
            "flow" | "table" => Ok(Self::Flow),
            "template" | "typst" => Ok(Self::Template),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Build the renderer for `strategy`.
pub fn renderer_for(
    strategy: RenderStrategy,
    config: &AppConfig,
) -> Result<Box<dyn DocumentRenderer + Send>, RenderError> {
    Ok(match strategy {
        RenderStrategy::Canvas => Box::new(CanvasRenderer),
        RenderStrategy::Flow => Box::new(FlowRenderer::default()),
        RenderStrategy::Template => Box::new(TemplateRenderer::new(config.typst_bin.clone())?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("canvas".parse::<RenderStrategy>().unwrap(), RenderStrategy::Canvas);
        assert_eq!(" Flow ".parse::<RenderStrategy>().unwrap(), RenderStrategy::Flow);
        assert_eq!("typst".parse::<RenderStrategy>().unwrap(), RenderStrategy::Template);
        assert!("html".parse::<RenderStrategy>().is_err());
    }

    #[test]
    fn test_strategy_serde() {
        let json = serde_json::to_string(&RenderStrategy::Template).unwrap();
        assert_eq!(json, "\"template\"");
    }
}
