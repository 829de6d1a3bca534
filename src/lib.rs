use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod rfo;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::rfo::handlers::generate_ticket,
        crate::rfo::handlers::compute_metrics,
        crate::rfo::handlers::preview_report,
        crate::rfo::handlers::create_report,
        crate::rfo::handlers::create_report_upload,
        crate::rfo::handlers::upload_logo,
        crate::rfo::handlers::get_logo,
        crate::rfo::handlers::delete_logo
    ),
    components(
        schemas(
            rfo::models::RfoForm,
            rfo::models::MetricsRequest,
            rfo::models::TicketResponse,
            rfo::metrics::MetricsResponse,
            rfo::report::ReportDocument,
            rfo::report::ReportSection,
            rfo::report::ReportField,
            rfo::render::RenderStrategy,
            rfo::handlers::ReportUploadRequest,
            rfo::handlers::LogoUploadRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "RFO Service", description = "Reason For Outage report endpoints.")
    )
)]
pub struct ApiDoc;

/// Start the HTTP server with the given configuration.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let bind = (config.host.clone(), config.port);
    let allowed_origins = if config.allowed_origins.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        config.allowed_origins.clone()
    };

    log::info!("Default renderer: {}", config.renderer);
    let app_state = web::Data::new(AppState::new(config));

    let prometheus = PrometheusMetricsBuilder::new("rfo_generator")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("failed to create Prometheus middleware: {}", e)))?;

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![
                header::CONTENT_DISPOSITION,
                header::HeaderName::from_static(rfo::handlers::TICKET_HEADER),
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(web::scope("/api").configure(rfo::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind)?
    .run()
    .await
}
