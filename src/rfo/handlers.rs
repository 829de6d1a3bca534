use actix_multipart::Multipart;
use actix_web::http::header::{
    ContentDisposition, DispositionParam, DispositionType, HeaderValue,
};
use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info, warn};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::logo::{Logo, LogoError};
use super::metrics::{DerivedMetrics, MetricsResponse};
use super::models::{MetricsRequest, RfoForm, TicketResponse};
use super::multipart_parser::MultipartParser;
use super::render::common::decode_logo;
use super::render::{renderer_for, RenderStrategy, UnknownStrategy};
use super::report::{ReportDocument, ReportRecord};
use crate::state::AppState;
use crate::ErrorResponse;

pub const TICKET_HEADER: &str = "x-nomor-tiket";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RenderQuery {
    /// canvas, flow or template. Defaults to the configured renderer.
    pub renderer: Option<String>,
}

impl RenderQuery {
    fn strategy(&self, default: RenderStrategy) -> Result<RenderStrategy, HttpResponse> {
        match self.renderer.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse().map_err(|e: UnknownStrategy| {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()))
            }),
        }
    }
}

/// Multipart body accepted by `/rfo/report/upload`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportUploadRequest {
    /// RfoForm as JSON. Individual form fields may also be sent as text parts.
    #[allow(unused)]
    pub metadata: Option<String>,
    #[allow(unused)]
    pub logo: Option<Vec<u8>>,
}

/// Multipart body accepted by `PUT /rfo/logo`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LogoUploadRequest {
    #[allow(unused)]
    pub logo: Vec<u8>,
}

fn logo_error_response(err: LogoError) -> HttpResponse {
    match err {
        LogoError::Invalid(message) => {
            warn!("Rejected logo upload: {}", message);
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message))
        }
        other => {
            error!("Logo storage failed: {}", other);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to access logo storage"))
        }
    }
}

/// The current logo, if one is stored and still decodes.
async fn stored_logo(state: &AppState) -> Option<Logo> {
    let logo = match state.logo_store.load_current().await {
        Ok(logo) => logo?,
        Err(e) => {
            warn!("Could not load stored logo, rendering without it: {}", e);
            return None;
        }
    };

    match decode_logo(&logo.data, logo.format) {
        Ok(_) => Some(logo),
        Err(e) => {
            warn!("Stored logo is unreadable, rendering without it: {}", e);
            None
        }
    }
}

async fn render_report(
    state: &AppState,
    form: RfoForm,
    uploaded_logo: Option<Logo>,
    strategy: RenderStrategy,
) -> HttpResponse {
    let record = ReportRecord::assemble(form, &state.tickets);
    let ticket = record.form.nomor_tiket.clone();
    let document = record.to_document();

    let logo = match uploaded_logo {
        Some(logo) => Some(logo),
        None => stored_logo(state).await,
    };

    let renderer = match renderer_for(strategy, &state.config) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("Failed to initialise {} renderer: {}", strategy, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to initialise renderer"));
        }
    };

    debug!(
        "Rendering report {} with {} renderer (logo: {})",
        ticket,
        strategy,
        logo.is_some()
    );
    let rendered = match web::block(move || renderer.render(&document, logo.as_ref())).await {
        Ok(Ok(rendered)) => rendered,
        Ok(Err(e)) => {
            error!("Failed to render report {}: {}", ticket, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to render report"));
        }
        Err(e) => {
            error!("Render task failed for report {}: {}", ticket, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to render report"));
        }
    };

    info!(
        "Report {} rendered with {} ({} bytes)",
        ticket,
        strategy,
        rendered.pdf.len()
    );

    let mut response = HttpResponse::Ok();
    response
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(rendered.filename.clone())],
        });
    if let Ok(value) = HeaderValue::from_str(&ticket) {
        response.insert_header((TICKET_HEADER, value));
    }
    response.body(rendered.pdf)
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    get,
    path = "/rfo/ticket",
    responses(
        (status = 200, description = "Freshly generated ticket number", body = TicketResponse)
    )
)]
pub async fn generate_ticket(data: web::Data<AppState>) -> impl Responder {
    let nomor_tiket = data.tickets.generate();
    debug!("Generated ticket {}", nomor_tiket);
    HttpResponse::Ok().json(TicketResponse { nomor_tiket })
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    post,
    path = "/rfo/metrics",
    request_body = MetricsRequest,
    responses(
        (status = 200, description = "MTTR and SLA, or sentinel values if the timestamps are malformed", body = MetricsResponse)
    )
)]
pub async fn compute_metrics(req: web::Json<MetricsRequest>) -> impl Responder {
    let metrics = DerivedMetrics::from_logs(&req.log_down, &req.log_up);
    HttpResponse::Ok().json(MetricsResponse::from(&metrics))
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    post,
    path = "/rfo/preview",
    request_body = RfoForm,
    responses(
        (status = 200, description = "Assembled report document", body = ReportDocument)
    )
)]
pub async fn preview_report(
    req: web::Json<RfoForm>,
    data: web::Data<AppState>,
) -> impl Responder {
    let record = ReportRecord::assemble(req.into_inner(), &data.tickets);
    HttpResponse::Ok().json(record.to_document())
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    post,
    path = "/rfo/report",
    request_body = RfoForm,
    params(RenderQuery),
    responses(
        (status = 200, description = "RFO_Report.pdf as application/pdf attachment"),
        (status = 400, description = "Unknown renderer", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn create_report(
    req: web::Json<RfoForm>,
    query: web::Query<RenderQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing create_report handler");
    let strategy = match query.strategy(data.config.renderer) {
        Ok(strategy) => strategy,
        Err(resp) => return resp,
    };
    render_report(&data, req.into_inner(), None, strategy).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    post,
    path = "/rfo/report/upload",
    request_body(content = inline(ReportUploadRequest), content_type = "multipart/form-data"),
    params(RenderQuery),
    responses(
        (status = 200, description = "RFO_Report.pdf as application/pdf attachment"),
        (status = 400, description = "Invalid form or unsupported logo", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn create_report_upload(
    payload: Multipart,
    query: web::Query<RenderQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing create_report_upload handler");
    let strategy = match query.strategy(data.config.renderer) {
        Ok(strategy) => strategy,
        Err(resp) => return resp,
    };

    let parsed = match MultipartParser::parse_report_multipart(payload).await {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Failed to parse report upload: {}", e);
            return HttpResponse::from(e);
        }
    };

    let logo = match parsed.logo {
        Some(upload) => match Logo::from_upload(&upload.filename, upload.data) {
            Ok(logo) => Some(logo),
            Err(e) => return logo_error_response(e),
        },
        None => None,
    };

    render_report(&data, parsed.form, logo, strategy).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    put,
    path = "/rfo/logo",
    request_body(content = inline(LogoUploadRequest), content_type = "multipart/form-data"),
    responses(
        (status = 204, description = "Logo stored as the current logo"),
        (status = 400, description = "Unsupported logo", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_logo(payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    let upload = match MultipartParser::parse_logo_multipart(payload).await {
        Ok(upload) => upload,
        Err(e) => {
            error!("Failed to parse logo upload: {}", e);
            return HttpResponse::from(e);
        }
    };

    let logo = match Logo::from_upload(&upload.filename, upload.data) {
        Ok(logo) => logo,
        Err(e) => return logo_error_response(e),
    };

    match data.logo_store.save_current(&logo).await {
        Ok(()) => {
            info!("Stored {} logo ({} bytes)", logo.format.label(), logo.data.len());
            HttpResponse::NoContent().finish()
        }
        Err(e) => logo_error_response(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    get,
    path = "/rfo/logo",
    responses(
        (status = 200, description = "Current logo image (image/png or image/jpeg)"),
        (status = 404, description = "No logo stored", body = ErrorResponse)
    )
)]
pub async fn get_logo(data: web::Data<AppState>) -> impl Responder {
    match data.logo_store.load_current().await {
        Ok(Some(logo)) => HttpResponse::Ok()
            .content_type(logo.format.mime_type())
            .body(logo.data),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::not_found("No logo stored")),
        Err(e) => logo_error_response(e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "RFO Service",
    delete,
    path = "/rfo/logo",
    responses(
        (status = 204, description = "Current logo removed"),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_logo(data: web::Data<AppState>) -> impl Responder {
    match data.logo_store.clear().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => logo_error_response(e),
    }
}

/// Register the RFO routes; mount inside the `/api` scope.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/rfo/ticket").route(web::get().to(generate_ticket)))
        .service(web::resource("/rfo/metrics").route(web::post().to(compute_metrics)))
        .service(web::resource("/rfo/preview").route(web::post().to(preview_report)))
        .service(web::resource("/rfo/report").route(web::post().to(create_report)))
        .service(web::resource("/rfo/report/upload").route(web::post().to(create_report_upload)))
        .service(
            web::resource("/rfo/logo")
                .route(web::get().to(get_logo))
                .route(web::put().to(upload_logo))
                .route(web::delete().to(delete_logo)),
        );
}
