use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use diag_quote::error::AppError;
use diag_quote::presentation::{DocumentFill, InvoiceDetails};
use diag_quote::pricing::{quote_router, QuoteEngine, QuotePayload, QuoteResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteDocumentRequest {
    pub(crate) quote: QuotePayload,
    pub(crate) invoice: InvoiceDetails,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteDocumentResponse {
    pub(crate) quote: QuoteResponse,
    pub(crate) document: DocumentFill,
}

pub(crate) fn with_quote_routes(engine: Arc<QuoteEngine>) -> axum::Router {
    quote_router(engine.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/quotes/document",
            axum::routing::post(quote_document_endpoint),
        )
        .layer(Extension(engine))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn quote_document_endpoint(
    Extension(engine): Extension<Arc<QuoteEngine>>,
    Json(payload): Json<QuoteDocumentRequest>,
) -> Result<Json<QuoteDocumentResponse>, AppError> {
    let QuoteDocumentRequest {
        quote,
        invoice,
        today,
    } = payload;

    let request = quote.into_request(engine.default_scaling());
    let result = engine.quote(&request);
    let invoice = invoice.with_quote_suggestions(&request, &result);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let document = DocumentFill::build(&result, &invoice, today)?;

    info!(file = %document.file_name, total = result.total, "quote document prepared");

    Ok(Json(QuoteDocumentResponse {
        quote: QuoteResponse::new(result),
        document,
    }))
}
