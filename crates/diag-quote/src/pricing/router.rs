use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{JobType, PropertyType, Purpose, ScalingMethod};
use super::engine::QuoteEngine;
use super::quote::{QuoteRequest, QuoteResult};
use super::selection::{selectable_diagnostics, DiagnosticSelection, SelectableDiagnostic};
use crate::presentation::Breakdown;

/// Quote request as sent by form clients. The scaling method falls back to
/// the engine default and the selection gets the purpose rules applied.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotePayload {
    pub area: f64,
    pub purpose: Purpose,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub selected_diagnostic_ids: Vec<String>,
    #[serde(default)]
    pub agent_exempt: bool,
    #[serde(default)]
    pub studette_override: bool,
    #[serde(default)]
    pub scaling_method: Option<ScalingMethod>,
}

impl QuotePayload {
    pub fn into_request(self, default_scaling: ScalingMethod) -> QuoteRequest {
        let selection: DiagnosticSelection = self.selected_diagnostic_ids.into_iter().collect();

        QuoteRequest {
            area: self.area.max(0.0),
            purpose: self.purpose,
            job_type: self.job_type,
            property_type: self.property_type,
            selected_diagnostic_ids: selection.effective_ids(self.purpose),
            agent_exempt: self.agent_exempt,
            studette_override: self.studette_override,
            scaling_method: self.scaling_method.unwrap_or(default_scaling),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: QuoteResult,
    pub breakdown: Breakdown,
}

impl QuoteResponse {
    pub fn new(quote: QuoteResult) -> Self {
        let breakdown = Breakdown::from_result(&quote);
        Self { quote, breakdown }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogQuery {
    #[serde(default)]
    purpose: Option<Purpose>,
}

/// Router builder exposing the pricing engine over HTTP.
pub fn quote_router(engine: Arc<QuoteEngine>) -> Router {
    Router::new()
        .route("/api/v1/quotes", post(quote_handler))
        .route("/api/v1/diagnostics", get(catalog_handler))
        .with_state(engine)
}

pub(crate) async fn quote_handler(
    State(engine): State<Arc<QuoteEngine>>,
    Json(payload): Json<QuotePayload>,
) -> Json<QuoteResponse> {
    let request = payload.into_request(engine.default_scaling());
    Json(QuoteResponse::new(engine.quote(&request)))
}

pub(crate) async fn catalog_handler(
    State(engine): State<Arc<QuoteEngine>>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<SelectableDiagnostic>> {
    let purpose = query.purpose.unwrap_or(Purpose::Rent);
    Json(selectable_diagnostics(
        engine.config().catalog(),
        purpose,
        &DiagnosticSelection::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::tables::PriceConfiguration;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn engine() -> Arc<QuoteEngine> {
        Arc::new(QuoteEngine::new(Arc::new(PriceConfiguration::seeded())))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[test]
    fn payload_applies_selection_rules_and_default_scaling() {
        let payload: QuotePayload = serde_json::from_value(json!({
            "area": -5.0,
            "purpose": "rent",
            "selected_diagnostic_ids": ["TERMITES", "DPE"]
        }))
        .expect("payload parses");

        let request = payload.into_request(ScalingMethod::Alternate);

        assert_eq!(request.area, 0.0);
        assert_eq!(request.scaling_method, ScalingMethod::Alternate);
        assert!(!request.selected_diagnostic_ids.contains("TERMITES"));
        assert!(request.selected_diagnostic_ids.contains("DPE"));
    }

    #[tokio::test]
    async fn quote_route_returns_total_and_breakdown() {
        let request = Request::post("/api/v1/quotes")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "area": 60.0,
                    "purpose": "rent",
                    "selected_diagnostic_ids": ["AMIANTE", "DPE"]
                })
                .to_string(),
            ))
            .expect("request builds");

        let response = quote_router(engine())
            .oneshot(request)
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], json!(180.0));
        assert_eq!(body["pack_summary"]["bundle_used"], json!(true));
        assert_eq!(body["breakdown"]["total"], json!("180.00"));
    }

    #[tokio::test]
    async fn catalog_route_flags_rent_only_restrictions() {
        let request = Request::get("/api/v1/diagnostics?purpose=rent")
            .body(Body::empty())
            .expect("request builds");

        let response = quote_router(engine())
            .oneshot(request)
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let entries = body.as_array().expect("array body");
        assert_eq!(entries.len(), 8);
        let termites = entries
            .iter()
            .find(|entry| entry["id"] == "TERMITES")
            .expect("termites listed");
        assert_eq!(termites["disabled"], json!(true));
    }
}
