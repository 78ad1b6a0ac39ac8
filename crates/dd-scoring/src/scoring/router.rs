use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use super::domain::PropertyDescriptor;
use super::engine::ScoringEngine;
use super::report::ReportMeta;
use super::tables::{BuildingCategory, JurisdictionRecord};

/// Router builder exposing the scoring endpoints.
pub fn scoring_router(engine: Arc<ScoringEngine>) -> Router {
    Router::new()
        .route("/api/v1/scoring/occupancy", post(occupancy_handler))
        .route(
            "/api/v1/scoring/jurisdictions/:code",
            get(jurisdiction_handler),
        )
        .route("/api/v1/scoring/report", post(report_handler))
        .route("/api/v1/scoring/rules", get(rules_handler))
        .with_state(engine)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub property: PropertyDescriptor,
    #[serde(default)]
    pub jurisdiction_code: String,
    #[serde(flatten)]
    pub meta: ReportMeta,
}

/// Listing of the active rule tables.
#[derive(Debug, Serialize)]
pub struct RulesView<'a> {
    pub rules_version: &'a str,
    pub tier_map: [u8; 8],
    pub categories: Vec<&'a BuildingCategory>,
    pub jurisdictions: Vec<&'a JurisdictionRecord>,
}

impl<'a> RulesView<'a> {
    pub fn from_engine(engine: &'a ScoringEngine) -> Self {
        let rules = engine.rules();
        Self {
            rules_version: rules.version(),
            tier_map: engine.tier_map().levels(),
            categories: rules.categories().iter().collect(),
            jurisdictions: rules.jurisdictions().iter().collect(),
        }
    }
}

pub(crate) async fn occupancy_handler(
    State(engine): State<Arc<ScoringEngine>>,
    Json(descriptor): Json<PropertyDescriptor>,
) -> Response {
    let result = engine.score_occupancy(&descriptor);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn jurisdiction_handler(
    State(engine): State<Arc<ScoringEngine>>,
    Path(code): Path<String>,
) -> Response {
    let result = engine.score_jurisdiction(&code);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn report_handler(
    State(engine): State<Arc<ScoringEngine>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    let meta = request.meta.dated_or(Local::now().date_naive());
    let report = engine.report(&request.property, &request.jurisdiction_code, &meta);
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn rules_handler(State(engine): State<Arc<ScoringEngine>>) -> Response {
    let view = RulesView::from_engine(&engine);
    (StatusCode::OK, Json(view)).into_response()
}
