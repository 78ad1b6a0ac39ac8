use chrono::NaiveDate;
use dd_scoring::config::AppConfig;
use dd_scoring::error::AppError;
use dd_scoring::scoring::{ConstraintKind, ScoringEngine};
use dd_scoring::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration, start logging and build the engine from the configured tables.
pub(crate) fn bootstrap(
    apply: impl FnOnce(&mut AppConfig),
) -> Result<(AppConfig, ScoringEngine), AppError> {
    let mut config = AppConfig::load()?;
    apply(&mut config);

    telemetry::init(&config.telemetry)?;

    let engine = ScoringEngine::from_config(&config.rules)?;
    info!(
        rules_version = %engine.rules().version(),
        tier_map = %engine.tier_map(),
        cache = engine.cache().is_some(),
        "scoring engine ready"
    );

    Ok((config, engine))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_constraint(raw: &str) -> Result<ConstraintKind, String> {
    raw.parse::<ConstraintKind>().map_err(|err| err.to_string())
}
