use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::AppState;
use crate::datasource::{parse_trade_csv, ParseError};
use crate::domain::{Decimal, PositionResult};
use crate::engine::{
    analyze, calculate_tax, AggregateMetrics, TaxBreakdown, TaxSettings,
    DEFAULT_RECENT_POSITIONS,
};
use crate::error::AppError;

/// Optional per-request overrides of the configured tax assumptions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxQuery {
    pub short_term_rate: Option<String>,
    pub long_term_rate: Option<String>,
    pub threshold_days: Option<String>,
}

impl TaxQuery {
    /// Merge onto `defaults`, validating the result.
    pub fn resolve(&self, defaults: TaxSettings) -> Result<TaxSettings, AppError> {
        let settings = TaxSettings::new(
            override_decimal(self.short_term_rate.as_deref(), defaults.short_term_rate, "shortTermRate")?,
            override_decimal(self.long_term_rate.as_deref(), defaults.long_term_rate, "longTermRate")?,
            override_decimal(self.threshold_days.as_deref(), defaults.threshold_days, "thresholdDays")?,
        );
        settings.validate()?;
        Ok(settings)
    }
}

fn override_decimal(raw: Option<&str>, default: Decimal, name: &str) -> Result<Decimal, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Decimal::from_str_canonical(s)
            .map_err(|_| AppError::BadRequest(format!("Invalid {}", name))),
        None => Ok(default),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    pub metrics: AggregateMetrics,
    pub settings: TaxSettings,
    pub tax: TaxBreakdown,
    pub recent_positions: Vec<PositionResult>,
}

/// Parse CSV text and compute metrics and tax in one pass.
///
/// Either the entire CSV is used or none of it is.
pub fn build_report(csv: &str, settings: TaxSettings) -> Result<ReportResponse, ParseError> {
    let records = parse_trade_csv(csv)?;
    let metrics = analyze(records);
    let tax = calculate_tax(&metrics.positions, &settings);
    let recent_positions = metrics.recent_positions(DEFAULT_RECENT_POSITIONS);

    Ok(ReportResponse {
        dataset: None,
        metrics,
        settings,
        tax,
        recent_positions,
    })
}

pub async fn post_report(
    Query(params): Query<TaxQuery>,
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ReportResponse>, AppError> {
    let settings = params.resolve(state.config.default_tax)?;
    let report = build_report(&body, settings)?;

    info!(
        trades = report.metrics.timeframe.trade_count,
        positions = report.metrics.positions.len(),
        "built report from upload"
    );
    Ok(Json(report))
}

pub async fn get_sample_report(
    Query(params): Query<TaxQuery>,
    State(state): State<AppState>,
) -> Result<Json<ReportResponse>, AppError> {
    let source = state
        .sample_source
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Sample data is not configured".to_string()))?;
    let settings = params.resolve(state.config.default_tax)?;

    let text = source.load().await?;
    let mut report = build_report(&text, settings)?;
    report.dataset = Some(source.name());

    info!(
        dataset = %source.name(),
        trades = report.metrics.timeframe.trade_count,
        "built report from sample data"
    );
    Ok(Json(report))
}
