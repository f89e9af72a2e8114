use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::PositionResult;
use crate::engine::{calculate_tax, TaxBreakdown, TaxSettings};
use crate::error::AppError;

/// Recompute tax for an already-matched position set, e.g. after the user
/// moves a rate slider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRequest {
    pub positions: Vec<PositionResult>,
    pub settings: Option<TaxSettings>,
}

pub async fn post_tax(
    State(state): State<AppState>,
    Json(request): Json<TaxRequest>,
) -> Result<Json<TaxBreakdown>, AppError> {
    let settings = request.settings.unwrap_or(state.config.default_tax);
    settings.validate()?;

    Ok(Json(calculate_tax(&request.positions, &settings)))
}
