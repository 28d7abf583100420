//! Trade potential HTTP handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::trade_potential::{PotentialSummary, ScoredPotential, TradePotentialService};
use crate::AppState;

/// List derived trade potentials, hottest first
pub async fn list_trade_potentials(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ScoredPotential>>> {
    let service = TradePotentialService::new(state.db);
    let potentials = service
        .get_trade_potentials(current_user.0.business_id)
        .await?;
    Ok(Json(potentials))
}

/// Aggregate counts across the current potential board
pub async fn get_potential_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<PotentialSummary>> {
    let service = TradePotentialService::new(state.db);
    let summary = service.get_summary(current_user.0.business_id).await?;
    Ok(Json(summary))
}
