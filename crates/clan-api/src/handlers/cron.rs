//! Scheduler trigger
//!
//! Called by the external scheduler to sweep every configured group.

use axum::{extract::State, Json};
use clan_service::{SweepReport, SweepService};

use crate::extractors::CronAuth;
use crate::state::AppState;

/// Run a sweep over all configured groups
///
/// POST /cron/sweep (GET is accepted for schedulers that only issue GETs)
///
/// Always 200 once authenticated; per-group failures are in the report.
pub async fn sweep(State(state): State<AppState>, _auth: CronAuth) -> Json<SweepReport> {
    Json(SweepService::new(state.service_context()).sweep().await)
}
