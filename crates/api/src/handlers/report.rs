//! Handlers for the `/reports` resource.
//!
//! Aggregates are computed in SQL per request; the low-stock and
//! expiring-soon windows come from the company's alert-settings defaults.

use axum::extract::State;
use axum::Json;
use estoca_db::models::product::{CategoryBreakdown, ReportSummary};
use estoca_db::repositories::{AlertSettingsRepo, ProductRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reports/summary
pub async fn summary(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReportSummary>>> {
    let settings = AlertSettingsRepo::get_or_create(&state.pool, auth.company_id).await?;
    let summary = ProductRepo::report_summary(
        &state.pool,
        auth.company_id,
        settings.low_stock_default,
        settings.expiry_days_default,
    )
    .await?;
    Ok(Json(DataResponse::new(summary)))
}

/// GET /api/v1/reports/by-category
pub async fn by_category(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryBreakdown>>>> {
    let breakdown = ProductRepo::report_by_category(&state.pool, auth.company_id).await?;
    Ok(Json(DataResponse::new(breakdown)))
}
