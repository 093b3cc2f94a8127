//! Handlers for the `/billing` resource: plans, subscription, limits.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use estoca_core::billing::{LimitDecision, LimitKind};
use estoca_core::error::CoreError;
use estoca_core::DbId;
use estoca_db::models::plan::Plan;
use estoca_db::repositories::{PlanRepo, SubscriptionRepo};
use serde::Deserialize;

use crate::billing::check_limit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /billing/subscription`.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan_id: DbId,
}

/// Query parameters for `GET /billing/limits`.
#[derive(Debug, Deserialize)]
pub struct LimitsQuery {
    /// `products` or `users`.
    pub kind: String,
}

/// GET /api/v1/billing/plans
pub async fn list_plans(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Plan>>>> {
    let plans = PlanRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(plans)))
}

/// GET /api/v1/billing/subscription
///
/// The effective plan plus the active subscription row, which is `null` for
/// companies riding the free fallback.
pub async fn get_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let plan = SubscriptionRepo::resolve_plan(&state.pool, auth.company_id).await?;
    let subscription = SubscriptionRepo::find_active(&state.pool, auth.company_id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "plan": plan,
            "subscription": subscription,
        }
    })))
}

/// PUT /api/v1/billing/subscription (admin)
///
/// Switch the company to a different plan. No payment processing: this is a
/// data operation that cancels the active subscription and opens a new one.
pub async fn update_subscription(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateSubscriptionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let plan = PlanRepo::find_by_id(&state.pool, input.plan_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Plan", input.plan_id)))?;

    let subscription =
        SubscriptionRepo::switch_plan(&state.pool, admin.company_id, plan.id).await?;

    tracing::info!(
        company_id = admin.company_id,
        plan_id = plan.id,
        plan = %plan.name,
        "subscription switched"
    );

    Ok(Json(serde_json::json!({
        "data": {
            "plan": plan,
            "subscription": subscription,
        }
    })))
}

/// GET /api/v1/billing/limits?kind=products|users
pub async fn get_limits(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitsQuery>,
) -> AppResult<Json<DataResponse<LimitDecision>>> {
    let kind = match params.kind.as_str() {
        "products" => LimitKind::Products,
        "users" => LimitKind::Users,
        other => {
            return Err(AppError::BadRequest(format!(
                "kind must be 'products' or 'users', got '{other}'"
            )))
        }
    };

    let decision = check_limit(
        &state.pool,
        auth.company_id,
        kind,
        Duration::from_secs(state.config.plan_check_timeout_secs),
    )
    .await;

    Ok(Json(DataResponse::new(decision)))
}
