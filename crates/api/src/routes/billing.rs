//! Route definitions for the `/billing` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/billing`.
///
/// ```text
/// GET /plans        -> list_plans
/// GET /subscription -> get_subscription
/// PUT /subscription -> update_subscription (admin)
/// GET /limits       -> get_limits (?kind=products|users)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(billing::list_plans))
        .route(
            "/subscription",
            get(billing::get_subscription).put(billing::update_subscription),
        )
        .route("/limits", get(billing::get_limits))
}
