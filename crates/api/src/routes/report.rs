//! Route definitions for the `/reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /summary     -> summary
/// GET /by-category -> by_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(report::summary))
        .route("/by-category", get(report::by_category))
}
