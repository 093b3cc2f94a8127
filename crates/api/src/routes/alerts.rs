//! Route definitions for the `/alerts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET    /rules                       -> list_rules
/// POST   /rules                       -> create_rule
/// GET    /rules/{id}                  -> get_rule
/// PUT    /rules/{id}                  -> update_rule
/// DELETE /rules/{id}                  -> delete_rule
///
/// GET    /notifications               -> list_notifications
/// DELETE /notifications               -> clear_all
/// GET    /notifications/unread-count  -> unread_count
/// POST   /notifications/read-all      -> mark_all_read
/// POST   /notifications/{id}/read     -> mark_read
/// DELETE /notifications/{id}          -> delete_notification
///
/// GET    /settings                    -> get_settings
/// PUT    /settings                    -> update_settings
/// POST   /run                         -> run_now
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Rules
        .route("/rules", get(alerts::list_rules).post(alerts::create_rule))
        .route(
            "/rules/{id}",
            get(alerts::get_rule)
                .put(alerts::update_rule)
                .delete(alerts::delete_rule),
        )
        // Notifications
        .route(
            "/notifications",
            get(alerts::list_notifications).delete(alerts::clear_all),
        )
        .route("/notifications/unread-count", get(alerts::unread_count))
        .route("/notifications/read-all", post(alerts::mark_all_read))
        .route("/notifications/{id}/read", post(alerts::mark_read))
        .route(
            "/notifications/{id}",
            axum::routing::delete(alerts::delete_notification),
        )
        // Settings + manual trigger
        .route(
            "/settings",
            get(alerts::get_settings).put(alerts::update_settings),
        )
        .route("/run", post(alerts::run_now))
}
