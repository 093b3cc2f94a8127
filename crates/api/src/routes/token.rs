//! Route definitions for the `/tokens` resource. Admin only.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::token;
use crate::state::AppState;

/// Routes mounted at `/tokens`.
///
/// ```text
/// GET    /     -> list (admin)
/// POST   /     -> create (admin)
/// DELETE /{id} -> revoke (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(token::list).post(token::create))
        .route("/{id}", delete(token::revoke))
}
