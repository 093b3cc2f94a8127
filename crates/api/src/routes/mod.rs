//! Route definitions, one module per resource.

pub mod alerts;
pub mod auth;
pub mod billing;
pub mod category;
pub mod health;
pub mod product;
pub mod report;
pub mod token;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                           register company + admin (public)
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
///
/// /users/me                                current user
/// /users                                   list, create (admin; create plan-gated)
///
/// /categories                              list, create
/// /categories/{id}                         get, update, delete
///
/// /products                                list, create (plan-gated)
/// /products/{id}                           get, update, delete (soft)
/// /products/export                         CSV export (GET)
/// /products/import                         CSV import (POST)
/// /products/imports                        import history (GET)
///
/// /alerts/rules                            list, create
/// /alerts/rules/{id}                       get, update, delete
/// /alerts/notifications                    list (GET), clear all (DELETE)
/// /alerts/notifications/unread-count       unread count (GET)
/// /alerts/notifications/read-all           mark all read (POST)
/// /alerts/notifications/{id}/read          mark read (POST)
/// /alerts/notifications/{id}               dismiss (DELETE)
/// /alerts/settings                         get, update
/// /alerts/run                              manual evaluation trigger (POST)
///
/// /billing/plans                           list plans (GET)
/// /billing/subscription                    get, switch plan (PUT, admin)
/// /billing/limits                          plan limit check (GET)
///
/// /reports/summary                         inventory summary (GET)
/// /reports/by-category                     per-category breakdown (GET)
///
/// /tokens                                  list, create (admin)
/// /tokens/{id}                             revoke (DELETE, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/categories", category::router())
        .nest("/products", product::router())
        .nest("/alerts", alerts::router())
        .nest("/billing", billing::router())
        .nest("/reports", report::router())
        .nest("/tokens", token::router())
}
