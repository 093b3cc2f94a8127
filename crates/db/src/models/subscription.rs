//! Subscription entity model.

use estoca_core::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `subscriptions` table.
///
/// At most one `active` subscription exists per company (partial unique
/// index); a company with none is on the free plan.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub company_id: DbId,
    pub plan_id: DbId,
    /// `"active"`, `"canceled"`, or `"past_due"`.
    pub status: String,
    pub current_period_start: Timestamp,
    pub current_period_end: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
