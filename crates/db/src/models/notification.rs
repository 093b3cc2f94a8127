//! Alert notification entity model.

use estoca_core::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// `dedup_key` is `"{product_id}-{rule_id}"` and is unique per company, so a
/// product/rule pairing notifies at most once. Dismissed rows keep their
/// `deleted_at` timestamp and stay in the table, which is what prevents a
/// dismissed notification from reappearing while its condition persists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub company_id: DbId,
    pub dedup_key: String,
    pub product_id: DbId,
    pub product_name: String,
    pub rule_id: DbId,
    pub rule_type: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
