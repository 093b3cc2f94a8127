//! Billing plan entity model.

use estoca_core::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `plans` table. Seeded by migration; not user-editable.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plan {
    pub id: DbId,
    pub name: String,
    /// `"free"` or `"pro"`.
    pub plan_type: String,
    pub max_products: i32,
    pub max_users: i32,
    /// Feature flags, e.g. `{"csv_import": true}`.
    pub features: serde_json::Value,
    pub created_at: Timestamp,
}
