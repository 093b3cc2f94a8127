//! Alert rule entity model and DTOs.

use estoca_core::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `alert_rules` table.
///
/// `threshold` is units for quantity rules and days for expiry rules.
/// `category` filters by category *name*; NULL covers every category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRule {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub rule_type: String,
    pub threshold: i32,
    pub category: Option<String>,
    pub channel: String,
    pub frequency: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new alert rule.
#[derive(Debug, Deserialize)]
pub struct CreateAlertRule {
    pub name: String,
    pub rule_type: String,
    pub threshold: i32,
    pub category: Option<String>,
    pub channel: Option<String>,
    pub frequency: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating an existing alert rule. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAlertRule {
    pub name: Option<String>,
    pub rule_type: Option<String>,
    pub threshold: Option<i32>,
    pub category: Option<String>,
    pub channel: Option<String>,
    pub frequency: Option<String>,
    pub is_active: Option<bool>,
}
