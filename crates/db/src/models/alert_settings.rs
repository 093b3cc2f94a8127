//! Per-company alert settings model and DTOs.

use estoca_core::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `alert_settings` table (exactly one per company).
///
/// Quiet hours are UTC hours of day; the window may wrap past midnight.
/// Channel toggles are informational, matching the rule-level channel field.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertSettings {
    pub id: DbId,
    pub company_id: DbId,
    pub check_interval_minutes: i32,
    pub quiet_hours_start: Option<i16>,
    pub quiet_hours_end: Option<i16>,
    pub channel_in_app: bool,
    pub channel_email: bool,
    pub channel_push: bool,
    /// Default threshold offered when creating quantity rules.
    pub low_stock_default: i32,
    /// Default window offered when creating expiry rules; also used by the
    /// "expiring soon" report.
    pub expiry_days_default: i32,
    pub last_evaluated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating alert settings. Only present fields are applied.
///
/// Quiet hours are nullable columns, so they use a double `Option`: the
/// outer level distinguishes an omitted field (left unchanged) from an
/// explicit JSON `null` (window cleared).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAlertSettings {
    pub check_interval_minutes: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub quiet_hours_start: Option<Option<i16>>,
    #[serde(default, deserialize_with = "double_option")]
    pub quiet_hours_end: Option<Option<i16>>,
    pub channel_in_app: Option<bool>,
    pub channel_email: Option<bool>,
    pub channel_push: Option<bool>,
    pub low_stock_default: Option<i32>,
    pub expiry_days_default: Option<i32>,
}

/// Deserialize a present-but-possibly-null field as `Some(inner)`.
/// Combined with `#[serde(default)]`, an absent field stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
