//! Handlers for the `/alerts` resource: rules, notifications, settings, and
//! the manual evaluation trigger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use estoca_alerts::AlertEngine;
use estoca_core::alerts::RULE_TYPES;
use estoca_core::channels::{canonical_channel, FREQUENCIES};
use estoca_core::error::CoreError;
use estoca_core::DbId;
use estoca_db::models::alert_rule::{AlertRule, CreateAlertRule, UpdateAlertRule};
use estoca_db::models::alert_settings::{AlertSettings, UpdateAlertSettings};
use estoca_db::models::notification::Notification;
use estoca_db::repositories::{AlertRuleRepo, AlertSettingsRepo, NotificationRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /alerts/notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// POST /api/v1/alerts/rules
pub async fn create_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateAlertRule>,
) -> AppResult<(StatusCode, Json<AlertRule>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    validate_rule_fields(
        Some(&input.rule_type),
        Some(input.threshold),
        input.frequency.as_deref(),
    )?;
    input.channel = canonicalize_channel(input.channel.as_deref())?;

    let rule = AlertRuleRepo::create(&state.pool, auth.company_id, &input).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// GET /api/v1/alerts/rules
pub async fn list_rules(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AlertRule>>> {
    let rules = AlertRuleRepo::list(&state.pool, auth.company_id).await?;
    Ok(Json(rules))
}

/// GET /api/v1/alerts/rules/{id}
pub async fn get_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AlertRule>> {
    let rule = AlertRuleRepo::find_by_id(&state.pool, auth.company_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Alert rule", id)))?;
    Ok(Json(rule))
}

/// PUT /api/v1/alerts/rules/{id}
pub async fn update_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAlertRule>,
) -> AppResult<Json<AlertRule>> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
    }
    validate_rule_fields(
        input.rule_type.as_deref(),
        input.threshold,
        input.frequency.as_deref(),
    )?;
    input.channel = canonicalize_channel(input.channel.as_deref())?;

    let rule = AlertRuleRepo::update(&state.pool, auth.company_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Alert rule", id)))?;
    Ok(Json(rule))
}

/// DELETE /api/v1/alerts/rules/{id}
///
/// The rule's notifications cascade away with it.
pub async fn delete_rule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = AlertRuleRepo::delete(&state.pool, auth.company_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Alert rule", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Shared validation for rule create/update. Each field is only checked when
/// present so partial updates validate what they touch.
fn validate_rule_fields(
    rule_type: Option<&str>,
    threshold: Option<i32>,
    frequency: Option<&str>,
) -> AppResult<()> {
    if let Some(rule_type) = rule_type {
        if !RULE_TYPES.contains(&rule_type) {
            return Err(AppError::BadRequest(format!(
                "unknown rule_type: {rule_type}"
            )));
        }
    }
    if let Some(threshold) = threshold {
        if threshold < 1 {
            return Err(AppError::BadRequest("threshold must be at least 1".into()));
        }
    }
    if let Some(frequency) = frequency {
        if !FREQUENCIES.contains(&frequency) {
            return Err(AppError::BadRequest(format!(
                "unknown frequency: {frequency}"
            )));
        }
    }
    Ok(())
}

/// Resolve an optional channel to its stored spelling. `in-app` is accepted
/// as an alias of `in_app`; unknown values are rejected.
fn canonicalize_channel(channel: Option<&str>) -> AppResult<Option<String>> {
    channel
        .map(|value| {
            canonical_channel(value)
                .map(str::to_string)
                .ok_or_else(|| AppError::BadRequest(format!("unknown channel: {value}")))
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// GET /api/v1/alerts/notifications
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications =
        NotificationRepo::list(&state.pool, auth.company_id, unread_only, limit, offset).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /api/v1/alerts/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.company_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// POST /api/v1/alerts/notifications/read-all
///
/// Returns the number of notifications that were marked. Idempotent.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.company_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// POST /api/v1/alerts/notifications/{id}/read
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::mark_read(&state.pool, auth.company_id, id).await?;
    if !found {
        return Err(AppError::Core(CoreError::not_found("Notification", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/alerts/notifications/{id}
///
/// Dismissal is a soft delete; the row stays behind the dedup index so the
/// pairing is never re-notified while its condition persists.
pub async fn delete_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::soft_delete(&state.pool, auth.company_id, id).await?;
    if !found {
        return Err(AppError::Core(CoreError::not_found("Notification", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/alerts/notifications
pub async fn clear_all(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::clear_all(&state.pool, auth.company_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "cleared": count }
    })))
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /api/v1/alerts/settings
pub async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<AlertSettings>> {
    let settings = AlertSettingsRepo::get_or_create(&state.pool, auth.company_id).await?;
    Ok(Json(settings))
}

/// PUT /api/v1/alerts/settings
pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateAlertSettings>,
) -> AppResult<Json<AlertSettings>> {
    if input.check_interval_minutes.is_some_and(|m| m < 1) {
        return Err(AppError::BadRequest(
            "check_interval_minutes must be at least 1".into(),
        ));
    }
    for (field, value) in [
        ("quiet_hours_start", input.quiet_hours_start),
        ("quiet_hours_end", input.quiet_hours_end),
    ] {
        if value.flatten().is_some_and(|h| !(0..=23).contains(&h)) {
            return Err(AppError::BadRequest(format!(
                "{field} must be an hour between 0 and 23"
            )));
        }
    }
    if input.low_stock_default.is_some_and(|v| v < 1) {
        return Err(AppError::BadRequest(
            "low_stock_default must be at least 1".into(),
        ));
    }
    if input.expiry_days_default.is_some_and(|v| v < 1) {
        return Err(AppError::BadRequest(
            "expiry_days_default must be at least 1".into(),
        ));
    }

    // Ensure the row exists before the partial update.
    AlertSettingsRepo::get_or_create(&state.pool, auth.company_id).await?;
    let settings = AlertSettingsRepo::update(&state.pool, auth.company_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(
            "Alert settings",
            auth.company_id,
        )))?;
    Ok(Json(settings))
}

// ---------------------------------------------------------------------------
// Manual trigger
// ---------------------------------------------------------------------------

/// POST /api/v1/alerts/run
///
/// Run an evaluation cycle for the caller's company right now, bypassing the
/// scheduler's interval and quiet hours. The dedup index makes a trigger
/// racing the scheduler harmless.
pub async fn run_now(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let inserted = AlertEngine::evaluate_company(&state.pool, auth.company_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "inserted": inserted }
    })))
}
