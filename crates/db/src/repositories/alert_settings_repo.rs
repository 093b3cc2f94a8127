//! Repository for the `alert_settings` table (one row per company).

use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::alert_settings::{AlertSettings, UpdateAlertSettings};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, check_interval_minutes, quiet_hours_start, \
                       quiet_hours_end, channel_in_app, channel_email, channel_push, \
                       low_stock_default, expiry_days_default, last_evaluated_at, \
                       created_at, updated_at";

/// Provides access to per-company alert settings.
pub struct AlertSettingsRepo;

impl AlertSettingsRepo {
    /// Fetch a company's settings, creating the default row if absent.
    ///
    /// Registration creates the row, so the insert arm only runs for
    /// companies that predate it.
    pub async fn get_or_create(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<AlertSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_settings (company_id)
             VALUES ($1)
             ON CONFLICT (company_id) DO UPDATE SET company_id = EXCLUDED.company_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertSettings>(&query)
            .bind(company_id)
            .fetch_one(pool)
            .await
    }

    /// List every company's settings. Input to the scheduler tick.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AlertSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_settings ORDER BY company_id");
        sqlx::query_as::<_, AlertSettings>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a company's settings. Only present fields are applied.
    ///
    /// Quiet hours are nullable, so COALESCE cannot express clearing them;
    /// those two columns take a touched flag plus the (possibly NULL) new
    /// value instead.
    ///
    /// Returns `None` if the company has no settings row; callers go through
    /// [`Self::get_or_create`] first, so that only happens for a bogus id.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        input: &UpdateAlertSettings,
    ) -> Result<Option<AlertSettings>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_settings SET
                check_interval_minutes = COALESCE($2, check_interval_minutes),
                quiet_hours_start = CASE WHEN $3 THEN $4 ELSE quiet_hours_start END,
                quiet_hours_end = CASE WHEN $5 THEN $6 ELSE quiet_hours_end END,
                channel_in_app = COALESCE($7, channel_in_app),
                channel_email = COALESCE($8, channel_email),
                channel_push = COALESCE($9, channel_push),
                low_stock_default = COALESCE($10, low_stock_default),
                expiry_days_default = COALESCE($11, expiry_days_default),
                updated_at = NOW()
             WHERE company_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertSettings>(&query)
            .bind(company_id)
            .bind(input.check_interval_minutes)
            .bind(input.quiet_hours_start.is_some())
            .bind(input.quiet_hours_start.flatten())
            .bind(input.quiet_hours_end.is_some())
            .bind(input.quiet_hours_end.flatten())
            .bind(input.channel_in_app)
            .bind(input.channel_email)
            .bind(input.channel_push)
            .bind(input.low_stock_default)
            .bind(input.expiry_days_default)
            .fetch_optional(pool)
            .await
    }

    /// Record a completed evaluation cycle.
    pub async fn touch_last_evaluated(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE alert_settings SET last_evaluated_at = NOW(), updated_at = NOW()
             WHERE company_id = $1",
        )
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
