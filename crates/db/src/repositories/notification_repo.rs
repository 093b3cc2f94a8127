//! Repository for the `notifications` table.
//!
//! Dismissal is a soft delete. Dismissed rows stay behind the dedup unique
//! index so a product/rule pairing that keeps violating its rule is never
//! re-notified; list and count queries exclude them.

use std::collections::HashSet;

use estoca_core::alerts::StagedNotification;
use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, dedup_key, product_id, product_name, rule_id, \
                       rule_type, message, is_read, read_at, deleted_at, created_at";

/// Provides persistence for alert notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert the notifications staged by an evaluation cycle.
    ///
    /// `ON CONFLICT DO NOTHING` on the dedup index makes this safe against a
    /// manual trigger racing the scheduler: whichever insert lands first
    /// wins and the other is dropped. Returns the number of rows actually
    /// inserted.
    pub async fn insert_staged(
        pool: &PgPool,
        company_id: DbId,
        staged: &[StagedNotification],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for n in staged {
            let result = sqlx::query(
                "INSERT INTO notifications (company_id, dedup_key, product_id, product_name, \
                                            rule_id, rule_type, message)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT ON CONSTRAINT uq_notifications_dedup DO NOTHING",
            )
            .bind(company_id)
            .bind(&n.dedup_key)
            .bind(n.product_id)
            .bind(&n.product_name)
            .bind(n.rule_id)
            .bind(&n.rule_type)
            .bind(&n.message)
            .execute(pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Fetch every dedup key a company has ever been notified for,
    /// including read and dismissed rows. Input to the evaluator.
    pub async fn existing_dedup_keys(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let keys: Vec<String> =
            sqlx::query_scalar("SELECT dedup_key FROM notifications WHERE company_id = $1")
                .bind(company_id)
                .fetch_all(pool)
                .await?;
        Ok(keys.into_iter().collect())
    }

    /// List a company's visible notifications, newest first.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE company_id = $1
               AND deleted_at IS NULL
               AND ($2 = FALSE OR is_read = FALSE)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(company_id)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a company's unread, visible notifications. Recomputed on every
    /// call; nothing caches this.
    pub async fn unread_count(pool: &PgPool, company_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications
             WHERE company_id = $1 AND is_read = FALSE AND deleted_at IS NULL",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// Mark one notification as read. Idempotent: re-marking an already-read
    /// row succeeds and keeps the original `read_at`. Returns `false` only
    /// when the id does not match a visible row (dismissed, wrong company,
    /// or absent).
    pub async fn mark_read(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
             WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every visible notification as read. Idempotent: a second call
    /// matches zero rows and returns 0.
    pub async fn mark_all_read(pool: &PgPool, company_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW()
             WHERE company_id = $1 AND is_read = FALSE AND deleted_at IS NULL",
        )
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Dismiss one notification (soft delete). The row stays behind the
    /// dedup index. Returns `false` when no visible row matches.
    pub async fn soft_delete(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET deleted_at = NOW()
             WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Dismiss every visible notification. Returns the count dismissed.
    pub async fn clear_all(pool: &PgPool, company_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET deleted_at = NOW()
             WHERE company_id = $1 AND deleted_at IS NULL",
        )
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
