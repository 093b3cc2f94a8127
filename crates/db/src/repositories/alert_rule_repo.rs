//! Repository for the `alert_rules` table.

use estoca_core::alerts::RuleSpec;
use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::alert_rule::{AlertRule, CreateAlertRule, UpdateAlertRule};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, rule_type, threshold, category, channel, \
                       frequency, is_active, created_at, updated_at";

/// Provides CRUD operations for alert rules.
pub struct AlertRuleRepo;

impl AlertRuleRepo {
    /// Insert a new alert rule, returning the created row.
    ///
    /// Channel and frequency fall back to the column defaults when absent;
    /// validation of the enumerated values happens in the handler layer so
    /// a bad value surfaces as a 400 rather than a CHECK violation.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateAlertRule,
    ) -> Result<AlertRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_rules (company_id, name, rule_type, threshold, category, \
                                      channel, frequency, is_active)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'in_app'), COALESCE($7, 'immediate'), \
                     COALESCE($8, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.rule_type)
            .bind(input.threshold)
            .bind(&input.category)
            .bind(&input.channel)
            .bind(&input.frequency)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find an alert rule by ID within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<AlertRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_rules WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's alert rules, newest first.
    pub async fn list(pool: &PgPool, company_id: DbId) -> Result<Vec<AlertRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_rules WHERE company_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Load the active rules of a company in the shape the evaluator
    /// consumes. Inactive rules never reach an evaluation cycle.
    pub async fn list_active_specs(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<RuleSpec>, sqlx::Error> {
        let rows: Vec<(DbId, String, i32, Option<String>)> = sqlx::query_as(
            "SELECT id, rule_type, threshold, category
             FROM alert_rules
             WHERE company_id = $1 AND is_active = TRUE",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, rule_type, threshold, category)| RuleSpec {
                id,
                rule_type,
                threshold,
                category,
                is_active: true,
            })
            .collect())
    }

    /// Update an alert rule. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row matches the id and company.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateAlertRule,
    ) -> Result<Option<AlertRule>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_rules SET
                name = COALESCE($3, name),
                rule_type = COALESCE($4, rule_type),
                threshold = COALESCE($5, threshold),
                category = COALESCE($6, category),
                channel = COALESCE($7, channel),
                frequency = COALESCE($8, frequency),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRule>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.rule_type)
            .bind(input.threshold)
            .bind(&input.category)
            .bind(&input.channel)
            .bind(&input.frequency)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an alert rule. Its notifications cascade via the foreign key.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alert_rules WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
