//! Repository for the `subscriptions` table.
//!
//! The partial unique index `uq_subscriptions_active_company` enforces at
//! most one active subscription per company; a company with none is on the
//! free plan.

use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::plan::Plan;
use crate::models::subscription::Subscription;
use crate::repositories::PlanRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, plan_id, status, current_period_start, \
                       current_period_end, created_at, updated_at";

/// Provides access to company subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Find a company's active subscription, if any.
    pub async fn find_active(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions
             WHERE company_id = $1 AND status = 'active'"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the plan a company is currently on.
    ///
    /// Joins through the active subscription; companies without one fall
    /// back to the seeded free plan.
    pub async fn resolve_plan(pool: &PgPool, company_id: DbId) -> Result<Plan, sqlx::Error> {
        let subscribed: Option<Plan> = sqlx::query_as(
            "SELECT p.id, p.name, p.plan_type, p.max_products, p.max_users, p.features, \
                    p.created_at
             FROM subscriptions s
             JOIN plans p ON p.id = s.plan_id
             WHERE s.company_id = $1 AND s.status = 'active'",
        )
        .bind(company_id)
        .fetch_optional(pool)
        .await?;

        match subscribed {
            Some(plan) => Ok(plan),
            None => PlanRepo::free_plan(pool).await,
        }
    }

    /// Switch a company to a new plan.
    ///
    /// Cancels the current active subscription (if any) and inserts a new
    /// active one in a single transaction, so the partial unique index never
    /// sees two active rows.
    pub async fn switch_plan(
        pool: &PgPool,
        company_id: DbId,
        plan_id: DbId,
    ) -> Result<Subscription, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE subscriptions SET status = 'canceled', \
                    current_period_end = NOW(), updated_at = NOW()
             WHERE company_id = $1 AND status = 'active'",
        )
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO subscriptions (company_id, plan_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(company_id)
            .bind(plan_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(subscription)
    }
}
