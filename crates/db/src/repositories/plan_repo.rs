//! Repository for the `plans` table. Plans are seeded by migration.

use estoca_core::billing::PLAN_TYPE_FREE;
use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::plan::Plan;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, plan_type, max_products, max_users, features, created_at";

/// Provides read access to billing plans.
pub struct PlanRepo;

impl PlanRepo {
    /// List every plan, free tier first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Plan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plans ORDER BY max_products");
        sqlx::query_as::<_, Plan>(&query).fetch_all(pool).await
    }

    /// Find a plan by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Plan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plans WHERE id = $1");
        sqlx::query_as::<_, Plan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The seeded free plan, the fallback for companies without an active
    /// subscription. Errors with `RowNotFound` if the seed is missing.
    pub async fn free_plan(pool: &PgPool) -> Result<Plan, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plans WHERE plan_type = $1 ORDER BY id LIMIT 1");
        sqlx::query_as::<_, Plan>(&query)
            .bind(PLAN_TYPE_FREE)
            .fetch_one(pool)
            .await
    }
}
