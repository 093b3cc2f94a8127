//! Repository for the `companies` table.

use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::company::Company;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a company by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rename a company. Returns `true` if the row was updated.
    pub async fn rename(pool: &PgPool, id: DbId, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE companies SET name = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
