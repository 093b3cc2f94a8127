//! Repository for the `categories` table.

use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, color, created_at, updated_at";

/// Fallback badge color when the client does not pick one.
const DEFAULT_COLOR: &str = "#6B7280";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    ///
    /// Duplicate names within a company violate `uq_categories_company_name`.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (company_id, name, color)
             VALUES ($1, $2, COALESCE($3, '{DEFAULT_COLOR}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND company_id = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by exact name within a company.
    pub async fn find_by_name(
        pool: &PgPool,
        company_id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE company_id = $1 AND name = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(company_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by name, creating it with the default color if absent.
    /// Used by the CSV importer.
    pub async fn find_or_create(
        pool: &PgPool,
        company_id: DbId,
        name: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (company_id, name)
             VALUES ($1, $2)
             ON CONFLICT (company_id, name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(company_id)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List a company's categories ordered by name.
    pub async fn list(pool: &PgPool, company_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE company_id = $1 ORDER BY name");
        sqlx::query_as::<_, Category>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a category. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row matches the id and company.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($3, name),
                color = COALESCE($4, color),
                updated_at = NOW()
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Products referencing it fall back to NULL via the
    /// foreign key. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
