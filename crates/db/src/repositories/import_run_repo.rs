//! Repository for the `import_runs` table (CSV import history).

use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::import_run::{CreateImportRun, ImportRun};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, file_name, total_rows, imported_count, error_count, \
                       errors, created_by, created_at";

/// Provides persistence for CSV import history.
pub struct ImportRunRepo;

impl ImportRunRepo {
    /// Record a finished import, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateImportRun,
    ) -> Result<ImportRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO import_runs (company_id, file_name, total_rows, imported_count, \
                                      error_count, errors, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImportRun>(&query)
            .bind(company_id)
            .bind(&input.file_name)
            .bind(input.total_rows)
            .bind(input.imported_count)
            .bind(input.error_count)
            .bind(&input.errors)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// List a company's import history, newest first.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImportRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM import_runs
             WHERE company_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ImportRun>(&query)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
