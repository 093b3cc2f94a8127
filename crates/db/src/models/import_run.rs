//! CSV import history model.

use estoca_core::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `import_runs` table: one per CSV import attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportRun {
    pub id: DbId,
    pub company_id: DbId,
    pub file_name: String,
    pub total_rows: i32,
    pub imported_count: i32,
    pub error_count: i32,
    /// JSON array of `{"line": n, "message": s}` entries.
    pub errors: serde_json::Value,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for recording a finished import.
#[derive(Debug)]
pub struct CreateImportRun {
    pub file_name: String,
    pub total_rows: i32,
    pub imported_count: i32,
    pub error_count: i32,
    pub errors: serde_json::Value,
    pub created_by: DbId,
}
