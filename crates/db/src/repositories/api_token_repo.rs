//! Repository for the `api_tokens` table.
//!
//! Tokens are managed configuration for external integrations; only the
//! SHA-256 digest of a token is stored, never the plaintext.

use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::api_token::ApiToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, company_id, name, token_hash, is_revoked, created_by, last_used_at, created_at";

/// Provides CRUD operations for integration API tokens.
pub struct ApiTokenRepo;

impl ApiTokenRepo {
    /// Insert a new token, returning the created row. The caller hashes the
    /// plaintext and shows it to the user exactly once.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        name: &str,
        token_hash: &str,
        created_by: DbId,
    ) -> Result<ApiToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO api_tokens (company_id, name, token_hash, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiToken>(&query)
            .bind(company_id)
            .bind(name)
            .bind(token_hash)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// List a company's tokens, newest first. Includes revoked tokens so
    /// the client can show their history.
    pub async fn list(pool: &PgPool, company_id: DbId) -> Result<Vec<ApiToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM api_tokens WHERE company_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ApiToken>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Revoke a token. Returns `true` on the first call, `false` once
    /// already revoked.
    pub async fn revoke(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE api_tokens SET is_revoked = TRUE
             WHERE id = $1 AND company_id = $2 AND is_revoked = FALSE",
        )
        .bind(id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
