//! Integration API token model and DTOs.

use estoca_core::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `api_tokens` table.
///
/// Only the SHA-256 digest of the token is stored; the digest is skipped
/// during serialization so responses carry metadata only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiToken {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub is_revoked: bool,
    pub created_by: Option<DbId>,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new token.
#[derive(Debug, Deserialize)]
pub struct CreateApiToken {
    pub name: String,
}
