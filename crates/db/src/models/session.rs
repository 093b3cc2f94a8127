//! Refresh-token session model.

use estoca_core::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table. Holds the SHA-256 digest of the refresh
/// token, never the token itself.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
