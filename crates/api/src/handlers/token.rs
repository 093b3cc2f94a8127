//! Handlers for the `/tokens` resource (integration API tokens).
//!
//! Tokens are managed configuration for external integrations. Only the
//! SHA-256 digest is stored; the plaintext is returned exactly once.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use estoca_core::error::CoreError;
use estoca_core::DbId;
use estoca_db::models::api_token::{ApiToken, CreateApiToken};
use estoca_db::repositories::ApiTokenRepo;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::jwt::sha256_hex;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /tokens`: the stored row plus the one-time plaintext.
#[derive(Debug, Serialize)]
pub struct CreatedTokenResponse {
    #[serde(flatten)]
    pub token: ApiToken,
    /// Shown once; only its digest is persisted.
    pub plaintext: String,
}

/// POST /api/v1/tokens (admin)
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateApiToken>,
) -> AppResult<(StatusCode, Json<CreatedTokenResponse>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let plaintext = Uuid::new_v4().to_string();
    let token_hash = sha256_hex(&plaintext);

    let token =
        ApiTokenRepo::create(&state.pool, admin.company_id, name, &token_hash, admin.user_id)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedTokenResponse { token, plaintext }),
    ))
}

/// GET /api/v1/tokens (admin)
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ApiToken>>>> {
    let tokens = ApiTokenRepo::list(&state.pool, admin.company_id).await?;
    Ok(Json(DataResponse::new(tokens)))
}

/// DELETE /api/v1/tokens/{id} (admin)
///
/// Revoke, not erase: the row stays visible in the listing as history.
pub async fn revoke(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let revoked = ApiTokenRepo::revoke(&state.pool, admin.company_id, id).await?;
    if !revoked {
        return Err(AppError::Core(CoreError::not_found("API token", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
