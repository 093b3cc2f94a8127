//! Handlers for the `/users` resource.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use estoca_core::billing::LimitKind;
use estoca_core::error::CoreError;
use estoca_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use estoca_db::models::user::{CreateUser, UserResponse};
use estoca_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::billing::check_limit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `member`.
    pub role: Option<String>,
}

/// GET /api/v1/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", auth.user_id)))?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users (admin)
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list_by_company(&state.pool, admin.company_id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/users (admin, plan-gated)
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = input.username.trim();
    if username.len() < 3 {
        return Err(AppError::BadRequest(
            "username must be at least 3 characters".into(),
        ));
    }
    let email = input.email.trim();
    if !email.contains('@') {
        return Err(AppError::BadRequest("email is not valid".into()));
    }
    validate_password_strength(&input.password, username).map_err(AppError::BadRequest)?;

    let role = input.role.unwrap_or_else(|| ROLE_MEMBER.to_string());
    if role != ROLE_ADMIN && role != ROLE_MEMBER {
        return Err(AppError::BadRequest(format!("unknown role: {role}")));
    }

    let decision = check_limit(
        &state.pool,
        admin.company_id,
        LimitKind::Users,
        Duration::from_secs(state.config.plan_check_timeout_secs),
    )
    .await;
    if !decision.allowed {
        let reason = decision
            .reason
            .unwrap_or_else(|| "user limit reached".to_string());
        return Err(AppError::PlanLimit(reason));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            company_id: admin.company_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}
