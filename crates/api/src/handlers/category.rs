//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use estoca_core::error::CoreError;
use estoca_core::DbId;
use estoca_db::models::category::{Category, CreateCategory, UpdateCategory};
use estoca_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/categories
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    let category = CategoryRepo::create(&state.pool, auth.company_id, &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/categories
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list(&state.pool, auth.company_id).await?;
    Ok(Json(categories))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::find_by_id(&state.pool, auth.company_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    Ok(Json(category))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
    }
    let category = CategoryRepo::update(&state.pool, auth.company_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    Ok(Json(category))
}

/// DELETE /api/v1/categories/{id}
///
/// Products in the category fall back to uncategorized via the foreign key.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CategoryRepo::delete(&state.pool, auth.company_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Category", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
