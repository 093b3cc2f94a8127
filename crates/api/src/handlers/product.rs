//! Handlers for the `/products` resource, including CSV import/export.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use estoca_core::billing::LimitKind;
use estoca_core::csv::{parse_products_csv, write_products_csv, ExportRow};
use estoca_core::error::CoreError;
use estoca_core::DbId;
use estoca_db::models::import_run::{CreateImportRun, ImportRun};
use estoca_db::models::product::{
    CreateProduct, Product, ProductFilter, ProductWithCategory, UpdateProduct,
};
use estoca_db::repositories::{CategoryRepo, ImportRunRepo, ProductRepo};
use serde::Deserialize;

use crate::billing::check_limit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{PaginationParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /products/import`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub file_name: String,
    pub csv_data: String,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/products
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> AppResult<Json<DataResponse<Vec<ProductWithCategory>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let filter = ProductFilter {
        search: params.search.filter(|s| !s.trim().is_empty()),
        category_id: params.category_id,
    };

    let products = ProductRepo::list(&state.pool, auth.company_id, &filter, limit, offset).await?;
    Ok(Json(DataResponse::new(products)))
}

/// POST /api/v1/products (plan-gated)
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if input.price_cents < 0 {
        return Err(AppError::BadRequest("price_cents must not be negative".into()));
    }
    if input.current_stock < 0 {
        return Err(AppError::BadRequest(
            "current_stock must not be negative".into(),
        ));
    }

    let decision = check_limit(
        &state.pool,
        auth.company_id,
        LimitKind::Products,
        Duration::from_secs(state.config.plan_check_timeout_secs),
    )
    .await;
    if !decision.allowed {
        let reason = decision
            .reason
            .unwrap_or_else(|| "product limit reached".to_string());
        return Err(AppError::PlanLimit(reason));
    }

    let product = ProductRepo::create(&state.pool, auth.company_id, &input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Product>> {
    let product = ProductRepo::find_by_id(&state.pool, auth.company_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Product", id)))?;
    Ok(Json(product))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
    }
    if input.price_cents.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price_cents must not be negative".into()));
    }
    if input.current_stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest(
            "current_stock must not be negative".into(),
        ));
    }

    let product = ProductRepo::update(&state.pool, auth.company_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Product", id)))?;
    Ok(Json(product))
}

/// DELETE /api/v1/products/{id}
///
/// Soft delete: the row keeps its history and stops appearing in lists,
/// counts, and evaluation snapshots.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductRepo::soft_delete(&state.pool, auth.company_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Product", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// CSV export / import
// ---------------------------------------------------------------------------

/// GET /api/v1/products/export
///
/// Stream the full catalog as a `text/csv` attachment using the same column
/// conventions the importer accepts, so an export re-imports cleanly.
pub async fn export(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<axum::response::Response> {
    let products = ProductRepo::list_all(&state.pool, auth.company_id).await?;

    let rows: Vec<ExportRow> = products
        .into_iter()
        .map(|p| ExportRow {
            name: p.name,
            category: p.category_name,
            price_cents: p.price_cents,
            current_stock: p.current_stock,
            expiry_date: p.expiry_date,
        })
        .collect();

    let csv_output = write_products_csv(&rows);

    Ok(axum::response::Response::builder()
        .status(200)
        .header("Content-Type", "text/csv; charset=utf-8")
        .header(
            "Content-Disposition",
            "attachment; filename=\"produtos.csv\"",
        )
        .body(axum::body::Body::from(csv_output))
        .map_err(|e| AppError::InternalError(format!("Response build error: {e}")))?
        .into_response())
}

/// POST /api/v1/products/import
///
/// Parse the uploaded CSV, upsert products by name (categories are
/// found-or-created), and record an [`ImportRun`] history row. Bad rows are
/// collected as errors and never abort the rest of the file.
pub async fn import(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<(StatusCode, Json<ImportRun>)> {
    if input.file_name.trim().is_empty() {
        return Err(AppError::BadRequest("file_name must not be empty".into()));
    }

    let parsed = parse_products_csv(&input.csv_data)?;

    let mut imported = 0i32;
    for row in &parsed.rows {
        let category_id = match &row.category {
            Some(name) => Some(
                CategoryRepo::find_or_create(&state.pool, auth.company_id, name)
                    .await?
                    .id,
            ),
            None => None,
        };

        match ProductRepo::find_by_name(&state.pool, auth.company_id, &row.name).await? {
            Some(existing) => {
                ProductRepo::update_from_import(
                    &state.pool,
                    auth.company_id,
                    existing.id,
                    row.price_cents,
                    row.current_stock,
                    row.expiry_date,
                    category_id,
                )
                .await?;
            }
            None => {
                ProductRepo::create(
                    &state.pool,
                    auth.company_id,
                    &CreateProduct {
                        name: row.name.clone(),
                        description: None,
                        category_id,
                        price_cents: row.price_cents,
                        current_stock: row.current_stock,
                        expiry_date: row.expiry_date,
                    },
                )
                .await?;
            }
        }
        imported += 1;
    }

    let errors = serde_json::to_value(&parsed.errors)
        .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))?;

    let run = ImportRunRepo::create(
        &state.pool,
        auth.company_id,
        &CreateImportRun {
            file_name: input.file_name.trim().to_string(),
            total_rows: parsed.total_rows() as i32,
            imported_count: imported,
            error_count: parsed.errors.len() as i32,
            errors,
            created_by: auth.user_id,
        },
    )
    .await?;

    tracing::info!(
        company_id = auth.company_id,
        imported = run.imported_count,
        errors = run.error_count,
        "CSV import finished"
    );

    Ok((StatusCode::CREATED, Json(run)))
}

/// GET /api/v1/products/imports
pub async fn import_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ImportRun>>>> {
    let runs = ImportRunRepo::list(
        &state.pool,
        auth.company_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse::new(runs)))
}
