//! Product entity model and DTOs.

use chrono::NaiveDate;
use estoca_core::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
///
/// Prices are integer centavos (`price_cents`); the CSV layer owns the
/// `R$ n,nn` rendering. `expiry_date` is a plain calendar date.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub price_cents: i64,
    pub current_stock: i32,
    pub expiry_date: Option<NaiveDate>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Product row joined with its category name, for list views and export.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductWithCategory {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub price_cents: i64,
    pub current_stock: i32,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub current_stock: i32,
    pub expiry_date: Option<NaiveDate>,
}

/// DTO for updating an existing product. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub price_cents: Option<i64>,
    pub current_stock: Option<i32>,
    pub expiry_date: Option<NaiveDate>,
}

/// Filters accepted by the product list query.
#[derive(Debug, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    pub category_id: Option<DbId>,
}

/// Inventory summary aggregates for the reports endpoint.
///
/// Low-stock and expiring-soon counts are computed against the company's
/// alert-settings defaults, passed in by the handler.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportSummary {
    pub product_count: i64,
    pub low_stock_count: i64,
    pub expiring_soon_count: i64,
    pub expired_count: i64,
    /// Sum of `price_cents * current_stock` over live products.
    pub total_stock_value_cents: i64,
}

/// Per-category inventory aggregates. Uncategorized products appear as a
/// row with a NULL category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryBreakdown {
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub product_count: i64,
    pub total_stock: i64,
    pub total_value_cents: i64,
}
