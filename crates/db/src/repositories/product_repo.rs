//! Repository for the `products` table.

use chrono::NaiveDate;
use estoca_core::alerts::ProductSnapshot;
use estoca_core::DbId;
use sqlx::PgPool;

use crate::models::product::{
    CategoryBreakdown, CreateProduct, Product, ProductFilter, ProductWithCategory, ReportSummary,
    UpdateProduct,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, description, category_id, price_cents, \
                       current_stock, expiry_date, deleted_at, created_at, updated_at";

/// Joined column list for views that need the category name.
const JOINED_COLUMNS: &str = "p.id, p.name, p.description, p.category_id, c.name AS category_name, \
                              p.price_cents, p.current_stock, p.expiry_date, p.created_at, p.updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateProduct,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (company_id, name, description, category_id, price_cents, \
                                   current_stock, expiry_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.price_cents)
            .bind(input.current_stock)
            .bind(input.expiry_date)
            .fetch_one(pool)
            .await
    }

    /// Find a live (not soft-deleted) product by ID within a company.
    pub async fn find_by_id(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// List live products joined with their category names, newest first.
    ///
    /// `search` matches the product name case-insensitively as a substring.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.company_id = $1
               AND p.deleted_at IS NULL
               AND ($2::TEXT IS NULL OR p.name ILIKE '%' || $2 || '%')
               AND ($3::BIGINT IS NULL OR p.category_id = $3)
             ORDER BY p.created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .bind(company_id)
            .bind(&filter.search)
            .bind(filter.category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every live product for export, ordered by name.
    pub async fn list_all(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.company_id = $1 AND p.deleted_at IS NULL
             ORDER BY p.name"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Count a company's live products. Feeds the plan limit gate.
    pub async fn count_active(pool: &PgPool, company_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE company_id = $1 AND deleted_at IS NULL",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// Fetch the evaluation snapshot: every live product with its category
    /// name, in the shape the rule evaluator consumes.
    pub async fn snapshot_for_alerts(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<ProductSnapshot>, sqlx::Error> {
        let rows: Vec<(DbId, String, Option<String>, i32, Option<NaiveDate>)> = sqlx::query_as(
            "SELECT p.id, p.name, c.name, p.current_stock, p.expiry_date
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.company_id = $1 AND p.deleted_at IS NULL",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, name, category_name, current_stock, expiry_date)| ProductSnapshot {
                    id,
                    name,
                    category_name,
                    current_stock,
                    expiry_date,
                },
            )
            .collect())
    }

    /// Update a product. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no live row matches the id and company.
    pub async fn update(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id),
                price_cents = COALESCE($6, price_cents),
                current_stock = COALESCE($7, current_stock),
                expiry_date = COALESCE($8, expiry_date),
                updated_at = NOW()
             WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.price_cents)
            .bind(input.current_stock)
            .bind(input.expiry_date)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a product. Returns `true` on the first call, `false` once
    /// already deleted.
    pub async fn soft_delete(pool: &PgPool, company_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW()
             WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk stock adjustment used by the CSV importer when a product with
    /// the same name already exists: overwrite stock, price, and expiry.
    pub async fn update_from_import(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
        price_cents: i64,
        current_stock: i32,
        expiry_date: Option<NaiveDate>,
        category_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE products SET
                price_cents = $3,
                current_stock = $4,
                expiry_date = $5,
                category_id = COALESCE($6, category_id),
                updated_at = NOW()
             WHERE id = $1 AND company_id = $2",
        )
        .bind(id)
        .bind(company_id)
        .bind(price_cents)
        .bind(current_stock)
        .bind(expiry_date)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Inventory summary aggregates over a company's live products.
    ///
    /// `low_stock_threshold` and `expiry_days` come from the company's alert
    /// settings defaults.
    pub async fn report_summary(
        pool: &PgPool,
        company_id: DbId,
        low_stock_threshold: i32,
        expiry_days: i32,
    ) -> Result<ReportSummary, sqlx::Error> {
        sqlx::query_as(
            "SELECT
                COUNT(*) AS product_count,
                COUNT(*) FILTER (WHERE current_stock <= $2) AS low_stock_count,
                COUNT(*) FILTER (WHERE expiry_date IS NOT NULL
                                   AND expiry_date >= CURRENT_DATE
                                   AND expiry_date <= CURRENT_DATE + $3) AS expiring_soon_count,
                COUNT(*) FILTER (WHERE expiry_date IS NOT NULL
                                   AND expiry_date < CURRENT_DATE) AS expired_count,
                COALESCE(SUM(price_cents * current_stock), 0)::BIGINT AS total_stock_value_cents
             FROM products
             WHERE company_id = $1 AND deleted_at IS NULL",
        )
        .bind(company_id)
        .bind(low_stock_threshold)
        .bind(expiry_days)
        .fetch_one(pool)
        .await
    }

    /// Per-category aggregates over a company's live products, largest
    /// category first. Uncategorized products form their own row.
    pub async fn report_by_category(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<CategoryBreakdown>, sqlx::Error> {
        sqlx::query_as(
            "SELECT
                c.id AS category_id,
                c.name AS category_name,
                COUNT(p.id) AS product_count,
                COALESCE(SUM(p.current_stock), 0)::BIGINT AS total_stock,
                COALESCE(SUM(p.price_cents * p.current_stock), 0)::BIGINT AS total_value_cents
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.company_id = $1 AND p.deleted_at IS NULL
             GROUP BY c.id, c.name
             ORDER BY product_count DESC, category_name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Find a live product by exact name. Used by the CSV importer to decide
    /// between insert and update.
    pub async fn find_by_name(
        pool: &PgPool,
        company_id: DbId,
        name: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE company_id = $1 AND name = $2 AND deleted_at IS NULL
             LIMIT 1"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(company_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
