//! One evaluation cycle for one company.

use estoca_core::alerts;
use estoca_core::DbId;
use estoca_db::repositories::{
    AlertRuleRepo, AlertSettingsRepo, NotificationRepo, ProductRepo,
};
use estoca_db::DbPool;

/// Runs the fetch-evaluate-persist cycle of the alerting core.
///
/// The evaluator itself is pure (`estoca_core::alerts::evaluate`); this type
/// owns the surrounding I/O: load the product snapshot, the active rules,
/// and the already-emitted dedup keys, then insert whatever newly qualifies.
pub struct AlertEngine;

impl AlertEngine {
    /// Evaluate one company and persist the newly qualifying notifications.
    ///
    /// Returns the number of notifications actually inserted. The dedup
    /// unique index absorbs races with concurrent manual triggers, so
    /// overlapping cycles are harmless. Any error leaves previously stored
    /// notifications untouched; the caller decides whether to log or
    /// propagate.
    pub async fn evaluate_company(pool: &DbPool, company_id: DbId) -> Result<u64, sqlx::Error> {
        let products = ProductRepo::snapshot_for_alerts(pool, company_id).await?;
        let rules = AlertRuleRepo::list_active_specs(pool, company_id).await?;
        let existing = NotificationRepo::existing_dedup_keys(pool, company_id).await?;

        let today = chrono::Utc::now().date_naive();
        let staged = alerts::evaluate(&products, &rules, today, &existing);

        let inserted = NotificationRepo::insert_staged(pool, company_id, &staged).await?;
        AlertSettingsRepo::touch_last_evaluated(pool, company_id).await?;

        if inserted > 0 {
            tracing::info!(company_id, inserted, "Alert evaluation produced notifications");
        } else {
            tracing::debug!(company_id, "Alert evaluation produced no new notifications");
        }

        Ok(inserted)
    }
}
