//! Plan limit enforcement for creation endpoints.
//!
//! Wraps the plan lookup and usage count in a bounded timeout. When the
//! lookup fails or exceeds the deadline the check fails closed: the caller
//! receives a denial with no counts rather than an unmetered allow.

use std::time::Duration;

use estoca_core::billing::{evaluate_limit, LimitDecision, LimitKind};
use estoca_core::DbId;
use estoca_db::repositories::{ProductRepo, SubscriptionRepo, UserRepo};
use estoca_db::DbPool;

/// Check whether the company may create one more row of `kind`.
///
/// Resolves the company's plan (active subscription or the free fallback),
/// counts current usage, and compares against the quota. Any database error
/// or a lookup exceeding `timeout` yields [`LimitDecision::unavailable`].
pub async fn check_limit(
    pool: &DbPool,
    company_id: DbId,
    kind: LimitKind,
    timeout: Duration,
) -> LimitDecision {
    let lookup = async {
        let plan = SubscriptionRepo::resolve_plan(pool, company_id).await?;
        let current = match kind {
            LimitKind::Products => ProductRepo::count_active(pool, company_id).await?,
            LimitKind::Users => UserRepo::count_active(pool, company_id).await?,
        };
        let max = match kind {
            LimitKind::Products => plan.max_products,
            LimitKind::Users => plan.max_users,
        };
        Ok::<_, sqlx::Error>(evaluate_limit(kind, &plan.name, current, i64::from(max)))
    };

    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(decision)) => decision,
        Ok(Err(err)) => {
            tracing::error!(
                company_id,
                kind = kind.noun(),
                error = %err,
                "plan limit lookup failed, denying"
            );
            LimitDecision::unavailable()
        }
        Err(_) => {
            tracing::warn!(
                company_id,
                kind = kind.noun(),
                timeout_secs = timeout.as_secs(),
                "plan limit lookup timed out, denying"
            );
            LimitDecision::unavailable()
        }
    }
}
