//! Plan limit decisions.
//!
//! Pure logic — no database access. The API layer fetches the company's
//! plan and current usage and passes them in.

use serde::Serialize;

/// Plan tier stored in `plans.plan_type`. Companies without an active
/// subscription are treated as `free`.
pub const PLAN_TYPE_FREE: &str = "free";
pub const PLAN_TYPE_PRO: &str = "pro";

/// Which quota a creation attempt counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Products,
    Users,
}

impl LimitKind {
    pub fn noun(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Users => "users",
        }
    }
}

/// Outcome of a plan limit check.
///
/// `reason` is set on denials; `current`/`max` are omitted when the check
/// could not read the plan (service degradation denies rather than allows).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl LimitDecision {
    /// Deny issued when the plan lookup failed or timed out. Fail closed.
    pub fn unavailable() -> Self {
        Self {
            allowed: false,
            reason: Some("plan limits are temporarily unavailable, try again".to_string()),
            current: None,
            max: None,
        }
    }
}

/// Compare current usage against a plan quota.
///
/// Creation is allowed while `current < max`; the row being created takes
/// the count to at most `max`.
pub fn evaluate_limit(kind: LimitKind, plan_name: &str, current: i64, max: i64) -> LimitDecision {
    if current < max {
        LimitDecision {
            allowed: true,
            reason: None,
            current: Some(current),
            max: Some(max),
        }
    } else {
        LimitDecision {
            allowed: false,
            reason: Some(format!(
                "{plan_name} plan allows at most {max} {}",
                kind.noun()
            )),
            current: Some(current),
            max: Some(max),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
