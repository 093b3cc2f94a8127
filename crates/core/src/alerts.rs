//! Alert rule evaluation engine.
//!
//! Pure logic — no database access. The caller is responsible for fetching
//! products, rules, and the set of already-emitted dedup keys from the DB
//! and passing them in.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::DbId;

/// Rule that fires when a product's stock falls to or below the threshold.
pub const RULE_TYPE_QUANTITY: &str = "quantity";

/// Rule that fires when a product expires within `threshold` days, or has
/// already expired.
pub const RULE_TYPE_EXPIRY: &str = "expiry";

/// All accepted rule type values, in CHECK-constraint order.
pub const RULE_TYPES: &[&str] = &[RULE_TYPE_QUANTITY, RULE_TYPE_EXPIRY];

/// An alert rule as loaded for one evaluation cycle.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub id: DbId,
    pub rule_type: String,
    /// Units for quantity rules, days for expiry rules. Always >= 1.
    pub threshold: i32,
    /// Category *name* filter. `None` or empty covers every category.
    /// Matching is exact and case-sensitive.
    pub category: Option<String>,
    pub is_active: bool,
}

/// A product row joined with its category name, as seen by one cycle.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub id: DbId,
    pub name: String,
    pub category_name: Option<String>,
    pub current_stock: i32,
    pub expiry_date: Option<NaiveDate>,
}

/// A notification produced by evaluation, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedNotification {
    pub dedup_key: String,
    pub product_id: DbId,
    pub product_name: String,
    pub rule_id: DbId,
    pub rule_type: String,
    pub message: String,
}

/// Dedup key for a product/rule pairing.
///
/// A pairing notifies at most once for as long as its row exists, read or
/// not, dismissed or not.
pub fn dedup_key(product_id: DbId, rule_id: DbId) -> String {
    format!("{product_id}-{rule_id}")
}

/// Evaluate every product against every rule and return the notifications
/// that newly qualify.
///
/// `existing_keys` holds the dedup keys already present in the store
/// (including soft-deleted rows); pairings found there are skipped, which is
/// what makes repeated cycles idempotent while a condition persists.
pub fn evaluate(
    products: &[ProductSnapshot],
    rules: &[RuleSpec],
    today: NaiveDate,
    existing_keys: &HashSet<String>,
) -> Vec<StagedNotification> {
    let mut staged = Vec::new();
    let mut staged_keys: HashSet<String> = HashSet::new();

    for rule in rules.iter().filter(|r| r.is_active) {
        for product in products {
            if !category_matches(rule.category.as_deref(), product.category_name.as_deref()) {
                continue;
            }
            let Some(message) = check_rule(rule, product, today) else {
                continue;
            };
            let key = dedup_key(product.id, rule.id);
            if existing_keys.contains(&key) || !staged_keys.insert(key.clone()) {
                continue;
            }
            staged.push(StagedNotification {
                dedup_key: key,
                product_id: product.id,
                product_name: product.name.clone(),
                rule_id: rule.id,
                rule_type: rule.rule_type.clone(),
                message,
            });
        }
    }

    staged
}

/// A rule without a filter (or with an empty one) covers every product,
/// including products with no category. Otherwise the product's category
/// name must equal the filter exactly, case-sensitive.
fn category_matches(filter: Option<&str>, category: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(f) => category == Some(f),
    }
}

/// Check one product against one rule, returning the rendered message on a
/// match.
fn check_rule(rule: &RuleSpec, product: &ProductSnapshot, today: NaiveDate) -> Option<String> {
    match rule.rule_type.as_str() {
        RULE_TYPE_QUANTITY => {
            if product.current_stock <= rule.threshold {
                Some(format!(
                    "Low stock: {} has only {} units",
                    product.name, product.current_stock
                ))
            } else {
                None
            }
        }
        RULE_TYPE_EXPIRY => {
            // Products without an expiry date never match expiry rules.
            let expiry = product.expiry_date?;
            let days = (expiry - today).num_days();
            if days < 0 {
                // Already expired: fires regardless of the threshold.
                Some(format!(
                    "Expired product: {} expired {} days ago",
                    product.name, -days
                ))
            } else if days <= i64::from(rule.threshold) {
                Some(format!(
                    "Product nearing expiry: {} expires in {} days",
                    product.name, days
                ))
            } else {
                None
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn quantity_rule(id: DbId, threshold: i32) -> RuleSpec {
        RuleSpec {
            id,
            rule_type: RULE_TYPE_QUANTITY.to_string(),
            threshold,
            category: None,
            is_active: true,
        }
    }

    fn expiry_rule(id: DbId, threshold: i32) -> RuleSpec {
        RuleSpec {
            id,
            rule_type: RULE_TYPE_EXPIRY.to_string(),
            threshold,
            category: None,
            is_active: true,
        }
    }

    fn product(id: DbId, name: &str, stock: i32) -> ProductSnapshot {
        ProductSnapshot {
            id,
            name: name.to_string(),
            category_name: None,
            current_stock: stock,
            expiry_date: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn no_existing() -> HashSet<String> {
        HashSet::new()
    }

    // -----------------------------------------------------------------------
    // Quantity rules
    // -----------------------------------------------------------------------

    #[test]
    fn quantity_fires_below_threshold() {
        let staged = evaluate(
            &[product(1, "Paracetamol", 8)],
            &[quantity_rule(10, 10)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].message, "Low stock: Paracetamol has only 8 units");
        assert_eq!(staged[0].dedup_key, "1-10");
        assert_eq!(staged[0].rule_type, RULE_TYPE_QUANTITY);
    }

    #[test]
    fn quantity_fires_at_exact_threshold() {
        let staged = evaluate(
            &[product(1, "Soro", 10)],
            &[quantity_rule(10, 10)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
    }

    #[test]
    fn quantity_silent_one_above_threshold() {
        let staged = evaluate(
            &[product(1, "Soro", 11)],
            &[quantity_rule(10, 10)],
            today(),
            &no_existing(),
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn quantity_fires_at_zero_stock() {
        let staged = evaluate(
            &[product(1, "Gaze", 0)],
            &[quantity_rule(10, 5)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].message, "Low stock: Gaze has only 0 units");
    }

    // -----------------------------------------------------------------------
    // Expiry rules
    // -----------------------------------------------------------------------

    fn expiring_product(id: DbId, name: &str, expiry: NaiveDate) -> ProductSnapshot {
        ProductSnapshot {
            id,
            name: name.to_string(),
            category_name: None,
            current_stock: 100,
            expiry_date: Some(expiry),
        }
    }

    #[test]
    fn expiry_fires_within_window() {
        let expiry = today() + chrono::Duration::days(5);
        let staged = evaluate(
            &[expiring_product(1, "Leite", expiry)],
            &[expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
        assert_eq!(
            staged[0].message,
            "Product nearing expiry: Leite expires in 5 days"
        );
    }

    #[test]
    fn expiry_fires_at_exact_threshold() {
        let expiry = today() + chrono::Duration::days(7);
        let staged = evaluate(
            &[expiring_product(1, "Leite", expiry)],
            &[expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
    }

    #[test]
    fn expiry_silent_one_day_past_threshold() {
        let expiry = today() + chrono::Duration::days(8);
        let staged = evaluate(
            &[expiring_product(1, "Leite", expiry)],
            &[expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn expiry_fires_on_expiry_day() {
        let staged = evaluate(
            &[expiring_product(1, "Iogurte", today())],
            &[expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
        assert_eq!(
            staged[0].message,
            "Product nearing expiry: Iogurte expires in 0 days"
        );
    }

    #[test]
    fn expired_fires_regardless_of_threshold() {
        let expiry = today() - chrono::Duration::days(10);
        let staged = evaluate(
            &[expiring_product(1, "Queijo", expiry)],
            &[expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
        assert_eq!(
            staged[0].message,
            "Expired product: Queijo expired 10 days ago"
        );
    }

    #[test]
    fn product_without_expiry_never_matches_expiry_rule() {
        let staged = evaluate(
            &[product(1, "Parafuso", 2)],
            &[expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert!(staged.is_empty());
    }

    // -----------------------------------------------------------------------
    // Category filter
    // -----------------------------------------------------------------------

    fn categorized(id: DbId, name: &str, category: &str, stock: i32) -> ProductSnapshot {
        ProductSnapshot {
            id,
            name: name.to_string(),
            category_name: Some(category.to_string()),
            current_stock: stock,
            expiry_date: None,
        }
    }

    fn filtered_rule(id: DbId, category: &str) -> RuleSpec {
        RuleSpec {
            category: Some(category.to_string()),
            ..quantity_rule(id, 10)
        }
    }

    #[test]
    fn category_filter_matches_exact_name() {
        let staged = evaluate(
            &[categorized(1, "Dipirona", "Medicamentos", 3)],
            &[filtered_rule(10, "Medicamentos")],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 1);
    }

    #[test]
    fn category_filter_is_case_sensitive() {
        let staged = evaluate(
            &[categorized(1, "Dipirona", "medicamentos", 3)],
            &[filtered_rule(10, "Medicamentos")],
            today(),
            &no_existing(),
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn category_filter_skips_other_categories() {
        let staged = evaluate(
            &[categorized(1, "Caneta", "Papelaria", 3)],
            &[filtered_rule(10, "Medicamentos")],
            today(),
            &no_existing(),
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn category_filter_skips_uncategorized_products() {
        let staged = evaluate(
            &[product(1, "Caneta", 3)],
            &[filtered_rule(10, "Medicamentos")],
            today(),
            &no_existing(),
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn empty_filter_covers_every_category() {
        let rule = RuleSpec {
            category: Some(String::new()),
            ..quantity_rule(10, 10)
        };
        let staged = evaluate(
            &[
                categorized(1, "Dipirona", "Medicamentos", 3),
                product(2, "Caneta", 3),
            ],
            &[rule],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Dedup and rule state
    // -----------------------------------------------------------------------

    #[test]
    fn existing_key_suppresses_notification() {
        let mut existing = HashSet::new();
        existing.insert("1-10".to_string());
        let staged = evaluate(
            &[product(1, "Soro", 2)],
            &[quantity_rule(10, 10)],
            today(),
            &existing,
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn repeated_cycles_stage_exactly_once() {
        let products = [product(1, "Soro", 2)];
        let rules = [quantity_rule(10, 10)];
        let mut existing = no_existing();

        let first = evaluate(&products, &rules, today(), &existing);
        assert_eq!(first.len(), 1);
        for n in &first {
            existing.insert(n.dedup_key.clone());
        }

        let second = evaluate(&products, &rules, today(), &existing);
        assert!(second.is_empty());
    }

    #[test]
    fn duplicate_rule_rows_stage_once() {
        let rules = [quantity_rule(10, 10), quantity_rule(10, 10)];
        let staged = evaluate(&[product(1, "Soro", 2)], &rules, today(), &no_existing());
        assert_eq!(staged.len(), 1);
    }

    #[test]
    fn inactive_rule_produces_nothing() {
        let rule = RuleSpec {
            is_active: false,
            ..quantity_rule(10, 10)
        };
        let staged = evaluate(&[product(1, "Soro", 2)], &[rule], today(), &no_existing());
        assert!(staged.is_empty());
    }

    #[test]
    fn multiple_rules_fire_independently_for_one_product() {
        let expiry = today() + chrono::Duration::days(3);
        let p = ProductSnapshot {
            expiry_date: Some(expiry),
            ..product(1, "Leite", 2)
        };
        let staged = evaluate(
            &[p],
            &[quantity_rule(10, 10), expiry_rule(20, 7)],
            today(),
            &no_existing(),
        );
        assert_eq!(staged.len(), 2);
        let keys: Vec<&str> = staged.iter().map(|n| n.dedup_key.as_str()).collect();
        assert!(keys.contains(&"1-10"));
        assert!(keys.contains(&"1-20"));
    }

    #[test]
    fn unknown_rule_type_is_ignored() {
        let rule = RuleSpec {
            rule_type: "velocity".to_string(),
            ..quantity_rule(10, 10)
        };
        let staged = evaluate(&[product(1, "Soro", 2)], &[rule], today(), &no_existing());
        assert!(staged.is_empty());
    }
}
