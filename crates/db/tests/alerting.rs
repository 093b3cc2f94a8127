//! Integration tests for the alerting store: rule specs, notification
//! dedup, and read/dismiss semantics against a real database.

use chrono::{Duration, Utc};
use estoca_core::alerts::{self, StagedNotification};
use estoca_db::models::alert_rule::{CreateAlertRule, UpdateAlertRule};
use estoca_db::models::product::CreateProduct;
use estoca_db::repositories::{
    AlertRuleRepo, AlertSettingsRepo, CompanyRepo, NotificationRepo, ProductRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_company(pool: &PgPool) -> i64 {
    CompanyRepo::create(pool, "Farmácia Teste")
        .await
        .expect("company create should succeed")
        .id
}

fn quantity_rule(name: &str, threshold: i32) -> CreateAlertRule {
    CreateAlertRule {
        name: name.to_string(),
        rule_type: "quantity".to_string(),
        threshold,
        category: None,
        channel: None,
        frequency: None,
        is_active: None,
    }
}

fn new_product(name: &str, stock: i32) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: None,
        category_id: None,
        price_cents: 1000,
        current_stock: stock,
        expiry_date: None,
    }
}

fn staged(key: &str, product_id: i64, rule_id: i64, message: &str) -> StagedNotification {
    StagedNotification {
        dedup_key: key.to_string(),
        product_id,
        product_name: "Soro".to_string(),
        rule_id,
        rule_type: "quantity".to_string(),
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Rule specs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn active_specs_exclude_inactive_rules(pool: PgPool) {
    let company = new_company(&pool).await;

    let active = AlertRuleRepo::create(&pool, company, &quantity_rule("low", 10))
        .await
        .unwrap();
    let toggled = AlertRuleRepo::create(&pool, company, &quantity_rule("off", 5))
        .await
        .unwrap();
    AlertRuleRepo::update(
        &pool,
        company,
        toggled.id,
        &UpdateAlertRule {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let specs = AlertRuleRepo::list_active_specs(&pool, company).await.unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].id, active.id);
    assert_eq!(specs[0].threshold, 10);
}

#[sqlx::test(migrations = "../../migrations")]
async fn rules_are_tenant_scoped(pool: PgPool) {
    let company_a = new_company(&pool).await;
    let company_b = new_company(&pool).await;

    let rule = AlertRuleRepo::create(&pool, company_a, &quantity_rule("mine", 10))
        .await
        .unwrap();

    assert!(AlertRuleRepo::find_by_id(&pool, company_b, rule.id)
        .await
        .unwrap()
        .is_none());
    assert!(AlertRuleRepo::list(&pool, company_b).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Notification dedup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn staged_insert_is_deduplicated(pool: PgPool) {
    let company = new_company(&pool).await;
    let product = ProductRepo::create(&pool, company, &new_product("Soro", 2))
        .await
        .unwrap();
    let rule = AlertRuleRepo::create(&pool, company, &quantity_rule("low", 10))
        .await
        .unwrap();

    let key = alerts::dedup_key(product.id, rule.id);
    let n = staged(&key, product.id, rule.id, "Low stock: Soro has only 2 units");

    let first = NotificationRepo::insert_staged(&pool, company, &[n.clone()])
        .await
        .unwrap();
    assert_eq!(first, 1);

    // Same pairing again: conflict, nothing inserted.
    let second = NotificationRepo::insert_staged(&pool, company, &[n]).await.unwrap();
    assert_eq!(second, 0);

    assert_eq!(NotificationRepo::unread_count(&pool, company).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn repeated_evaluation_cycles_produce_one_row(pool: PgPool) {
    let company = new_company(&pool).await;
    ProductRepo::create(&pool, company, &new_product("Soro", 2))
        .await
        .unwrap();
    AlertRuleRepo::create(&pool, company, &quantity_rule("low", 10))
        .await
        .unwrap();

    let today = Utc::now().date_naive();

    // Run the full fetch-evaluate-insert cycle three times.
    for _ in 0..3 {
        let products = ProductRepo::snapshot_for_alerts(&pool, company).await.unwrap();
        let rules = AlertRuleRepo::list_active_specs(&pool, company).await.unwrap();
        let existing = NotificationRepo::existing_dedup_keys(&pool, company)
            .await
            .unwrap();
        let staged = alerts::evaluate(&products, &rules, today, &existing);
        NotificationRepo::insert_staged(&pool, company, &staged)
            .await
            .unwrap();
    }

    let notifications = NotificationRepo::list(&pool, company, false, 50, 0)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Low stock: Soro has only 2 units");
}

#[sqlx::test(migrations = "../../migrations")]
async fn dismissed_notification_is_not_regenerated(pool: PgPool) {
    let company = new_company(&pool).await;
    let product = ProductRepo::create(&pool, company, &new_product("Soro", 2))
        .await
        .unwrap();
    let rule = AlertRuleRepo::create(&pool, company, &quantity_rule("low", 10))
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let products = ProductRepo::snapshot_for_alerts(&pool, company).await.unwrap();
    let rules = AlertRuleRepo::list_active_specs(&pool, company).await.unwrap();
    let existing = NotificationRepo::existing_dedup_keys(&pool, company)
        .await
        .unwrap();
    let staged = alerts::evaluate(&products, &rules, today, &existing);
    NotificationRepo::insert_staged(&pool, company, &staged)
        .await
        .unwrap();

    let id = NotificationRepo::list(&pool, company, false, 50, 0).await.unwrap()[0].id;
    assert!(NotificationRepo::soft_delete(&pool, company, id).await.unwrap());

    // The dismissed row is invisible to list/count...
    assert!(NotificationRepo::list(&pool, company, false, 50, 0)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(NotificationRepo::unread_count(&pool, company).await.unwrap(), 0);

    // ...but its dedup key survives, so the still-violating pair stays quiet.
    let existing = NotificationRepo::existing_dedup_keys(&pool, company)
        .await
        .unwrap();
    assert!(existing.contains(&alerts::dedup_key(product.id, rule.id)));
    let staged = alerts::evaluate(&products, &rules, today, &existing);
    assert!(staged.is_empty());
}

// ---------------------------------------------------------------------------
// Read / dismiss semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn mark_all_read_is_idempotent(pool: PgPool) {
    let company = new_company(&pool).await;
    let product = ProductRepo::create(&pool, company, &new_product("Soro", 2))
        .await
        .unwrap();
    let rule = AlertRuleRepo::create(&pool, company, &quantity_rule("low", 10))
        .await
        .unwrap();
    let key = alerts::dedup_key(product.id, rule.id);
    NotificationRepo::insert_staged(&pool, company, &[staged(&key, product.id, rule.id, "msg")])
        .await
        .unwrap();

    let marked = NotificationRepo::mark_all_read(&pool, company).await.unwrap();
    assert_eq!(marked, 1);
    assert_eq!(NotificationRepo::unread_count(&pool, company).await.unwrap(), 0);

    // Second call is a no-op, not an error.
    let marked = NotificationRepo::mark_all_read(&pool, company).await.unwrap();
    assert_eq!(marked, 0);
    assert_eq!(NotificationRepo::unread_count(&pool, company).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_read_on_missing_id_is_a_noop(pool: PgPool) {
    let company = new_company(&pool).await;
    assert!(!NotificationRepo::mark_read(&pool, company, 999_999).await.unwrap());
    assert!(!NotificationRepo::soft_delete(&pool, company, 999_999).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn unread_only_listing_filters_read_rows(pool: PgPool) {
    let company = new_company(&pool).await;
    let product = ProductRepo::create(&pool, company, &new_product("Soro", 2))
        .await
        .unwrap();
    let rule_a = AlertRuleRepo::create(&pool, company, &quantity_rule("a", 10))
        .await
        .unwrap();
    let rule_b = AlertRuleRepo::create(&pool, company, &quantity_rule("b", 20))
        .await
        .unwrap();
    NotificationRepo::insert_staged(
        &pool,
        company,
        &[
            staged(&alerts::dedup_key(product.id, rule_a.id), product.id, rule_a.id, "a"),
            staged(&alerts::dedup_key(product.id, rule_b.id), product.id, rule_b.id, "b"),
        ],
    )
    .await
    .unwrap();

    let first = NotificationRepo::list(&pool, company, true, 50, 0).await.unwrap();
    assert_eq!(first.len(), 2);

    NotificationRepo::mark_read(&pool, company, first[0].id).await.unwrap();

    let unread = NotificationRepo::list(&pool, company, true, 50, 0).await.unwrap();
    assert_eq!(unread.len(), 1);
    let all = NotificationRepo::list(&pool, company, false, 50, 0).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn clear_all_dismisses_everything(pool: PgPool) {
    let company = new_company(&pool).await;
    let product = ProductRepo::create(&pool, company, &new_product("Soro", 2))
        .await
        .unwrap();
    let rule = AlertRuleRepo::create(&pool, company, &quantity_rule("low", 10))
        .await
        .unwrap();
    let key = alerts::dedup_key(product.id, rule.id);
    NotificationRepo::insert_staged(&pool, company, &[staged(&key, product.id, rule.id, "msg")])
        .await
        .unwrap();

    assert_eq!(NotificationRepo::clear_all(&pool, company).await.unwrap(), 1);
    assert!(NotificationRepo::list(&pool, company, false, 50, 0)
        .await
        .unwrap()
        .is_empty());
    // Idempotent.
    assert_eq!(NotificationRepo::clear_all(&pool, company).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Alert settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn settings_row_is_created_on_first_access(pool: PgPool) {
    let company = new_company(&pool).await;

    let settings = AlertSettingsRepo::get_or_create(&pool, company).await.unwrap();
    assert_eq!(settings.check_interval_minutes, 1);
    assert_eq!(settings.low_stock_default, 10);
    assert_eq!(settings.expiry_days_default, 7);
    assert!(settings.last_evaluated_at.is_none());

    // Second access returns the same row.
    let again = AlertSettingsRepo::get_or_create(&pool, company).await.unwrap();
    assert_eq!(again.id, settings.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn touch_last_evaluated_records_the_cycle(pool: PgPool) {
    let company = new_company(&pool).await;
    AlertSettingsRepo::get_or_create(&pool, company).await.unwrap();

    AlertSettingsRepo::touch_last_evaluated(&pool, company).await.unwrap();

    let settings = AlertSettingsRepo::get_or_create(&pool, company).await.unwrap();
    let last = settings.last_evaluated_at.expect("last_evaluated_at should be set");
    assert!(Utc::now() - last < Duration::seconds(10));
}
