//! Integration tests for the evaluation engine over a real database.

use chrono::{Duration, Utc};
use estoca_alerts::AlertEngine;
use estoca_db::models::alert_rule::CreateAlertRule;
use estoca_db::models::product::CreateProduct;
use estoca_db::repositories::{
    AlertRuleRepo, AlertSettingsRepo, CompanyRepo, NotificationRepo, ProductRepo,
};
use sqlx::PgPool;

async fn new_company(pool: &PgPool) -> i64 {
    let company = CompanyRepo::create(pool, "Mercado Teste").await.unwrap();
    AlertSettingsRepo::get_or_create(pool, company.id).await.unwrap();
    company.id
}

fn rule(rule_type: &str, threshold: i32) -> CreateAlertRule {
    CreateAlertRule {
        name: format!("{rule_type} rule"),
        rule_type: rule_type.to_string(),
        threshold,
        category: None,
        channel: None,
        frequency: None,
        is_active: None,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn evaluation_persists_and_deduplicates(pool: PgPool) {
    let company = new_company(&pool).await;
    ProductRepo::create(
        &pool,
        company,
        &CreateProduct {
            name: "Paracetamol".to_string(),
            description: None,
            category_id: None,
            price_cents: 599,
            current_stock: 8,
            expiry_date: None,
        },
    )
    .await
    .unwrap();
    AlertRuleRepo::create(&pool, company, &rule("quantity", 10)).await.unwrap();

    let inserted = AlertEngine::evaluate_company(&pool, company).await.unwrap();
    assert_eq!(inserted, 1);

    let notifications = NotificationRepo::list(&pool, company, false, 50, 0).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].message,
        "Low stock: Paracetamol has only 8 units"
    );
    assert!(!notifications[0].is_read);

    // The condition still holds, but the second cycle inserts nothing.
    let inserted = AlertEngine::evaluate_company(&pool, company).await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(
        NotificationRepo::list(&pool, company, false, 50, 0).await.unwrap().len(),
        1
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn expired_product_alerts_past_threshold(pool: PgPool) {
    let company = new_company(&pool).await;
    let expired = Utc::now().date_naive() - Duration::days(10);
    ProductRepo::create(
        &pool,
        company,
        &CreateProduct {
            name: "Iogurte".to_string(),
            description: None,
            category_id: None,
            price_cents: 450,
            current_stock: 100,
            expiry_date: Some(expired),
        },
    )
    .await
    .unwrap();
    AlertRuleRepo::create(&pool, company, &rule("expiry", 7)).await.unwrap();

    AlertEngine::evaluate_company(&pool, company).await.unwrap();

    let notifications = NotificationRepo::list(&pool, company, false, 50, 0).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("expired 10 days ago"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn cycle_records_last_evaluated_at(pool: PgPool) {
    let company = new_company(&pool).await;

    AlertEngine::evaluate_company(&pool, company).await.unwrap();

    let settings = AlertSettingsRepo::get_or_create(&pool, company).await.unwrap();
    assert!(settings.last_evaluated_at.is_some());
}
