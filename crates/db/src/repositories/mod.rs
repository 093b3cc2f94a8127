//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Tenant-owned tables take
//! the `company_id` scope right after the pool.

pub mod alert_rule_repo;
pub mod alert_settings_repo;
pub mod api_token_repo;
pub mod category_repo;
pub mod company_repo;
pub mod import_run_repo;
pub mod notification_repo;
pub mod plan_repo;
pub mod product_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use alert_rule_repo::AlertRuleRepo;
pub use alert_settings_repo::AlertSettingsRepo;
pub use api_token_repo::ApiTokenRepo;
pub use category_repo::CategoryRepo;
pub use company_repo::CompanyRepo;
pub use import_run_repo::ImportRunRepo;
pub use notification_repo::NotificationRepo;
pub use plan_repo::PlanRepo;
pub use product_repo::ProductRepo;
pub use session_repo::SessionRepo;
pub use subscription_repo::SubscriptionRepo;
pub use user_repo::UserRepo;
