//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod alert_rule;
pub mod alert_settings;
pub mod api_token;
pub mod category;
pub mod company;
pub mod import_run;
pub mod notification;
pub mod plan;
pub mod product;
pub mod session;
pub mod subscription;
pub mod user;
