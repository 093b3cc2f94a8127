//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role`.

/// Full access to the company, including user, token, and plan management.
pub const ROLE_ADMIN: &str = "admin";

/// Day-to-day access: catalog, alerts, reports.
pub const ROLE_MEMBER: &str = "member";
