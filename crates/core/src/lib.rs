//! Domain logic for the estoca inventory service.
//!
//! Everything in this crate is pure: no database access, no I/O. The `db`
//! and `api` crates fetch state and pass it in.

pub mod alerts;
pub mod billing;
pub mod channels;
pub mod csv;
pub mod error;
pub mod roles;
pub mod scheduling;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
