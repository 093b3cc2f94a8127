//! HTTP request handlers, one module per resource.

pub mod alerts;
pub mod auth;
pub mod billing;
pub mod category;
pub mod product;
pub mod report;
pub mod token;
pub mod user;
