//! Background alert evaluation for the estoca inventory service.
//!
//! [`AlertEngine`] runs one evaluation cycle for one company;
//! [`AlertScheduler`] drives it on a polling loop, honoring each company's
//! check interval and quiet hours.

pub mod engine;
pub mod scheduler;

pub use engine::AlertEngine;
pub use scheduler::AlertScheduler;
