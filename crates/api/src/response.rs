//! The `{ "data": ... }` envelope used by list and aggregate endpoints.
//!
//! Single-resource endpoints return the resource bare; collections, counts,
//! and report payloads are wrapped so clients can rely on one shape for
//! anything that is not a plain entity.

use serde::Serialize;

/// Envelope serializing as `{ "data": <payload> }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
