//! Shared types and models for the Kitchen Costing Platform
//!
//! This crate contains the domain models, request/response payloads and the
//! cost aggregation engine shared between the backend and the browser (via WASM).

pub mod api;
pub mod costing;
pub mod models;
pub mod types;
pub mod validation;

pub use costing::*;
pub use models::*;
pub use types::*;
pub use validation::*;
