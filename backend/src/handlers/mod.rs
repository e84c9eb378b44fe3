//! HTTP handlers for the Kitchen Costing Platform

pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod health;
pub mod item;
pub mod product;
pub mod recipe;

pub use auth::*;
pub use dashboard::*;
pub use employee::*;
pub use health::*;
pub use item::*;
pub use product::*;
pub use recipe::*;
