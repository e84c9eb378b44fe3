//! Domain models for the Kitchen Costing Platform

mod employee;
mod item;
mod product;
mod recipe;

pub use employee::*;
pub use item::*;
pub use product::*;
pub use recipe::*;
