//! Business logic services for the Kitchen Costing Platform

pub mod auth;
pub mod costing;
pub mod employee;
pub mod item;
pub mod product;
pub mod recipe;

#[cfg(test)]
pub(crate) mod test_db;

pub use auth::AuthService;
pub use costing::CostingService;
pub use employee::EmployeeService;
pub use item::ItemService;
pub use product::ProductService;
pub use recipe::RecipeService;
