//! API route modules
//!
//! - [`health`] - liveness and database checks
//! - [`auth`] - registration, login, password reset
//! - [`products`] - menu catalog
//! - [`tables`] - table registry and table-side ordering
//! - [`cart`] - customer cart and placement
//! - [`orders`] - order views, status changes, payment
//! - [`staff`] - staff dashboard
//! - [`reports`] - revenue summary and exports
//! - [`feedback`] - contact form and review board

pub mod auth;
pub mod cart;
pub mod feedback;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod staff;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
