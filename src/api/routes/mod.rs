//! API Routes
//!
//! Route handlers organized by functionality.

pub mod chat;
pub mod data;
pub mod diseases;
pub mod forecast;
pub mod health;
pub mod overview;
pub mod risk;
