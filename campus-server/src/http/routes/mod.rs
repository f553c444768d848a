//! Route handlers organized by resource

pub mod health;
pub mod auth;
pub mod resources;
pub mod bookings;
pub mod users;
pub mod analytics;
