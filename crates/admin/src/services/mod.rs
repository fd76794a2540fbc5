//! Business logic services for admin.

pub mod auth;
pub mod csrf;
