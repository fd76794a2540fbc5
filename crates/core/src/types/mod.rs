//! Core types for Herbal Garden.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod csrf;
pub mod fingerprint;
pub mod id;
pub mod price;
pub mod status;

pub use cart::Cart;
pub use csrf::{CSRF_TOKEN_BYTES, CsrfToken, constant_time_eq};
pub use fingerprint::CartFingerprint;
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use status::*;
