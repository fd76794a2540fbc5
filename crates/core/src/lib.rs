//! Herbal Garden Core - Shared domain types.
//!
//! This crate provides the types shared by every Herbal Garden component:
//! - `storefront` - Public catalog, cart and checkout
//! - `admin` - Moderation and reporting console
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Anything that decides how much money moves (cart
//! totals, minor-unit conversion, cart fingerprints) lives here so the
//! storefront computes it identically at intent creation and at completion.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, carts, fingerprints, tokens and statuses
//! - [`pricing`] - Authoritative cart totals computed from catalog prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::CartQuote;
pub use types::*;
