//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `pricing` - Authoritative cart totals from catalog prices
//! - `checkout` - Payment intent creation and verified order completion
//! - `payments` - Payment gateway seam and the Stripe client
//! - `assistant` - Language-model chat and plant recognition
//! - `analytics` - Fire-and-forget usage events
//! - `uploads` - Submission image validation and storage

pub mod analytics;
pub mod assistant;
pub mod checkout;
pub mod payments;
pub mod pricing;
pub mod uploads;
