//! Domain models for the storefront.

pub mod catalog;
pub mod order;
pub mod session;
pub mod submission;

pub use catalog::{Plant, ProductListing};
pub use order::NewOrder;
pub use session::{CheckoutSession, PendingPayment};
pub use submission::{CommunitySubmission, NewSubmission};
