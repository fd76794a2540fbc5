//! Checkout workflow errors.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::payments::PaymentError;

/// Broad class of a checkout failure, used to pick the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutErrorKind {
    /// The shopper can fix it (empty cart, zero total).
    Validation,
    /// The request disagrees with server-side or gateway state.
    Integrity,
    /// The gateway is missing or failed.
    Gateway,
    /// Another request is completing the same payment.
    Conflict,
    /// Storage failure.
    Internal,
}

/// Errors raised by the checkout workflow.
///
/// Every variant aborts the request before an order is written.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Cart total must be greater than zero")]
    InvalidTotal,

    #[error("Payment does not match this checkout session")]
    IntentMismatch,

    #[error("Your cart changed after payment started. Please review your cart and try again.")]
    CartModified,

    #[error("Payment has not completed")]
    PaymentNotCompleted,

    #[error("Payment amount does not match the order total (expected {expected}, charged {charged})")]
    AmountMismatch { expected: i64, charged: i64 },

    #[error("Payment could not be verified against this cart")]
    CartVerification,

    #[error("Payments are not configured")]
    PaymentNotConfigured,

    #[error("Payment provider error: {}", .0.public_message())]
    Gateway(#[source] PaymentError),

    #[error("This payment is already being processed")]
    CheckoutInProgress,

    #[error("Order could not be recorded: {0}")]
    OrderConflict(String),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("database error: {0}")]
    Repository(#[source] RepositoryError),
}

impl CheckoutError {
    #[must_use]
    pub const fn kind(&self) -> CheckoutErrorKind {
        match self {
            Self::EmptyCart | Self::InvalidTotal => CheckoutErrorKind::Validation,
            Self::IntentMismatch
            | Self::CartModified
            | Self::PaymentNotCompleted
            | Self::AmountMismatch { .. }
            | Self::CartVerification => CheckoutErrorKind::Integrity,
            Self::PaymentNotConfigured | Self::Gateway(_) => CheckoutErrorKind::Gateway,
            Self::CheckoutInProgress | Self::OrderConflict(_) => CheckoutErrorKind::Conflict,
            Self::Session(_) | Self::Repository(_) => CheckoutErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for CheckoutError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(message) => Self::OrderConflict(message),
            other => Self::Repository(other),
        }
    }
}

impl From<PaymentError> for CheckoutError {
    fn from(err: PaymentError) -> Self {
        Self::Gateway(err)
    }
}
