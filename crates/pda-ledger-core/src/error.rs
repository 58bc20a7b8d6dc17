//! Error types for the PDA Ledger Core.

use thiserror::Error;

use crate::types::DerivedAddress;

/// Core errors that can occur during derivation and encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no discriminant in 0..=255 yields an off-curve address")]
    DerivationExhausted,

    #[error("derived candidate for bump {0} lies on the curve")]
    OnCurve(u8),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Authorization failures raised by the [`AuthorizationGate`](crate::AuthorizationGate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("authority does not derive the target address: expected {expected}, got {got}")]
    AddressMismatch {
        expected: DerivedAddress,
        got: DerivedAddress,
    },

    #[error("bump {0} is not the canonical discriminant for this address")]
    InvalidBump(u8),

    #[error("authority derives no address for this category")]
    Underivable,
}
