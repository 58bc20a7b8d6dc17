//! # PDA Ledger Testkit
//!
//! Testing utilities for the PDA Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Derivation vectors**: Known inputs whose addresses must match across implementations
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Derivation Vectors
//!
//! ```rust
//! use pda_ledger_testkit::vectors::{all_vectors, derive_from_vector};
//!
//! for vector in all_vectors() {
//!     let (address, bump) = derive_from_vector(&vector);
//!     println!("{}: {} (bump {})", vector.name, address.to_hex(), bump);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pda_ledger_testkit::generators::{address_from_params, DerivationParams};
//!
//! proptest! {
//!     #[test]
//!     fn derivation_is_deterministic(params: DerivationParams) {
//!         prop_assert_eq!(address_from_params(&params), address_from_params(&params));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pda_ledger_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let (address, _bump) = fixture.address("red");
//! assert!(!address.is_on_curve());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{address_from_params, DerivationParams};
pub use vectors::{all_vectors, derive_from_vector, verify_all_vectors, DerivationVector};
