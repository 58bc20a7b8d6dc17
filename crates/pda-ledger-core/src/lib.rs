//! # PDA Ledger Core
//!
//! Pure primitives for the PDA Ledger: deterministic address derivation,
//! ledger records, and signed instructions.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`DerivedAddress`] - Off-curve storage location for one (owner, category) pair
//! - [`AddressDeriver`] - Finds the address and its discriminant ("bump")
//! - [`LedgerRecord`] - The persisted `{category, balance}` pair
//! - [`CreateInstruction`] / [`UpdateInstruction`] - Signed mutation requests
//! - [`AuthorizationGate`] - Proves the signer is the deriving owner
//!
//! ## Derivation
//!
//! ```rust
//! use pda_ledger_core::{derive, CategoryKey, Keypair, ProgramId};
//!
//! let owner = Keypair::from_seed(&[7u8; 32]);
//! let red = CategoryKey::new("red").unwrap();
//! let (address, bump) = derive(&ProgramId::default(), &owner.identity(), &red).unwrap();
//! assert!(!address.is_on_curve());
//! # let _ = bump;
//! ```

pub mod auth;
pub mod canonical;
pub mod crypto;
pub mod derive;
pub mod error;
pub mod instruction;
pub mod record;
pub mod types;

pub use auth::AuthorizationGate;
pub use crypto::{Ed25519Signature, Identity, Keypair};
pub use derive::{create_address, derive, AddressDeriver, ADDRESS_DOMAIN, SEPARATOR};
pub use error::{AuthError, CoreError};
pub use instruction::{CreateInstruction, Instruction, Signed, UpdateInstruction};
pub use record::LedgerRecord;
pub use types::{CategoryKey, DerivedAddress, ProgramId, MAX_CATEGORY_LEN};
