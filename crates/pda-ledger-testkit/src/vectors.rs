//! Derivation vectors for deterministic verification.
//!
//! These vectors pin the (program, owner, category) to (address, bump)
//! mapping so that every client of a ledger derives the same locations.

use pda_ledger_core::{derive, CategoryKey, DerivedAddress, Keypair, ProgramId};
use serde::Serialize;

/// A derivation test vector.
#[derive(Debug, Clone)]
pub struct DerivationVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    /// Program name, `None` for the default program.
    pub program: Option<&'static str>,
    /// Category key.
    pub category: &'static str,
    /// Expected address (hex).
    pub expected_address: &'static str,
    /// Expected discriminant.
    pub expected_bump: u8,
}

/// What a vector derives to, in exportable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationResult {
    pub name: String,
    pub owner: String,
    pub program: String,
    pub category: String,
    pub address: String,
    pub bump: u8,
}

/// Get all derivation vectors.
pub fn all_vectors() -> Vec<DerivationVector> {
    vec![
        DerivationVector {
            name: "first owner, red",
            seed: [0x11; 32],
            program: None,
            category: "red",
            expected_address: "5769c38859b0d8c76b94b88795b06f641c5407574b04436c63e994b2f9737e53",
            expected_bump: 255,
        },
        DerivationVector {
            name: "first owner, blue",
            seed: [0x11; 32],
            program: None,
            category: "blue",
            expected_address: "2e0a9dfa4f738430a47c1e3bf57dd62e151403dd24b818a52a4aba5ecabb43cd",
            expected_bump: 255,
        },
        DerivationVector {
            name: "second owner, red",
            seed: [0x22; 32],
            program: None,
            category: "red",
            expected_address: "2a5b7ad5c86c7ae363c8290116e9fe4aff4349f6c8a55ef1f2010503fd1c9ba5",
            expected_bump: 255,
        },
        DerivationVector {
            name: "second owner, green",
            seed: [0x22; 32],
            program: None,
            category: "green",
            expected_address: "b989a2ec6aa140919501a7014ddcae927912bdc3cfce06c2be56b108f5d3d777",
            expected_bump: 255,
        },
        DerivationVector {
            name: "longest category",
            seed: [0x00; 32],
            program: None,
            category: "abcdefghijklmnopqrstuvwxyz012345",
            expected_address: "2c432e021c7a27b9515be050bc7462c2463df9494d2e8c96dd379b66b13f48ec",
            expected_bump: 254,
        },
        DerivationVector {
            name: "named program",
            seed: [0x11; 32],
            program: Some("colors"),
            category: "red",
            expected_address: "dc3134b393b7391d96fe7329a7dd578bf60f88535712f0cc715e638ea13169fc",
            expected_bump: 254,
        },
    ]
}

fn program_of(vector: &DerivationVector) -> ProgramId {
    vector
        .program
        .map(ProgramId::from_name)
        .unwrap_or_default()
}

/// Derive the address a vector describes.
pub fn derive_from_vector(vector: &DerivationVector) -> (DerivedAddress, u8) {
    let keypair = Keypair::from_seed(&vector.seed);
    let category = CategoryKey::new(vector.category).expect("vector category is valid");
    derive(&program_of(vector), &keypair.identity(), &category)
        .expect("derivation finds an off-curve address")
}

/// Derive every vector into its exportable result.
pub fn derive_all() -> Vec<DerivationResult> {
    all_vectors()
        .iter()
        .map(|v| {
            let (address, bump) = derive_from_vector(v);
            DerivationResult {
                name: v.name.to_string(),
                owner: Keypair::from_seed(&v.seed).identity().to_hex(),
                program: program_of(v).to_hex(),
                category: v.category.to_string(),
                address: address.to_hex(),
                bump,
            }
        })
        .collect()
}

/// Render every vector's result as pretty JSON for other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&derive_all())
}

/// Verify all vectors against their expected address and bump.
///
/// Call this to verify your implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let (address, bump) = derive_from_vector(v);
            let hex = address.to_hex();
            let matches = hex == v.expected_address && bump == v.expected_bump;

            (v.name.to_string(), matches, hex)
        })
        .collect()
}
