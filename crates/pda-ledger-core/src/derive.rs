//! Deterministic address derivation.
//!
//! An address is `Blake3(ADDRESS_DOMAIN || program || owner || SEPARATOR || category || bump)`
//! for the highest `bump` whose hash is not a valid Ed25519 point. Such an
//! address has no private key, so only the ledger program acting on behalf of
//! the deriving owner can write to it.

use crate::crypto::Identity;
use crate::error::CoreError;
use crate::types::{CategoryKey, DerivedAddress, ProgramId};

/// Domain tag separating ledger addresses from every other Blake3 use.
pub const ADDRESS_DOMAIN: &[u8] = b"pda-ledger-address-v0:";

/// Separator between the owner and category seeds.
pub const SEPARATOR: &[u8] = b"_";

/// Seed bytes for an (owner, category) pair: `owner || SEPARATOR || category`.
pub fn seeds(owner: &Identity, category: &CategoryKey) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32 + SEPARATOR.len() + category.as_bytes().len());
    buf.extend_from_slice(owner.as_bytes());
    buf.extend_from_slice(SEPARATOR);
    buf.extend_from_slice(category.as_bytes());
    buf
}

fn candidate(program: &ProgramId, seeds: &[u8], bump: u8) -> DerivedAddress {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(program.as_bytes());
    hasher.update(seeds);
    hasher.update(&[bump]);
    DerivedAddress(*hasher.finalize().as_bytes())
}

/// Compute the address for a known bump.
///
/// Fails with `OnCurve` if the candidate for that bump is a valid point.
pub fn create_address(
    program: &ProgramId,
    owner: &Identity,
    category: &CategoryKey,
    bump: u8,
) -> Result<DerivedAddress, CoreError> {
    let address = candidate(program, &seeds(owner, category), bump);
    if address.is_on_curve() {
        return Err(CoreError::OnCurve(bump));
    }
    Ok(address)
}

/// Find the address and bump for an (owner, category) pair.
///
/// Bumps are tried from 255 downward; the first off-curve candidate wins.
pub fn derive(
    program: &ProgramId,
    owner: &Identity,
    category: &CategoryKey,
) -> Result<(DerivedAddress, u8), CoreError> {
    let seeds = seeds(owner, category);
    for bump in (0..=u8::MAX).rev() {
        let address = candidate(program, &seeds, bump);
        if !address.is_on_curve() {
            return Ok((address, bump));
        }
    }
    Err(CoreError::DerivationExhausted)
}

/// Derivation bound to a single program namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressDeriver {
    program: ProgramId,
}

impl AddressDeriver {
    pub fn new(program: ProgramId) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &ProgramId {
        &self.program
    }

    pub fn derive(
        &self,
        owner: &Identity,
        category: &CategoryKey,
    ) -> Result<(DerivedAddress, u8), CoreError> {
        derive(&self.program, owner, category)
    }

    pub fn create_address(
        &self,
        owner: &Identity,
        category: &CategoryKey,
        bump: u8,
    ) -> Result<DerivedAddress, CoreError> {
        create_address(&self.program, owner, category, bump)
    }
}
