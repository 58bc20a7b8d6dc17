//! Authorization gate for ledger mutations.
//!
//! The owner binding of an account is structural: the address is derived from
//! the owner's identity, so an instruction is authorized iff
//!
//! 1. its signature verifies against the claimed authority, and
//! 2. re-deriving from (authority, category) lands on the targeted address.
//!
//! Nothing about the owner is stored alongside the record.

use crate::derive::AddressDeriver;
use crate::error::AuthError;
use crate::instruction::{CreateInstruction, Signed, UpdateInstruction};
use crate::record::LedgerRecord;
use crate::types::ProgramId;

/// Checks that only the deriving owner creates or mutates its records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationGate {
    deriver: AddressDeriver,
}

impl AuthorizationGate {
    pub fn new(program: ProgramId) -> Self {
        Self {
            deriver: AddressDeriver::new(program),
        }
    }

    pub fn program(&self) -> &ProgramId {
        self.deriver.program()
    }

    /// Authorize allocation of a new record.
    ///
    /// The address and bump must be exactly the pair the authority derives
    /// for the requested category. Any other off-curve bump is rejected, so
    /// an (owner, category) pair can never occupy more than one address.
    pub fn authorize_create(&self, signed: &Signed<CreateInstruction>) -> Result<(), AuthError> {
        signed.verify().map_err(|_| AuthError::SignatureFailed)?;

        let ix = &signed.instruction;
        let (expected, bump) = self
            .deriver
            .derive(&ix.authority, &ix.category)
            .map_err(|_| AuthError::Underivable)?;
        if expected != ix.address {
            return Err(AuthError::AddressMismatch {
                expected,
                got: ix.address,
            });
        }
        if bump != ix.bump {
            return Err(AuthError::InvalidBump(ix.bump));
        }
        Ok(())
    }

    /// Authorize a balance update against the stored record.
    ///
    /// The category comes from the stored record, never from the caller.
    pub fn authorize_update(
        &self,
        record: &LedgerRecord,
        signed: &Signed<UpdateInstruction>,
    ) -> Result<(), AuthError> {
        signed.verify().map_err(|_| AuthError::SignatureFailed)?;

        let ix = &signed.instruction;
        let (expected, _) = self
            .deriver
            .derive(&ix.authority, &record.category)
            .map_err(|_| AuthError::Underivable)?;
        if expected != ix.address {
            return Err(AuthError::AddressMismatch {
                expected,
                got: ix.address,
            });
        }
        Ok(())
    }
}
