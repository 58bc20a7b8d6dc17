//! Signed instructions submitted to an account store.
//!
//! Each instruction names its authority and is signed by that authority over
//! `DOMAIN || canonical CBOR(instruction)`. The domain differs per instruction
//! kind so a signature over one can never be replayed as the other.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::canonical::{bytes32, decode, encode_canonical, map_get, text, uint};
use crate::crypto::{Ed25519Signature, Identity, Keypair};
use crate::error::CoreError;
use crate::types::{CategoryKey, DerivedAddress};

/// Field keys (integer keys for compact encoding).
mod keys {
    pub const ADDRESS: u64 = 0;
    pub const BUMP: u64 = 1;
    pub const CATEGORY: u64 = 2;
    pub const BALANCE: u64 = 3;
    pub const AUTHORITY: u64 = 4;
}

/// Common behavior of instructions that can be signed.
pub trait Instruction: Sized {
    /// Domain tag prepended to the canonical bytes before signing.
    const DOMAIN: &'static [u8];

    /// The identity claiming authority over the target.
    fn authority(&self) -> &Identity;

    fn to_cbor_value(&self) -> Value;

    fn from_cbor_value(value: &Value) -> Result<Self, CoreError>;

    fn canonical_bytes(&self) -> Result<Vec<u8>, CoreError> {
        encode_canonical(&self.to_cbor_value())
    }

    fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Self::from_cbor_value(&decode(bytes)?)
    }

    /// The exact message the authority signs.
    fn signing_message(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Self::DOMAIN.to_vec();
        buf.extend_from_slice(&self.canonical_bytes()?);
        Ok(buf)
    }
}

/// Request to allocate a fresh record at a derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInstruction {
    pub address: DerivedAddress,
    pub bump: u8,
    pub category: CategoryKey,
    pub authority: Identity,
}

impl Instruction for CreateInstruction {
    const DOMAIN: &'static [u8] = b"pda-ledger-create-v0:";

    fn authority(&self) -> &Identity {
        &self.authority
    }

    fn to_cbor_value(&self) -> Value {
        Value::Map(vec![
            (
                Value::Integer(keys::ADDRESS.into()),
                Value::Bytes(self.address.0.to_vec()),
            ),
            (Value::Integer(keys::BUMP.into()), Value::Integer(self.bump.into())),
            (
                Value::Integer(keys::CATEGORY.into()),
                Value::Text(self.category.as_str().to_string()),
            ),
            (
                Value::Integer(keys::AUTHORITY.into()),
                Value::Bytes(self.authority.0.to_vec()),
            ),
        ])
    }

    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let Value::Map(entries) = value else {
            return Err(CoreError::DecodingError("create instruction must be a map".into()));
        };

        let bump = uint(map_get(entries, keys::BUMP), "bump")?;
        Ok(Self {
            address: DerivedAddress(bytes32(map_get(entries, keys::ADDRESS), "address")?),
            bump: u8::try_from(bump)
                .map_err(|_| CoreError::DecodingError("bump out of range".into()))?,
            category: CategoryKey::new(text(map_get(entries, keys::CATEGORY), "category")?)?,
            authority: Identity(bytes32(map_get(entries, keys::AUTHORITY), "authority")?),
        })
    }
}

/// Request to replace the balance of an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInstruction {
    pub address: DerivedAddress,
    pub balance: u64,
    pub authority: Identity,
}

impl Instruction for UpdateInstruction {
    const DOMAIN: &'static [u8] = b"pda-ledger-update-v0:";

    fn authority(&self) -> &Identity {
        &self.authority
    }

    fn to_cbor_value(&self) -> Value {
        Value::Map(vec![
            (
                Value::Integer(keys::ADDRESS.into()),
                Value::Bytes(self.address.0.to_vec()),
            ),
            (
                Value::Integer(keys::BALANCE.into()),
                Value::Integer(self.balance.into()),
            ),
            (
                Value::Integer(keys::AUTHORITY.into()),
                Value::Bytes(self.authority.0.to_vec()),
            ),
        ])
    }

    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let Value::Map(entries) = value else {
            return Err(CoreError::DecodingError("update instruction must be a map".into()));
        };

        Ok(Self {
            address: DerivedAddress(bytes32(map_get(entries, keys::ADDRESS), "address")?),
            balance: uint(map_get(entries, keys::BALANCE), "balance")?,
            authority: Identity(bytes32(map_get(entries, keys::AUTHORITY), "authority")?),
        })
    }
}

/// An instruction together with its authority's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed<I> {
    pub instruction: I,
    pub signature: Ed25519Signature,
}

impl<I: Instruction> Signed<I> {
    /// Sign an instruction with the given keypair.
    ///
    /// The keypair does not have to match the instruction's authority; a
    /// mismatch is caught when the instruction is authorized.
    pub fn sign(instruction: I, keypair: &Keypair) -> Result<Self, CoreError> {
        let signature = keypair.sign(&instruction.signing_message()?);
        Ok(Self {
            instruction,
            signature,
        })
    }

    /// Verify the signature against the instruction's authority.
    pub fn verify(&self) -> Result<(), CoreError> {
        let message = self.instruction.signing_message()?;
        self.instruction.authority().verify(&message, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_ix(keypair: &Keypair) -> CreateInstruction {
        CreateInstruction {
            address: DerivedAddress::from_bytes([0x11; 32]),
            bump: 254,
            category: CategoryKey::new("red").unwrap(),
            authority: keypair.identity(),
        }
    }

    #[test]
    fn test_signed_create_verifies() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let signed = Signed::sign(create_ix(&keypair), &keypair).unwrap();
        signed.verify().expect("own signature should verify");
    }

    #[test]
    fn test_signature_by_other_key_fails() {
        let owner = Keypair::from_seed(&[1u8; 32]);
        let intruder = Keypair::from_seed(&[2u8; 32]);
        let signed = Signed::sign(create_ix(&owner), &intruder).unwrap();
        assert!(matches!(signed.verify(), Err(CoreError::InvalidSignature)));
    }

    #[test]
    fn test_tampered_balance_fails() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let ix = UpdateInstruction {
            address: DerivedAddress::from_bytes([0x22; 32]),
            balance: 2,
            authority: keypair.identity(),
        };
        let mut signed = Signed::sign(ix, &keypair).unwrap();
        signed.instruction.balance = 2_000_000;
        assert!(signed.verify().is_err());
    }

    #[test]
    fn test_domains_differ() {
        assert_ne!(CreateInstruction::DOMAIN, UpdateInstruction::DOMAIN);
    }

    #[test]
    fn test_create_wire_decode() {
        let keypair = Keypair::from_seed(&[3u8; 32]);
        let ix = create_ix(&keypair);
        let bytes = ix.canonical_bytes().unwrap();
        assert_eq!(CreateInstruction::from_canonical_bytes(&bytes).unwrap(), ix);
    }

    #[test]
    fn test_update_wire_decode_large_balance() {
        let keypair = Keypair::from_seed(&[3u8; 32]);
        let ix = UpdateInstruction {
            address: DerivedAddress::from_bytes([0x33; 32]),
            balance: u64::MAX,
            authority: keypair.identity(),
        };
        let bytes = ix.canonical_bytes().unwrap();
        assert_eq!(UpdateInstruction::from_canonical_bytes(&bytes).unwrap(), ix);
    }

    #[test]
    fn test_decode_rejects_invalid_category() {
        let value = Value::Map(vec![
            (Value::Integer(keys::ADDRESS.into()), Value::Bytes(vec![0; 32])),
            (Value::Integer(keys::BUMP.into()), Value::Integer(255.into())),
            (Value::Integer(keys::CATEGORY.into()), Value::Text(String::new())),
            (Value::Integer(keys::AUTHORITY.into()), Value::Bytes(vec![0; 32])),
        ]);
        assert!(matches!(
            CreateInstruction::from_cbor_value(&value),
            Err(CoreError::InvalidCategory(_))
        ));
    }
}
