//! Instruction builders shared by the store tests.

use pda_ledger_core::{
    create_address, derive, CategoryKey, CreateInstruction, DerivedAddress, Keypair, ProgramId, Signed,
    UpdateInstruction,
};

pub fn address_of(owner: &Keypair, category: &str) -> (DerivedAddress, u8) {
    let category = CategoryKey::new(category).unwrap();
    derive(&ProgramId::default(), &owner.identity(), &category).unwrap()
}

pub fn signed_create(owner: &Keypair, category: &str) -> Signed<CreateInstruction> {
    let (address, bump) = address_of(owner, category);
    let ix = CreateInstruction {
        address,
        bump,
        category: CategoryKey::new(category).unwrap(),
        authority: owner.identity(),
    };
    Signed::sign(ix, owner).unwrap()
}

/// Creates that use a lower off-curve bump than the derived one.
///
/// The first targets the address that bump produces. The second keeps the
/// derived address but carries the lower bump.
pub fn noncanonical_creates(
    owner: &Keypair,
    category: &str,
) -> (Signed<CreateInstruction>, Signed<CreateInstruction>) {
    let key = CategoryKey::new(category).unwrap();
    let (canonical, canonical_bump) = address_of(owner, category);
    let (address, bump) = (0..canonical_bump)
        .rev()
        .find_map(|b| {
            create_address(&ProgramId::default(), &owner.identity(), &key, b)
                .ok()
                .map(|a| (a, b))
        })
        .unwrap();

    let at = |address| {
        let ix = CreateInstruction {
            address,
            bump,
            category: key.clone(),
            authority: owner.identity(),
        };
        Signed::sign(ix, owner).unwrap()
    };
    (at(address), at(canonical))
}

/// Update targeting `owner`'s record, claimed and signed by `signer`.
pub fn signed_update(
    owner: &Keypair,
    signer: &Keypair,
    category: &str,
    balance: u64,
) -> Signed<UpdateInstruction> {
    let (address, _) = address_of(owner, category);
    let ix = UpdateInstruction {
        address,
        balance,
        authority: signer.identity(),
    };
    Signed::sign(ix, signer).unwrap()
}
