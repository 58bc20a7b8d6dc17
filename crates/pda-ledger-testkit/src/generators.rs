//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pda_ledger_core::{derive, CategoryKey, DerivedAddress, Identity, Keypair, ProgramId};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate the identity of a random keypair.
pub fn identity() -> impl Strategy<Value = Identity> {
    keypair().prop_map(|kp| kp.identity())
}

/// Generate a ProgramId.
pub fn program_id() -> impl Strategy<Value = ProgramId> {
    any::<[u8; 32]>().prop_map(ProgramId::from_bytes)
}

/// Generate a category name that always validates.
pub fn category_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}".prop_map(String::from)
}

/// Generate a valid CategoryKey.
pub fn category() -> impl Strategy<Value = CategoryKey> {
    category_name().prop_map(|name| CategoryKey::new(name).expect("pattern yields valid keys"))
}

/// Generate a balance across the full range.
pub fn balance() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Parameters for deriving an address.
#[derive(Debug, Clone)]
pub struct DerivationParams {
    pub program: ProgramId,
    pub keypair: Keypair,
    pub category: CategoryKey,
}

impl Arbitrary for DerivationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop_oneof![Just(ProgramId::default()), program_id()],
            any::<[u8; 32]>(), // seed
            category(),
        )
            .prop_map(|(program, seed, category)| DerivationParams {
                program,
                keypair: Keypair::from_seed(&seed),
                category,
            })
            .boxed()
    }
}

/// Derive the address described by the parameters.
pub fn address_from_params(params: &DerivationParams) -> (DerivedAddress, u8) {
    derive(&params.program, &params.keypair.identity(), &params.category)
        .expect("derivation finds an off-curve address")
}
