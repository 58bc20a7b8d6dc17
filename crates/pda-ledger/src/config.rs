//! Configuration for the ledger service.

use pda_ledger_core::ProgramId;

/// Configuration for the [`LedgerService`](crate::LedgerService).
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Namespace that owns every derived address.
    pub program_id: ProgramId,
    /// Extra passes through creation allowed after the first one.
    pub create_retries: u32,
    /// Re-read the record after a successful create instead of trusting the
    /// create response.
    pub verify_after_create: bool,
}

impl LedgerConfig {
    pub fn with_program(mut self, program_id: ProgramId) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_create_retries(mut self, create_retries: u32) -> Self {
        self.create_retries = create_retries;
        self
    }

    pub fn with_verify_after_create(mut self, verify: bool) -> Self {
        self.verify_after_create = verify;
        self
    }

    /// Upper bound on passes through the creation step.
    pub fn creation_budget(&self) -> u32 {
        self.create_retries.saturating_add(1)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            program_id: ProgramId::default(),
            create_retries: 1,
            verify_after_create: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.program_id, ProgramId::default());
        assert_eq!(config.creation_budget(), 2);
        assert!(config.verify_after_create);
    }

    #[test]
    fn test_builders() {
        let config = LedgerConfig::default()
            .with_program(ProgramId::from_name("colors"))
            .with_create_retries(u32::MAX)
            .with_verify_after_create(false);

        assert_eq!(config.program_id, ProgramId::from_name("colors"));
        assert_eq!(config.creation_budget(), u32::MAX);
        assert!(!config.verify_after_create);
    }
}
