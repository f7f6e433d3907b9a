use anchor_lang::prelude::*;

use crate::constants::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::errors::VaultError;

/// Registry entry for a donation recipient. Records are never closed.
#[account]
#[derive(Default)]
pub struct Beneficiary {
    /// Registry index; also the PDA seed
    pub id: u16,

    /// Wallet whose associated token account receives donations
    pub payout: Pubkey,

    /// Cumulative donations received
    pub total_received: u64,

    /// Number of claims that paid this beneficiary
    pub donor_count: u64,

    /// Inactive beneficiaries cannot be newly selected
    pub active: bool,

    pub name: String,

    pub description: String,

    pub created_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Beneficiary {
    pub const LEN: usize = 8 + // discriminator
        2 + // id
        32 + // payout
        8 + // total_received
        8 + // donor_count
        1 + // active
        4 + MAX_NAME_LEN + // name
        4 + MAX_DESCRIPTION_LEN + // description
        8 + // created_at
        1; // bump

    pub fn validate_metadata(name: &str, description: &str) -> Result<()> {
        require!(name.len() <= MAX_NAME_LEN, VaultError::MetadataTooLong);
        require!(
            description.len() <= MAX_DESCRIPTION_LEN,
            VaultError::MetadataTooLong
        );
        Ok(())
    }

    /// Counter update for one donation; computed without mutating so a claim
    /// can stage every beneficiary before committing any.
    pub fn credited(&self, amount: u64) -> Result<(u64, u64)> {
        let total_received = self
            .total_received
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let donor_count = self
            .donor_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        Ok((total_received, donor_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_limits() {
        assert!(Beneficiary::validate_metadata("Food Bank", "Local pantry").is_ok());
        assert!(Beneficiary::validate_metadata(&"x".repeat(MAX_NAME_LEN + 1), "").is_err());
        assert!(
            Beneficiary::validate_metadata("ok", &"y".repeat(MAX_DESCRIPTION_LEN + 1)).is_err()
        );
    }

    #[test]
    fn test_credited_does_not_mutate() {
        let beneficiary = Beneficiary {
            total_received: 40,
            donor_count: 2,
            ..Default::default()
        };
        assert_eq!(beneficiary.credited(10).unwrap(), (50, 3));
        assert_eq!(beneficiary.total_received, 40);

        let full = Beneficiary {
            total_received: u64::MAX,
            ..Default::default()
        };
        assert!(full.credited(1).is_err());
    }
}
