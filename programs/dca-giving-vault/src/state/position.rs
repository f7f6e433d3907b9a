use anchor_lang::prelude::*;

use crate::constants::MAX_BENEFICIARIES;
use crate::errors::VaultError;

#[account]
#[derive(Default)]
pub struct Position {
    /// Owner wallet; also the PDA seed
    pub owner: Pubkey,

    /// Protocol-wide sequence number, reassigned when the owner re-opens
    pub position_id: u64,

    /// Principal at open
    pub principal_deposited: u64,

    /// 1% of principal_deposited, fixed at open
    pub per_swap_amount: u64,

    /// Principal converted so far (sum of swap inputs)
    pub principal_swapped: u64,

    /// Converted-asset balance credited by swaps
    pub swapped_balance: u64,

    pub last_swap_time: i64,

    pub swaps_executed: u64,

    /// Share of claimed yield donated, in bps
    pub donation_bps: u16,

    /// Selected beneficiary ids; only the first `beneficiary_count` are meaningful
    pub beneficiaries: [u16; MAX_BENEFICIARIES],

    pub beneficiary_count: u8,

    pub total_yield_earned: u64,

    pub yield_donated: u64,

    pub yield_claimed: u64,

    /// Attributed but unclaimed yield
    pub pending_yield: u64,

    pub active: bool,

    pub created_at: i64,

    pub closed_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,

    /// Reserved space for future upgrades
    pub _reserved: [u8; 32],
}

impl Position {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        8 + // position_id
        8 + // principal_deposited
        8 + // per_swap_amount
        8 + // principal_swapped
        8 + // swapped_balance
        8 + // last_swap_time
        8 + // swaps_executed
        2 + // donation_bps
        2 * MAX_BENEFICIARIES + // beneficiaries
        1 + // beneficiary_count
        8 + // total_yield_earned
        8 + // yield_donated
        8 + // yield_claimed
        8 + // pending_yield
        1 + // active
        8 + // created_at
        8 + // closed_at
        1 + // bump
        32; // _reserved

    pub fn remaining_principal(&self) -> u64 {
        self.principal_deposited.saturating_sub(self.principal_swapped)
    }

    pub fn selected_beneficiaries(&self) -> &[u16] {
        let count = (self.beneficiary_count as usize).min(MAX_BENEFICIARIES);
        &self.beneficiaries[..count]
    }

    /// Stores an already validated election.
    pub fn set_election(&mut self, donation_bps: u16, beneficiaries: &[u16]) {
        self.donation_bps = donation_bps;
        self.beneficiaries = [0; MAX_BENEFICIARIES];
        self.beneficiaries[..beneficiaries.len()].copy_from_slice(beneficiaries);
        self.beneficiary_count = beneficiaries.len() as u8;
    }

    pub fn require_active(&self) -> Result<()> {
        require!(self.active, VaultError::NoActivePosition);
        Ok(())
    }

    /// Principal is never over-converted and every unit of earned yield is
    /// either donated, claimed or still pending.
    pub fn check_conservation(&self) -> Result<()> {
        require!(
            self.principal_swapped <= self.principal_deposited,
            VaultError::InvariantViolation
        );

        let accounted = (self.yield_donated as u128)
            + (self.yield_claimed as u128)
            + (self.pending_yield as u128);
        require!(
            accounted == self.total_yield_earned as u128,
            VaultError::InvariantViolation
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_principal_tracks_swapped_input() {
        let position = Position {
            principal_deposited: 1_055,
            per_swap_amount: 10,
            principal_swapped: 1_050,
            swaps_executed: 105,
            ..Default::default()
        };
        assert_eq!(position.remaining_principal(), 5);
    }

    #[test]
    fn test_election_roundtrip() {
        let mut position = Position::default();
        position.set_election(500, &[3, 1, 4]);

        assert_eq!(position.donation_bps, 500);
        assert_eq!(position.selected_beneficiaries(), &[3, 1, 4]);

        position.set_election(100, &[2]);
        assert_eq!(position.selected_beneficiaries(), &[2]);
        assert_eq!(position.beneficiaries, [2, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_conservation_detects_leak() {
        let mut position = Position {
            total_yield_earned: 1_000,
            yield_donated: 100,
            yield_claimed: 900,
            ..Default::default()
        };
        assert!(position.check_conservation().is_ok());

        position.pending_yield = 1;
        assert!(position.check_conservation().is_err());
    }

    #[test]
    fn test_inactive_position_rejected() {
        let position = Position::default();
        assert!(position.require_active().is_err());
    }
}
