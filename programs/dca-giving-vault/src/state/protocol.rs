use anchor_lang::prelude::*;

use crate::errors::VaultError;

#[account]
#[derive(Default)]
pub struct ProtocolState {
    /// Admin allowed to pause, reconfigure and manage the beneficiary registry
    pub authority: Pubkey,

    /// Principal asset (e.g. USDC)
    pub deposit_mint: Pubkey,

    /// Asset principal is converted into
    pub converted_mint: Pubkey,

    /// Program-owned vault for the deposit mint (staging for supply/withdraw and harvested yield)
    pub deposit_vault: Pubkey,

    /// Program-owned vault holding converted balances
    pub converted_vault: Pubkey,

    /// External lending program principal is deployed into
    pub yield_program: Pubkey,

    /// External swap program used for scheduled conversions
    pub exchange_program: Pubkey,

    /// Minimum seconds between two conversions of the same position
    pub swap_interval: i64,

    /// Minimum principal accepted by open
    pub min_deposit: u64,

    /// Stop-the-world switch for every mutating ledger operation
    pub paused: bool,

    pub next_position_id: u64,

    /// Number of registered beneficiaries; also the next beneficiary id
    pub beneficiary_count: u16,

    /// Sum of remaining principal across active positions
    pub total_principal_locked: u64,

    pub active_position_count: u64,

    pub total_swaps_executed: u64,

    /// Sum of every position's total_yield_earned
    pub total_yield_harvested: u64,

    /// Yield ever collected from the yield source
    pub cumulative_yield: u64,

    /// Bump seed for PDA derivation
    pub bump: u8,

    pub vault_authority_bump: u8,

    /// Reserved space for future upgrades
    pub _reserved: [u8; 32],
}

impl ProtocolState {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        32 + // deposit_mint
        32 + // converted_mint
        32 + // deposit_vault
        32 + // converted_vault
        32 + // yield_program
        32 + // exchange_program
        8 + // swap_interval
        8 + // min_deposit
        1 + // paused
        8 + // next_position_id
        2 + // beneficiary_count
        8 + // total_principal_locked
        8 + // active_position_count
        8 + // total_swaps_executed
        8 + // total_yield_harvested
        8 + // cumulative_yield
        1 + // bump
        1 + // vault_authority_bump
        32; // _reserved

    pub fn require_authority(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.authority, VaultError::Unauthorized);
        Ok(())
    }

    pub fn require_not_paused(&self) -> Result<()> {
        require!(!self.paused, VaultError::ProtocolPaused);
        Ok(())
    }

    /// Yield collected from the source that no position has been credited with yet
    pub fn unattributed_yield(&self) -> u64 {
        self.cumulative_yield.saturating_sub(self.total_yield_harvested)
    }

    pub fn allocate_position_id(&mut self) -> Result<u64> {
        let id = self.next_position_id;
        self.next_position_id = id.checked_add(1).ok_or(VaultError::MathOverflow)?;
        Ok(id)
    }

    pub fn allocate_beneficiary_id(&mut self) -> Result<u16> {
        let id = self.beneficiary_count;
        self.beneficiary_count = id.checked_add(1).ok_or(VaultError::MathOverflow)?;
        Ok(id)
    }

    /// Attribution may never hand out more than has been collected.
    pub fn check_conservation(&self) -> Result<()> {
        require!(
            self.total_yield_harvested <= self.cumulative_yield,
            VaultError::InvariantViolation
        );
        Ok(())
    }
}
