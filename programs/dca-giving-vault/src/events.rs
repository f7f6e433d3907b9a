use anchor_lang::prelude::*;

use crate::ledger::batch::BatchOperation;

#[event]
pub struct ProtocolInitialized {
    pub authority: Pubkey,
    pub deposit_mint: Pubkey,
    pub converted_mint: Pubkey,
    pub swap_interval: i64,
    pub min_deposit: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProtocolUpdated {
    pub authority: Pubkey,
    pub paused: bool,
    pub swap_interval: i64,
    pub min_deposit: u64,
    pub timestamp: i64,
}

#[event]
pub struct BeneficiaryAdded {
    pub id: u16,
    pub payout: Pubkey,
    pub name: String,
    pub timestamp: i64,
}

#[event]
pub struct BeneficiaryStatusChanged {
    pub id: u16,
    pub active: bool,
    pub timestamp: i64,
}

#[event]
pub struct PositionOpened {
    pub owner: Pubkey,
    pub position_id: u64,
    pub principal: u64,
    pub per_swap_amount: u64,
    pub donation_bps: u16,
    pub beneficiaries: Vec<u16>,
    pub timestamp: i64,
}

#[event]
pub struct PositionClosed {
    pub owner: Pubkey,
    pub position_id: u64,
    pub principal_returned: u64,
    pub swapped_balance_returned: u64,
    pub timestamp: i64,
}

#[event]
pub struct DonationElectionUpdated {
    pub owner: Pubkey,
    pub position_id: u64,
    pub donation_bps: u16,
    pub beneficiaries: Vec<u16>,
    pub timestamp: i64,
}

#[event]
pub struct SwapExecuted {
    pub owner: Pubkey,
    pub position_id: u64,
    pub amount_in: u64,
    pub amount_out: u64,
    pub swaps_executed: u64,
    pub remaining_principal: u64,
    pub timestamp: i64,
}

#[event]
pub struct YieldAccrued {
    pub owner: Pubkey,
    pub position_id: u64,
    pub harvested: u64,
    pub new_yield: u64,
    pub pending_yield: u64,
    pub timestamp: i64,
}

#[event]
pub struct YieldClaimed {
    pub owner: Pubkey,
    pub position_id: u64,
    pub total: u64,
    pub user_amount: u64,
    pub donated: u64,
    pub timestamp: i64,
}

#[event]
pub struct DonationPaid {
    pub owner: Pubkey,
    pub beneficiary_id: u16,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct BatchExecuted {
    pub operation: BatchOperation,
    pub attempted: u32,
    pub succeeded: u32,
    pub timestamp: i64,
}

#[event]
pub struct BatchItemSkipped {
    pub operation: BatchOperation,
    pub owner: Pubkey,
    pub error_code: u32,
    pub timestamp: i64,
}
