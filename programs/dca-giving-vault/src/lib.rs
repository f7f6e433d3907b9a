use anchor_lang::prelude::*;

pub mod adapters;
pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod invariant_tests;

use instructions::*;
use ledger::batch::BatchOperation;

declare_id!("8ZT9LXZbqM7U6Q5fJYte4tjYUdMm4VK6VEbrkdgJFXe9");

#[program]
pub mod dca_giving_vault {
    use super::*;

    /// Create the protocol singleton, vaults and vault authority
    pub fn initialize_protocol(
        ctx: Context<InitializeProtocol>,
        swap_interval: Option<i64>,
        min_deposit: Option<u64>,
    ) -> Result<()> {
        instructions::initialize_protocol(ctx, swap_interval, min_deposit)
    }

    /// Pause/unpause, retune the schedule or hand over authority
    pub fn update_protocol(
        ctx: Context<UpdateProtocol>,
        paused: Option<bool>,
        swap_interval: Option<i64>,
        min_deposit: Option<u64>,
        new_authority: Option<Pubkey>,
    ) -> Result<()> {
        instructions::update_protocol(ctx, paused, swap_interval, min_deposit, new_authority)
    }

    /// Register a beneficiary under the next sequential id
    pub fn add_beneficiary(
        ctx: Context<AddBeneficiary>,
        payout: Pubkey,
        name: String,
        description: String,
    ) -> Result<()> {
        instructions::add_beneficiary(ctx, payout, name, description)
    }

    pub fn set_beneficiary_active(
        ctx: Context<SetBeneficiaryActive>,
        id: u16,
        active: bool,
    ) -> Result<()> {
        instructions::set_beneficiary_active(ctx, id, active)
    }

    /// Deposit principal and start the conversion schedule
    pub fn open_position(
        ctx: Context<OpenPosition>,
        principal: u64,
        donation_bps: u16,
        beneficiaries: Vec<u16>,
    ) -> Result<()> {
        instructions::open_position(ctx, principal, donation_bps, beneficiaries)
    }

    /// Return remaining principal and converted balance, settling pending yield
    pub fn close_position<'info>(
        ctx: Context<'_, '_, 'info, 'info, ClosePosition<'info>>,
    ) -> Result<()> {
        instructions::close_position(ctx)
    }

    pub fn update_donation(
        ctx: Context<UpdateDonation>,
        donation_bps: u16,
        beneficiaries: Vec<u16>,
    ) -> Result<()> {
        instructions::update_donation(ctx, donation_bps, beneficiaries)
    }

    /// Convert the next slice of an eligible position (permissionless crank)
    pub fn execute_swap(ctx: Context<ExecuteSwap>) -> Result<()> {
        instructions::execute_swap(ctx)
    }

    /// Harvest the yield source and credit a position's share (permissionless crank)
    pub fn accrue_yield(ctx: Context<AccrueYield>) -> Result<()> {
        instructions::accrue_yield(ctx)
    }

    /// Pay out pending yield, split between owner and selected beneficiaries
    pub fn claim_yield<'info>(ctx: Context<'_, '_, 'info, 'info, ClaimYield<'info>>) -> Result<()> {
        instructions::claim_yield(ctx)
    }

    /// Apply one operation across many positions with per-owner isolation
    pub fn execute_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, ExecuteBatch<'info>>,
        operation: BatchOperation,
        position_count: u8,
        beneficiary_count: u8,
    ) -> Result<()> {
        instructions::execute_batch(ctx, operation, position_count, beneficiary_count)
    }

    /// Read-only pending yield preview, returned through return data
    pub fn get_pending_yield(ctx: Context<GetPendingYield>) -> Result<u64> {
        instructions::get_pending_yield(ctx)
    }
}
