use anchor_lang::prelude::*;

use crate::{
    adapters::lending::read_available_yield,
    constants::*,
    ledger::accrual,
    state::{Position, ProtocolState},
};

#[derive(Accounts)]
pub struct GetPendingYield<'info> {
    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        seeds = [POSITION_SEED, position.owner.as_ref()],
        bump = position.bump
    )]
    pub position: Account<'info, Position>,

    /// CHECK: PDA derivation
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = protocol.vault_authority_bump
    )]
    pub vault_authority: AccountInfo<'info>,

    /// CHECK: Owner and layout checked when read
    pub supply_position: AccountInfo<'info>,
}

/// Pending yield including what the next accrual would credit. Mutates nothing.
pub fn get_pending_yield(ctx: Context<GetPendingYield>) -> Result<u64> {
    let protocol = &ctx.accounts.protocol;
    let available = read_available_yield(
        &ctx.accounts.supply_position,
        &protocol.yield_program,
        &ctx.accounts.vault_authority.key(),
    )?;

    accrual::preview_pending_yield(protocol, &ctx.accounts.position, available)
}
