use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    events::YieldAccrued,
    instructions::shared::*,
    ledger::accrual,
    state::{Position, ProtocolState},
};

#[derive(Accounts)]
pub struct AccrueYield<'info> {
    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Box<Account<'info, ProtocolState>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, position.owner.as_ref()],
        bump = position.bump
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(
        mut,
        address = protocol.deposit_vault
    )]
    pub deposit_vault: Box<Account<'info, TokenAccount>>,

    /// CHECK: PDA derivation
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = protocol.vault_authority_bump
    )]
    pub vault_authority: AccountInfo<'info>,

    pub lending: LendingAccounts<'info>,

    pub crank_operator: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn accrue_yield(ctx: Context<AccrueYield>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let mut pool = ctx.accounts.lending.pool(
        &ctx.accounts.protocol,
        ctx.accounts.deposit_vault.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
    )?;

    let outcome = accrual::accrue(
        &mut ctx.accounts.protocol,
        &mut ctx.accounts.position,
        &mut pool,
    )?;

    let position = &ctx.accounts.position;
    emit!(YieldAccrued {
        owner: position.owner,
        position_id: position.position_id,
        harvested: outcome.harvested,
        new_yield: outcome.new_yield,
        pending_yield: position.pending_yield,
        timestamp: now,
    });

    Ok(())
}
