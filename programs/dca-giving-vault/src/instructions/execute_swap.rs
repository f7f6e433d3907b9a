use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    events::SwapExecuted,
    instructions::shared::*,
    ledger::scheduler,
    state::{Position, ProtocolState},
};

/// Permissionless crank: anyone may convert an eligible position's next slice.
#[derive(Accounts)]
pub struct ExecuteSwap<'info> {
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

    #[account(
        mut,
        address = protocol.converted_vault
    )]
    pub converted_vault: Box<Account<'info, TokenAccount>>,

    /// CHECK: PDA derivation
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump = protocol.vault_authority_bump
    )]
    pub vault_authority: AccountInfo<'info>,

    pub lending: LendingAccounts<'info>,

    pub exchange: ExchangeAccounts<'info>,

    pub crank_operator: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn execute_swap(ctx: Context<ExecuteSwap>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let deposit_vault = ctx.accounts.deposit_vault.to_account_info();
    let vault_authority = ctx.accounts.vault_authority.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    let mut pool = ctx.accounts.lending.pool(
        &ctx.accounts.protocol,
        deposit_vault.clone(),
        vault_authority.clone(),
        token_program.clone(),
    )?;
    let mut router = ctx.accounts.exchange.router(
        &ctx.accounts.protocol,
        deposit_vault,
        ctx.accounts.converted_vault.to_account_info(),
        vault_authority,
        token_program,
    )?;

    let outcome = scheduler::execute_swap(
        &mut ctx.accounts.protocol,
        &mut ctx.accounts.position,
        now,
        &mut pool,
        &mut router,
    )?;

    let position = &ctx.accounts.position;
    emit!(SwapExecuted {
        owner: position.owner,
        position_id: position.position_id,
        amount_in: outcome.amount_in,
        amount_out: outcome.amount_out,
        swaps_executed: position.swaps_executed,
        remaining_principal: position.remaining_principal(),
        timestamp: now,
    });

    Ok(())
}
