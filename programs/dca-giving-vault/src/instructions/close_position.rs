use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    events::PositionClosed,
    instructions::shared::*,
    ledger::positions,
    state::{Position, ProtocolState},
};

#[derive(Accounts)]
pub struct ClosePosition<'info> {
    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Box<Account<'info, ProtocolState>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, owner.key().as_ref()],
        bump = position.bump,
        has_one = owner
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(address = protocol.deposit_mint)]
    pub deposit_mint: Box<Account<'info, Mint>>,

    #[account(address = protocol.converted_mint)]
    pub converted_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = deposit_mint,
        associated_token::authority = owner,
    )]
    pub owner_deposit_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = converted_mint,
        associated_token::authority = owner,
    )]
    pub owner_converted_account: Box<Account<'info, TokenAccount>>,

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

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
    // Remaining accounts, only needed while yield is pending:
    // [beneficiary records in election order..., beneficiary payout ATAs...]
}

pub fn close_position<'info>(ctx: Context<'_, '_, 'info, 'info, ClosePosition<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();
    let position_id = ctx.accounts.position.position_id;

    let record_count = if ctx.accounts.position.pending_yield > 0 {
        ctx.accounts.position.beneficiary_count as usize
    } else {
        0
    };
    let remaining = ctx.remaining_accounts;
    require_distinct(remaining)?;
    let mut records = load_beneficiaries(remaining, record_count)?;
    let (record_accounts, payout_accounts) = remaining.split_at(record_count);

    let mut destinations = vec![
        ctx.accounts.owner_deposit_account.to_account_info(),
        ctx.accounts.owner_converted_account.to_account_info(),
    ];
    destinations.extend(payout_accounts.iter().cloned());

    let mut pool = ctx.accounts.lending.pool(
        &ctx.accounts.protocol,
        ctx.accounts.deposit_vault.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
    )?;
    let mut vault_payouts = payouts(
        &ctx.accounts.protocol,
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.accounts.deposit_vault.to_account_info(),
        ctx.accounts.converted_vault.to_account_info(),
        destinations,
    );

    let outcome = positions::close(
        &mut ctx.accounts.protocol,
        &mut ctx.accounts.position,
        &mut records,
        now,
        &mut pool,
        &mut vault_payouts,
    )?;

    store_beneficiaries(record_accounts, &records)?;

    if let Some(claim) = &outcome.claim {
        emit_claim(owner, position_id, claim, now);
    }

    emit!(PositionClosed {
        owner,
        position_id,
        principal_returned: outcome.principal_returned,
        swapped_balance_returned: outcome.swapped_balance_returned,
        timestamp: now,
    });

    Ok(())
}
