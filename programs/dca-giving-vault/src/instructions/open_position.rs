use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    events::PositionOpened,
    instructions::shared::*,
    ledger::positions,
    state::{Position, ProtocolState},
};

#[derive(Accounts)]
pub struct OpenPosition<'info> {
    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Box<Account<'info, ProtocolState>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Position::LEN,
        seeds = [POSITION_SEED, owner.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, Position>>,

    /// Owner's deposit-mint token account the principal is pulled from
    #[account(
        mut,
        constraint = owner_deposit_account.owner == owner.key(),
        constraint = owner_deposit_account.mint == protocol.deposit_mint
    )]
    pub owner_deposit_account: Box<Account<'info, TokenAccount>>,

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

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // Remaining accounts are the selected beneficiary records, in election order
}

pub fn open_position(
    ctx: Context<OpenPosition>,
    principal: u64,
    donation_bps: u16,
    beneficiaries: Vec<u16>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let records_accounts = &ctx.remaining_accounts[..];
    require_distinct(records_accounts)?;
    let records = load_beneficiaries(records_accounts, beneficiaries.len())?;

    // Reject before any tokens move.
    let per_swap_amount = positions::validate_open(
        &ctx.accounts.protocol,
        &ctx.accounts.position,
        principal,
        donation_bps,
        &beneficiaries,
        &records,
    )?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.owner_deposit_account.to_account_info(),
                to: ctx.accounts.deposit_vault.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        principal,
    )?;

    let mut pool = ctx.accounts.lending.pool(
        &ctx.accounts.protocol,
        ctx.accounts.deposit_vault.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
    )?;

    ctx.accounts.position.bump = ctx.bumps.position;
    let position_id = positions::open(
        &mut ctx.accounts.protocol,
        &mut ctx.accounts.position,
        owner,
        principal,
        donation_bps,
        &beneficiaries,
        &records,
        now,
        &mut pool,
    )?;

    emit!(PositionOpened {
        owner,
        position_id,
        principal,
        per_swap_amount,
        donation_bps,
        beneficiaries,
        timestamp: now,
    });

    Ok(())
}
