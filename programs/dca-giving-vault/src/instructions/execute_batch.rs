use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    errors::VaultError,
    events::{BatchExecuted, BatchItemSkipped},
    instructions::shared::*,
    ledger::batch::{self, BatchOperation},
    state::{Position, ProtocolState},
};

#[derive(Accounts)]
pub struct ExecuteBatch<'info> {
    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Box<Account<'info, ProtocolState>>,

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
    // Remaining accounts:
    // [position records x position_count,
    //  beneficiary records x beneficiary_count,
    //  payout ATAs of owners and beneficiaries...]
}

pub fn execute_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, ExecuteBatch<'info>>,
    operation: BatchOperation,
    position_count: u8,
    beneficiary_count: u8,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let position_count = position_count as usize;
    let record_count = position_count + beneficiary_count as usize;
    let remaining = ctx.remaining_accounts;
    require!(remaining.len() >= record_count, VaultError::BeneficiaryMismatch);

    let (record_accounts, payout_accounts) = remaining.split_at(record_count);
    require_distinct(record_accounts)?;
    let (position_accounts, beneficiary_accounts) = record_accounts.split_at(position_count);

    let mut positions = position_accounts
        .iter()
        .map(load_position)
        .collect::<Result<Vec<Position>>>()?;
    let mut registry = load_beneficiaries(beneficiary_accounts, beneficiary_accounts.len())?;

    let deposit_vault = ctx.accounts.deposit_vault.to_account_info();
    let converted_vault = ctx.accounts.converted_vault.to_account_info();
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
        deposit_vault.clone(),
        converted_vault.clone(),
        vault_authority.clone(),
        token_program.clone(),
    )?;
    let mut vault_payouts = payouts(
        &ctx.accounts.protocol,
        token_program,
        vault_authority,
        deposit_vault,
        converted_vault,
        payout_accounts.to_vec(),
    );

    let report = batch::execute_batch(
        operation,
        &mut ctx.accounts.protocol,
        &mut positions,
        &mut registry,
        now,
        &mut pool,
        &mut router,
        &mut vault_payouts,
    )?;

    for (info, position) in position_accounts.iter().zip(&positions) {
        store_record(info, position)?;
    }
    store_beneficiaries(beneficiary_accounts, &registry)?;

    for skipped in &report.skipped {
        emit!(BatchItemSkipped {
            operation,
            owner: skipped.owner,
            error_code: batch::error_code(&skipped.error),
            timestamp: now,
        });
    }

    emit!(BatchExecuted {
        operation,
        attempted: report.attempted,
        succeeded: report.succeeded,
        timestamp: now,
    });

    Ok(())
}
