use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::VaultError,
    events::{BeneficiaryAdded, BeneficiaryStatusChanged, ProtocolInitialized, ProtocolUpdated},
    state::{Beneficiary, ProtocolState},
};

#[derive(Accounts)]
pub struct InitializeProtocol<'info> {
    #[account(
        init,
        payer = authority,
        space = ProtocolState::LEN,
        seeds = [PROTOCOL_SEED],
        bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    /// PDA that owns the vaults and the yield-source supply position
    /// CHECK: derived and used as authority only
    #[account(
        seeds = [VAULT_AUTHORITY_SEED],
        bump
    )]
    pub vault_authority: AccountInfo<'info>,

    pub deposit_mint: Account<'info, Mint>,

    pub converted_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = deposit_mint,
        associated_token::authority = vault_authority,
    )]
    pub deposit_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = converted_mint,
        associated_token::authority = vault_authority,
    )]
    pub converted_vault: Account<'info, TokenAccount>,

    /// CHECK: Lending program principal is deployed into
    #[account(executable)]
    pub yield_program: AccountInfo<'info>,

    /// CHECK: Swap program used for conversions
    #[account(executable)]
    pub exchange_program: AccountInfo<'info>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_protocol(
    ctx: Context<InitializeProtocol>,
    swap_interval: Option<i64>,
    min_deposit: Option<u64>,
) -> Result<()> {
    let swap_interval = swap_interval.unwrap_or(DEFAULT_SWAP_INTERVAL);
    require!(
        swap_interval >= MIN_SWAP_INTERVAL,
        VaultError::InvalidSwapInterval
    );
    let min_deposit = min_deposit.unwrap_or(DEFAULT_MIN_DEPOSIT);

    let protocol = &mut ctx.accounts.protocol;
    protocol.authority = ctx.accounts.authority.key();
    protocol.deposit_mint = ctx.accounts.deposit_mint.key();
    protocol.converted_mint = ctx.accounts.converted_mint.key();
    protocol.deposit_vault = ctx.accounts.deposit_vault.key();
    protocol.converted_vault = ctx.accounts.converted_vault.key();
    protocol.yield_program = ctx.accounts.yield_program.key();
    protocol.exchange_program = ctx.accounts.exchange_program.key();
    protocol.swap_interval = swap_interval;
    protocol.min_deposit = min_deposit;
    protocol.paused = false;
    protocol.bump = ctx.bumps.protocol;
    protocol.vault_authority_bump = ctx.bumps.vault_authority;

    emit!(ProtocolInitialized {
        authority: protocol.authority,
        deposit_mint: protocol.deposit_mint,
        converted_mint: protocol.converted_mint,
        swap_interval,
        min_deposit,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct UpdateProtocol<'info> {
    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    pub authority: Signer<'info>,
}

pub fn update_protocol(
    ctx: Context<UpdateProtocol>,
    paused: Option<bool>,
    swap_interval: Option<i64>,
    min_deposit: Option<u64>,
    new_authority: Option<Pubkey>,
) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;
    protocol.require_authority(&ctx.accounts.authority.key())?;

    if let Some(paused) = paused {
        protocol.paused = paused;
    }

    if let Some(swap_interval) = swap_interval {
        require!(
            swap_interval >= MIN_SWAP_INTERVAL,
            VaultError::InvalidSwapInterval
        );
        protocol.swap_interval = swap_interval;
    }

    if let Some(min_deposit) = min_deposit {
        protocol.min_deposit = min_deposit;
    }

    if let Some(new_authority) = new_authority {
        protocol.authority = new_authority;
    }

    emit!(ProtocolUpdated {
        authority: protocol.authority,
        paused: protocol.paused,
        swap_interval: protocol.swap_interval,
        min_deposit: protocol.min_deposit,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct AddBeneficiary<'info> {
    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        init,
        payer = authority,
        space = Beneficiary::LEN,
        seeds = [BENEFICIARY_SEED, &protocol.beneficiary_count.to_le_bytes()],
        bump
    )]
    pub beneficiary: Account<'info, Beneficiary>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn add_beneficiary(
    ctx: Context<AddBeneficiary>,
    payout: Pubkey,
    name: String,
    description: String,
) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;
    protocol.require_authority(&ctx.accounts.authority.key())?;
    Beneficiary::validate_metadata(&name, &description)?;

    let id = protocol.allocate_beneficiary_id()?;
    let now = Clock::get()?.unix_timestamp;

    let beneficiary = &mut ctx.accounts.beneficiary;
    beneficiary.id = id;
    beneficiary.payout = payout;
    beneficiary.total_received = 0;
    beneficiary.donor_count = 0;
    beneficiary.active = true;
    beneficiary.name = name.clone();
    beneficiary.description = description;
    beneficiary.created_at = now;
    beneficiary.bump = ctx.bumps.beneficiary;

    emit!(BeneficiaryAdded {
        id,
        payout,
        name,
        timestamp: now,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(id: u16)]
pub struct SetBeneficiaryActive<'info> {
    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        mut,
        seeds = [BENEFICIARY_SEED, &id.to_le_bytes()],
        bump = beneficiary.bump
    )]
    pub beneficiary: Account<'info, Beneficiary>,

    pub authority: Signer<'info>,
}

pub fn set_beneficiary_active(
    ctx: Context<SetBeneficiaryActive>,
    id: u16,
    active: bool,
) -> Result<()> {
    ctx.accounts
        .protocol
        .require_authority(&ctx.accounts.authority.key())?;

    ctx.accounts.beneficiary.active = active;

    emit!(BeneficiaryStatusChanged {
        id,
        active,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
