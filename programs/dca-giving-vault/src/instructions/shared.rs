use anchor_lang::prelude::*;

use crate::{
    adapters::{LendingPool, SwapRouter, VaultPayouts},
    constants::*,
    errors::VaultError,
    events::{DonationPaid, YieldClaimed},
    ledger::donation::ClaimOutcome,
    state::{Beneficiary, Position, ProtocolState},
};

/// Lending program accounts shared by every instruction that moves principal or yield.
#[derive(Accounts)]
pub struct LendingAccounts<'info> {
    /// CHECK: Validated against protocol.yield_program
    #[account(executable)]
    pub yield_program: AccountInfo<'info>,

    /// CHECK: Validated by the lending program
    #[account(mut)]
    pub reserve: AccountInfo<'info>,

    /// CHECK: Validated by the lending program
    #[account(mut)]
    pub reserve_liquidity: AccountInfo<'info>,

    /// CHECK: Owner checked when read; validated by the lending program
    #[account(mut)]
    pub supply_position: AccountInfo<'info>,
}

impl<'info> LendingAccounts<'info> {
    pub fn pool(
        &self,
        protocol: &ProtocolState,
        deposit_vault: AccountInfo<'info>,
        vault_authority: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
    ) -> Result<LendingPool<'info>> {
        require_keys_eq!(
            self.yield_program.key(),
            protocol.yield_program,
            VaultError::InvalidExternalAccount
        );
        Ok(LendingPool {
            program: self.yield_program.clone(),
            reserve: self.reserve.clone(),
            reserve_liquidity: self.reserve_liquidity.clone(),
            supply_position: self.supply_position.clone(),
            deposit_vault,
            vault_authority,
            token_program,
            authority_bump: protocol.vault_authority_bump,
        })
    }
}

/// Swap program accounts used by scheduled conversions.
#[derive(Accounts)]
pub struct ExchangeAccounts<'info> {
    /// CHECK: Validated against protocol.exchange_program
    #[account(executable)]
    pub exchange_program: AccountInfo<'info>,

    /// CHECK: Validated by the swap program
    #[account(mut)]
    pub pool: AccountInfo<'info>,

    /// CHECK: Validated by the swap program
    #[account(mut)]
    pub pool_deposit_reserve: AccountInfo<'info>,

    /// CHECK: Validated by the swap program
    #[account(mut)]
    pub pool_converted_reserve: AccountInfo<'info>,
}

impl<'info> ExchangeAccounts<'info> {
    pub fn router(
        &self,
        protocol: &ProtocolState,
        deposit_vault: AccountInfo<'info>,
        converted_vault: AccountInfo<'info>,
        vault_authority: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
    ) -> Result<SwapRouter<'info>> {
        require_keys_eq!(
            self.exchange_program.key(),
            protocol.exchange_program,
            VaultError::InvalidExternalAccount
        );
        Ok(SwapRouter {
            program: self.exchange_program.clone(),
            pool: self.pool.clone(),
            pool_deposit_reserve: self.pool_deposit_reserve.clone(),
            pool_converted_reserve: self.pool_converted_reserve.clone(),
            deposit_vault,
            converted_vault,
            vault_authority,
            token_program,
            authority_bump: protocol.vault_authority_bump,
        })
    }
}

pub fn payouts<'info>(
    protocol: &ProtocolState,
    token_program: AccountInfo<'info>,
    vault_authority: AccountInfo<'info>,
    deposit_vault: AccountInfo<'info>,
    converted_vault: AccountInfo<'info>,
    destinations: Vec<AccountInfo<'info>>,
) -> VaultPayouts<'info> {
    VaultPayouts {
        token_program,
        vault_authority,
        authority_bump: protocol.vault_authority_bump,
        deposit_mint: protocol.deposit_mint,
        deposit_vault,
        converted_mint: protocol.converted_mint,
        converted_vault,
        destinations,
    }
}

/// Deserializes a program-owned record passed outside the typed accounts.
pub fn load_record<T: AccountDeserialize + Owner>(info: &AccountInfo) -> Result<T> {
    require_keys_eq!(*info.owner, T::owner(), VaultError::InvalidExternalAccount);
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Writes a record loaded with `load_record` back to its account.
pub fn store_record<T: AccountSerialize>(info: &AccountInfo, record: &T) -> Result<()> {
    require!(info.is_writable, VaultError::InvalidExternalAccount);
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)
}

pub fn load_position(info: &AccountInfo) -> Result<Position> {
    let position: Position = load_record(info)?;
    let expected = Pubkey::create_program_address(
        &[POSITION_SEED, position.owner.as_ref(), &[position.bump]],
        &crate::ID,
    )
    .map_err(|_| error!(VaultError::InvalidExternalAccount))?;
    require_keys_eq!(info.key(), expected, VaultError::InvalidExternalAccount);
    Ok(position)
}

pub fn load_beneficiary(info: &AccountInfo) -> Result<Beneficiary> {
    let beneficiary: Beneficiary = load_record(info)?;
    let expected = Pubkey::create_program_address(
        &[
            BENEFICIARY_SEED,
            &beneficiary.id.to_le_bytes(),
            &[beneficiary.bump],
        ],
        &crate::ID,
    )
    .map_err(|_| error!(VaultError::InvalidExternalAccount))?;
    require_keys_eq!(info.key(), expected, VaultError::InvalidExternalAccount);
    Ok(beneficiary)
}

/// Loads beneficiary records from the front of `accounts`.
pub fn load_beneficiaries(accounts: &[AccountInfo], count: usize) -> Result<Vec<Beneficiary>> {
    require!(accounts.len() >= count, VaultError::BeneficiaryMismatch);
    accounts[..count].iter().map(load_beneficiary).collect()
}

/// Accounts whose key appears twice would be staged twice and the last write would win.
pub fn require_distinct(accounts: &[AccountInfo]) -> Result<()> {
    for (i, info) in accounts.iter().enumerate() {
        require!(
            !accounts[..i].iter().any(|other| other.key == info.key),
            VaultError::DuplicateBatchEntry
        );
    }
    Ok(())
}

/// Writes every loaded record back to the account it came from.
pub fn store_beneficiaries(accounts: &[AccountInfo], records: &[Beneficiary]) -> Result<()> {
    for (info, record) in accounts.iter().zip(records) {
        store_record(info, record)?;
    }
    Ok(())
}

pub fn emit_claim(owner: Pubkey, position_id: u64, outcome: &ClaimOutcome, timestamp: i64) {
    emit!(YieldClaimed {
        owner,
        position_id,
        total: outcome.split.total,
        user_amount: outcome.split.user_amount,
        donated: outcome.split.donated,
        timestamp,
    });

    for (beneficiary_id, amount) in &outcome.donations {
        emit!(DonationPaid {
            owner,
            beneficiary_id: *beneficiary_id,
            amount: *amount,
            timestamp,
        });
    }
}
