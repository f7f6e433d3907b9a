use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    hash::hash,
    instruction::Instruction,
    program::invoke_signed,
};
use bytemuck::{Pod, Zeroable};

use super::{token::token_balance, YieldSource};
use crate::{constants::VAULT_AUTHORITY_SEED, errors::VaultError};

/// Supply position kept by the lending program for the vault authority
/// (layout after the 8-byte account discriminator).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SupplyPosition {
    pub reserve: Pubkey,
    pub owner: Pubkey,
    pub supplied: u64,
    pub accrued_yield: u64,
    pub last_update_ts: i64,
    pub reserved: [u8; 64],
}

/// Anchor-style instruction discriminator for the external program.
pub fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

pub fn deserialize_supply_position(account: &AccountInfo) -> Result<SupplyPosition> {
    let size = std::mem::size_of::<SupplyPosition>();
    if account.data_len() < 8 + size {
        return Err(VaultError::InvalidExternalAccount.into());
    }

    let data = account.try_borrow_data()?;
    bytemuck::try_pod_read_unaligned::<SupplyPosition>(&data[8..8 + size]) // Skip discriminator
        .map_err(|_| error!(VaultError::InvalidExternalAccount))
}

/// Accrued, unharvested yield of the vault authority's supply position.
pub fn read_available_yield(
    supply_position: &AccountInfo,
    lending_program: &Pubkey,
    vault_authority: &Pubkey,
) -> Result<u64> {
    require_keys_eq!(
        *supply_position.owner,
        *lending_program,
        VaultError::InvalidExternalAccount
    );
    let position = deserialize_supply_position(supply_position)?;
    require_keys_eq!(
        position.owner,
        *vault_authority,
        VaultError::InvalidExternalAccount
    );
    Ok(position.accrued_yield)
}

/// CPI binding of `YieldSource` to the configured lending program.
pub struct LendingPool<'info> {
    pub program: AccountInfo<'info>,
    pub reserve: AccountInfo<'info>,
    pub reserve_liquidity: AccountInfo<'info>,
    pub supply_position: AccountInfo<'info>,
    pub deposit_vault: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub authority_bump: u8,
}

impl<'info> LendingPool<'info> {
    fn invoke(&self, name: &str, amount: Option<u64>) -> Result<()> {
        let mut data = Vec::with_capacity(16);
        data.extend_from_slice(&sighash(name));
        if let Some(amount) = amount {
            data.extend_from_slice(&amount.to_le_bytes());
        }

        let instruction = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.reserve.key(), false),
                AccountMeta::new(self.reserve_liquidity.key(), false),
                AccountMeta::new(self.supply_position.key(), false),
                AccountMeta::new(self.deposit_vault.key(), false),
                AccountMeta::new_readonly(self.vault_authority.key(), true),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data,
        };

        let bump = [self.authority_bump];
        let seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, &bump];

        invoke_signed(
            &instruction,
            &[
                self.reserve.clone(),
                self.reserve_liquidity.clone(),
                self.supply_position.clone(),
                self.deposit_vault.clone(),
                self.vault_authority.clone(),
                self.token_program.clone(),
                self.program.clone(),
            ],
            &[seeds],
        )?;

        Ok(())
    }

    /// Runs `name` and reports how much landed in the deposit vault.
    fn invoke_measured(&self, name: &str, amount: Option<u64>) -> Result<u64> {
        let before = token_balance(&self.deposit_vault)?;
        self.invoke(name, amount)?;
        let after = token_balance(&self.deposit_vault)?;
        Ok(after.saturating_sub(before))
    }
}

impl<'info> YieldSource for LendingPool<'info> {
    fn supply(&mut self, amount: u64) -> Result<()> {
        self.invoke("supply", Some(amount))
    }

    fn withdraw(&mut self, amount: u64) -> Result<u64> {
        self.invoke_measured("withdraw", Some(amount))
    }

    fn available_yield(&self) -> Result<u64> {
        read_available_yield(
            &self.supply_position,
            &self.program.key(),
            &self.vault_authority.key(),
        )
    }

    fn harvest(&mut self) -> Result<u64> {
        self.invoke_measured("harvest", None)
    }
}
