use anchor_lang::prelude::*;
use anchor_lang::solana_program::{instruction::Instruction, program::invoke_signed};

use super::{lending::sighash, token::token_balance, Exchange};
use crate::{
    constants::{MIN_SWAP_OUTPUT, VAULT_AUTHORITY_SEED},
    errors::VaultError,
};

/// CPI binding of `Exchange` to the configured swap program. Input leaves
/// the deposit vault, output lands in the converted vault.
pub struct SwapRouter<'info> {
    pub program: AccountInfo<'info>,
    pub pool: AccountInfo<'info>,
    pub pool_deposit_reserve: AccountInfo<'info>,
    pub pool_converted_reserve: AccountInfo<'info>,
    pub deposit_vault: AccountInfo<'info>,
    pub converted_vault: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub authority_bump: u8,
}

impl<'info> Exchange for SwapRouter<'info> {
    fn swap(&mut self, amount_in: u64) -> Result<u64> {
        let mut data = Vec::with_capacity(24);
        data.extend_from_slice(&sighash("swap"));
        data.extend_from_slice(&amount_in.to_le_bytes());
        data.extend_from_slice(&MIN_SWAP_OUTPUT.to_le_bytes());

        let instruction = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.pool.key(), false),
                AccountMeta::new(self.pool_deposit_reserve.key(), false),
                AccountMeta::new(self.pool_converted_reserve.key(), false),
                AccountMeta::new(self.deposit_vault.key(), false),
                AccountMeta::new(self.converted_vault.key(), false),
                AccountMeta::new_readonly(self.vault_authority.key(), true),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data,
        };

        let bump = [self.authority_bump];
        let seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, &bump];

        let before = token_balance(&self.converted_vault)?;
        invoke_signed(
            &instruction,
            &[
                self.pool.clone(),
                self.pool_deposit_reserve.clone(),
                self.pool_converted_reserve.clone(),
                self.deposit_vault.clone(),
                self.converted_vault.clone(),
                self.vault_authority.clone(),
                self.token_program.clone(),
                self.program.clone(),
            ],
            &[seeds],
        )?;
        let after = token_balance(&self.converted_vault)?;

        let amount_out = after.saturating_sub(before);
        require!(amount_out >= MIN_SWAP_OUTPUT, VaultError::SwapFailed);

        #[cfg(feature = "verbose")]
        msg!("swap: in={} out={}", amount_in, amount_out);

        Ok(amount_out)
    }
}
