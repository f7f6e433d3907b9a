use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};
use spl_associated_token_account::get_associated_token_address;
use spl_token::solana_program::program_pack::Pack;

use super::{Asset, Payouts};
use crate::{constants::VAULT_AUTHORITY_SEED, errors::VaultError};

/// Reads the balance of a raw SPL token account. Used around CPIs, where the
/// deserialized `Account<TokenAccount>` snapshot would be stale.
pub fn token_balance(account: &AccountInfo) -> Result<u64> {
    let data = account.try_borrow_data()?;
    let state = spl_token::state::Account::unpack(&data[..])
        .map_err(|_| error!(VaultError::InvalidExternalAccount))?;
    Ok(state.amount)
}

/// SPL transfers out of the program vaults, signed by the vault authority PDA.
///
/// Recipients are wallets; the destination is resolved to the recipient's
/// associated token account among `destinations`.
pub struct VaultPayouts<'info> {
    pub token_program: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub authority_bump: u8,
    pub deposit_mint: Pubkey,
    pub deposit_vault: AccountInfo<'info>,
    pub converted_mint: Pubkey,
    pub converted_vault: AccountInfo<'info>,
    pub destinations: Vec<AccountInfo<'info>>,
}

impl<'info> VaultPayouts<'info> {
    fn mint(&self, asset: Asset) -> Pubkey {
        match asset {
            Asset::Deposit => self.deposit_mint,
            Asset::Converted => self.converted_mint,
        }
    }

    fn destination(&self, mint: &Pubkey, recipient: &Pubkey) -> Result<AccountInfo<'info>> {
        let expected = get_associated_token_address(recipient, mint);
        self.destinations
            .iter()
            .find(|info| info.key() == expected)
            .cloned()
            .ok_or_else(|| error!(VaultError::InvalidPayoutAccount))
    }
}

impl<'info> Payouts for VaultPayouts<'info> {
    fn check_recipient(&self, asset: Asset, recipient: &Pubkey) -> Result<()> {
        self.destination(&self.mint(asset), recipient).map(|_| ())
    }

    fn transfer(&mut self, asset: Asset, recipient: &Pubkey, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }

        let from = match asset {
            Asset::Deposit => self.deposit_vault.clone(),
            Asset::Converted => self.converted_vault.clone(),
        };
        let to = self.destination(&self.mint(asset), recipient)?;

        let bump = [self.authority_bump];
        let seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, &bump];

        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from,
                    to,
                    authority: self.vault_authority.clone(),
                },
                &[seeds],
            ),
            amount,
        )
        .map_err(|_| error!(VaultError::TransferFailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::state::{Account as SplAccount, AccountState};

    fn packed(mint: Pubkey, owner: Pubkey, amount: u64) -> Vec<u8> {
        let state = SplAccount {
            mint,
            owner,
            amount,
            state: AccountState::Initialized,
            ..Default::default()
        };
        let mut data = vec![0u8; SplAccount::LEN];
        SplAccount::pack(state, &mut data).unwrap();
        data
    }

    #[test]
    fn test_token_balance_reads_amount() {
        let key = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data = packed(Pubkey::new_unique(), Pubkey::new_unique(), 4_200);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &spl_token::ID, false, 0);

        assert_eq!(token_balance(&info).unwrap(), 4_200);
    }

    #[test]
    fn test_token_balance_rejects_garbage() {
        let key = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data = vec![1u8; 10];
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &spl_token::ID, false, 0);

        assert!(token_balance(&info).is_err());
    }

    #[test]
    fn test_destination_is_recipient_ata() {
        let mint = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let ata = get_associated_token_address(&recipient, &mint);
        let stranger = Pubkey::new_unique();
        let other = Pubkey::new_unique();

        let mut lamports = [0u64; 3];
        let mut data = [vec![0u8; 0], vec![0u8; 0], vec![0u8; 0]];
        let [l0, l1, l2] = &mut lamports;
        let [d0, d1, d2] = &mut data;
        let placeholder = AccountInfo::new(&other, false, false, l0, d0, &other, false, 0);
        let ata_info = AccountInfo::new(&ata, false, true, l1, d1, &spl_token::ID, false, 0);
        let stranger_info = AccountInfo::new(&stranger, false, true, l2, d2, &spl_token::ID, false, 0);

        let payouts = VaultPayouts {
            token_program: placeholder.clone(),
            vault_authority: placeholder.clone(),
            authority_bump: 255,
            deposit_mint: mint,
            deposit_vault: placeholder.clone(),
            converted_mint: Pubkey::new_unique(),
            converted_vault: placeholder,
            destinations: vec![stranger_info, ata_info],
        };

        assert_eq!(payouts.destination(&mint, &recipient).unwrap().key(), ata);
        assert_eq!(
            payouts.destination(&mint, &stranger).unwrap_err(),
            anchor_lang::error::Error::from(VaultError::InvalidPayoutAccount)
        );

        // Routing is checked per asset: no converted-mint ATA was supplied
        assert!(payouts.check_recipient(Asset::Deposit, &recipient).is_ok());
        assert_eq!(
            payouts.check_recipient(Asset::Converted, &recipient).unwrap_err(),
            anchor_lang::error::Error::from(VaultError::InvalidPayoutAccount)
        );
    }
}
