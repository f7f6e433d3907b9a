//! In-memory adapters and fixtures for driving the ledger without a validator.

use std::fmt::Debug;

use anchor_lang::prelude::*;

use crate::{
    adapters::{Asset, Exchange, Payouts, YieldSource},
    constants::*,
    errors::VaultError,
    state::{Beneficiary, Position, ProtocolState},
};

#[derive(Debug, Default, Clone)]
pub struct MockYieldSource {
    pub supplied: u64,
    /// Accrued since the last harvest
    pub accrued: u64,
    /// Withheld from every withdrawal
    pub shortfall: u64,
}

impl MockYieldSource {
    pub fn accrue(&mut self, amount: u64) {
        self.accrued += amount;
    }
}

impl YieldSource for MockYieldSource {
    fn supply(&mut self, amount: u64) -> Result<()> {
        self.supplied += amount;
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<u64> {
        let received = amount.saturating_sub(self.shortfall).min(self.supplied);
        self.supplied -= received;
        Ok(received)
    }

    fn available_yield(&self) -> Result<u64> {
        Ok(self.accrued)
    }

    fn harvest(&mut self) -> Result<u64> {
        Ok(std::mem::take(&mut self.accrued))
    }
}

/// Converts at `numerator / denominator`.
#[derive(Debug, Clone)]
pub struct MockExchange {
    pub numerator: u64,
    pub denominator: u64,
    pub fail: bool,
    pub swaps: Vec<u64>,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
            fail: false,
            swaps: Vec::new(),
        }
    }
}

impl MockExchange {
    pub fn at_rate(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
            ..Default::default()
        }
    }
}

impl Exchange for MockExchange {
    fn swap(&mut self, amount_in: u64) -> Result<u64> {
        require!(!self.fail, VaultError::SwapFailed);
        self.swaps.push(amount_in);
        Ok(amount_in * self.numerator / self.denominator)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MockPayouts {
    pub transfers: Vec<(Asset, Pubkey, u64)>,
    /// Recipient with no routable destination
    pub reject: Option<Pubkey>,
    /// Every transfer fails once this many have gone through
    pub fail_after: Option<usize>,
}

impl MockPayouts {
    pub fn rejecting(recipient: Pubkey) -> Self {
        Self {
            reject: Some(recipient),
            ..Default::default()
        }
    }

    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Default::default()
        }
    }

    /// Total of `asset` sent to anyone.
    pub fn paid(&self, asset: Asset) -> u64 {
        self.transfers
            .iter()
            .filter(|(a, _, _)| *a == asset)
            .map(|(_, _, amount)| amount)
            .sum()
    }

    pub fn received(&self, asset: Asset, recipient: &Pubkey) -> u64 {
        self.transfers
            .iter()
            .filter(|(a, r, _)| *a == asset && r == recipient)
            .map(|(_, _, amount)| amount)
            .sum()
    }
}

impl Payouts for MockPayouts {
    fn check_recipient(&self, _asset: Asset, recipient: &Pubkey) -> Result<()> {
        require!(self.reject != Some(*recipient), VaultError::InvalidPayoutAccount);
        Ok(())
    }

    fn transfer(&mut self, asset: Asset, recipient: &Pubkey, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.check_recipient(asset, recipient)?;
        if let Some(limit) = self.fail_after {
            require!(self.transfers.len() < limit, VaultError::TransferFailed);
        }
        self.transfers.push((asset, *recipient, amount));
        Ok(())
    }
}

pub const START: i64 = 1_700_000_000;

pub fn protocol(beneficiary_count: u16) -> ProtocolState {
    ProtocolState {
        authority: Pubkey::new_unique(),
        swap_interval: SECONDS_PER_DAY,
        min_deposit: DEFAULT_MIN_DEPOSIT,
        beneficiary_count,
        ..Default::default()
    }
}

pub fn registry(count: u16) -> Vec<Beneficiary> {
    (0..count)
        .map(|id| Beneficiary {
            id,
            payout: Pubkey::new_unique(),
            active: true,
            name: format!("Beneficiary {}", id),
            ..Default::default()
        })
        .collect()
}

/// Registry records for `selection`, in election order.
pub fn records(registry: &[Beneficiary], selection: &[u16]) -> Vec<Beneficiary> {
    selection
        .iter()
        .map(|id| registry[*id as usize].clone())
        .collect()
}

/// Writes claim-side counter changes back into the registry.
pub fn commit(registry: &mut [Beneficiary], records: &[Beneficiary]) {
    for record in records {
        registry[record.id as usize] = record.clone();
    }
}

pub fn assert_vault_err<T: Debug>(result: Result<T>, expected: VaultError) {
    assert_eq!(
        result.unwrap_err(),
        anchor_lang::error::Error::from(expected)
    );
}

/// Sum of remaining principal over active positions.
pub fn locked(positions: &[&Position]) -> u64 {
    positions
        .iter()
        .filter(|p| p.active)
        .map(|p| p.remaining_principal())
        .sum()
}
