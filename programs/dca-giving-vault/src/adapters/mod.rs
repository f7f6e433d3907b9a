//! Boundaries between the ledger and the programs it does not control.
//!
//! The ledger only talks to these traits. On chain they are bound to CPIs
//! (`LendingPool`, `SwapRouter`, `VaultPayouts`); the test suite binds them
//! to in-memory fakes.

use anchor_lang::prelude::*;

pub mod exchange;
pub mod lending;
pub mod token;

pub use exchange::SwapRouter;
pub use lending::LendingPool;
pub use token::VaultPayouts;

/// External facility holding deployed principal.
pub trait YieldSource {
    fn supply(&mut self, amount: u64) -> Result<()>;

    /// Returns the amount actually received, which may be less than requested.
    fn withdraw(&mut self, amount: u64) -> Result<u64>;

    /// Yield accrued since the last harvest. Read-only.
    fn available_yield(&self) -> Result<u64>;

    /// Moves accrued yield into the deposit vault and resets the baseline.
    fn harvest(&mut self) -> Result<u64>;
}

/// One-shot conversion of deposit asset into converted asset.
pub trait Exchange {
    fn swap(&mut self, amount_in: u64) -> Result<u64>;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    Deposit,
    Converted,
}

/// Outbound transfers from the program vaults.
pub trait Payouts {
    /// Fails if a transfer of `asset` to `recipient` could not be routed.
    /// Moves nothing; callers run it for every recipient before the first
    /// transfer of an operation.
    fn check_recipient(&self, asset: Asset, recipient: &Pubkey) -> Result<()>;

    fn transfer(&mut self, asset: Asset, recipient: &Pubkey, amount: u64) -> Result<()>;
}
