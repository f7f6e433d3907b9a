use anchor_lang::prelude::*;

use crate::{
    adapters::{Exchange, YieldSource},
    errors::VaultError,
    math::{checked_add, checked_sub},
    state::{Position, ProtocolState},
};

pub fn is_eligible(position: &Position, now: i64, swap_interval: i64) -> bool {
    now >= position.last_swap_time.saturating_add(swap_interval)
}

pub fn next_amount(position: &Position) -> u64 {
    position.per_swap_amount.min(position.remaining_principal())
}

/// Every ledger-side precondition of a swap. Returns the amount to convert.
pub fn check_swap(protocol: &ProtocolState, position: &Position, now: i64) -> Result<u64> {
    protocol.require_not_paused()?;
    position.require_active()?;
    require!(
        is_eligible(position, now, protocol.swap_interval),
        VaultError::NotEligible
    );

    let amount = next_amount(position);
    require!(amount > 0, VaultError::ZeroRemainingPrincipal);
    Ok(amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_in: u64,
    pub amount_out: u64,
}

/// Converts the next slice of a position's principal.
///
/// Nothing on the ledger changes unless both the withdrawal and the swap
/// succeed; a failed swap is surfaced as-is and never retried here.
pub fn execute_swap<S: YieldSource, E: Exchange>(
    protocol: &mut ProtocolState,
    position: &mut Position,
    now: i64,
    source: &mut S,
    exchange: &mut E,
) -> Result<SwapOutcome> {
    let amount_in = check_swap(protocol, position, now)?;

    let principal_swapped = checked_add(position.principal_swapped, amount_in)?;
    let swaps_executed = position
        .swaps_executed
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;
    let total_principal_locked = checked_sub(protocol.total_principal_locked, amount_in)?;
    let total_swaps_executed = protocol
        .total_swaps_executed
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;

    let received = source.withdraw(amount_in)?;
    require!(received >= amount_in, VaultError::InsufficientLiquidity);

    let amount_out = exchange.swap(amount_in)?;
    require!(amount_out > 0, VaultError::SwapFailed);
    let swapped_balance = checked_add(position.swapped_balance, amount_out)?;

    position.swapped_balance = swapped_balance;
    position.principal_swapped = principal_swapped;
    position.last_swap_time = now;
    position.swaps_executed = swaps_executed;
    protocol.total_principal_locked = total_principal_locked;
    protocol.total_swaps_executed = total_swaps_executed;

    position.check_conservation()?;

    Ok(SwapOutcome {
        amount_in,
        amount_out,
    })
}
