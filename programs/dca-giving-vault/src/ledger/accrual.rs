use anchor_lang::prelude::*;

use crate::{
    adapters::YieldSource,
    math::{checked_add, pro_rata},
    state::{Position, ProtocolState},
};

/// Yield a position would be newly credited with, given an aggregate
/// `y_total`. A position's share is its remaining principal over everything
/// locked right now; whatever it was already credited is subtracted, and the
/// result never exceeds what is still unattributed.
pub fn attributable_yield(
    position: &Position,
    y_total: u64,
    total_principal_locked: u64,
    unattributed: u64,
) -> Result<u64> {
    let raw_share = pro_rata(
        y_total,
        position.remaining_principal(),
        total_principal_locked,
    )?;
    let new_yield = raw_share.saturating_sub(position.total_yield_earned);
    Ok(new_yield.min(unattributed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualOutcome {
    /// Collected from the yield source by this call
    pub harvested: u64,
    /// Credited to the position by this call
    pub new_yield: u64,
}

/// Gates an accrual must pass before the yield source is touched.
pub fn check_accrue(protocol: &ProtocolState, position: &Position) -> Result<()> {
    protocol.require_not_paused()?;
    position.require_active()
}

/// Harvests the yield source and credits the position with its share of
/// everything collected so far.
pub fn accrue<S: YieldSource>(
    protocol: &mut ProtocolState,
    position: &mut Position,
    source: &mut S,
) -> Result<AccrualOutcome> {
    check_accrue(protocol, position)?;

    let harvested = source.harvest()?;
    protocol.cumulative_yield = checked_add(protocol.cumulative_yield, harvested)?;

    let new_yield = attributable_yield(
        position,
        protocol.cumulative_yield,
        protocol.total_principal_locked,
        protocol.unattributed_yield(),
    )?;

    if new_yield > 0 {
        let pending_yield = checked_add(position.pending_yield, new_yield)?;
        let total_yield_earned = checked_add(position.total_yield_earned, new_yield)?;
        let total_yield_harvested = checked_add(protocol.total_yield_harvested, new_yield)?;

        position.pending_yield = pending_yield;
        position.total_yield_earned = total_yield_earned;
        protocol.total_yield_harvested = total_yield_harvested;
    }

    position.check_conservation()?;
    protocol.check_conservation()?;

    Ok(AccrualOutcome {
        harvested,
        new_yield,
    })
}

/// Pending yield including what the next accrual would credit, using
/// `available_yield` as the not-yet-harvested part of the aggregate.
pub fn preview_pending_yield(
    protocol: &ProtocolState,
    position: &Position,
    available_yield: u64,
) -> Result<u64> {
    if !position.active {
        return Ok(position.pending_yield);
    }

    let y_total = checked_add(protocol.cumulative_yield, available_yield)?;
    let unattributed = y_total.saturating_sub(protocol.total_yield_harvested);
    let upcoming = attributable_yield(
        position,
        y_total,
        protocol.total_principal_locked,
        unattributed,
    )?;
    checked_add(position.pending_yield, upcoming)
}

/// Read-only pending yield query against a live yield source.
pub fn get_pending_yield<S: YieldSource>(
    protocol: &ProtocolState,
    position: &Position,
    source: &S,
) -> Result<u64> {
    preview_pending_yield(protocol, position, source.available_yield()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(principal: u64, earned: u64) -> Position {
        Position {
            principal_deposited: principal,
            total_yield_earned: earned,
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_attributable_pro_rata() {
        let a = position(60_000, 0);
        let b = position(40_000, 0);
        assert_eq!(attributable_yield(&a, 10_000, 100_000, 10_000).unwrap(), 6_000);
        assert_eq!(attributable_yield(&b, 10_000, 100_000, 4_000).unwrap(), 4_000);
    }

    #[test]
    fn test_attributable_subtracts_earned() {
        let p = position(10_000, 1_000);
        assert_eq!(attributable_yield(&p, 1_000, 10_000, 0).unwrap(), 0);
        assert_eq!(attributable_yield(&p, 1_500, 10_000, 500).unwrap(), 500);
    }

    #[test]
    fn test_attributable_capped_by_unattributed() {
        let p = position(10_000, 0);
        assert_eq!(attributable_yield(&p, 1_000, 10_000, 250).unwrap(), 250);
    }

    #[test]
    fn test_nothing_locked_attributes_nothing() {
        let p = position(10_000, 0);
        assert_eq!(attributable_yield(&p, 1_000, 0, 1_000).unwrap(), 0);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let protocol = ProtocolState {
            total_principal_locked: 10_000,
            cumulative_yield: 400,
            total_yield_harvested: 400,
            ..Default::default()
        };
        let mut p = position(10_000, 400);
        p.pending_yield = 400;

        assert_eq!(preview_pending_yield(&protocol, &p, 600).unwrap(), 1_000);
        assert_eq!(p.pending_yield, 400);
        assert_eq!(protocol.cumulative_yield, 400);
    }
}
