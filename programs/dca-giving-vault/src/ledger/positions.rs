use anchor_lang::prelude::*;

use crate::{
    adapters::{Asset, Payouts, YieldSource},
    constants::*,
    errors::VaultError,
    ledger::donation::{self, ClaimOutcome},
    math::{apply_bps, checked_add, checked_sub},
    state::{Beneficiary, Position, ProtocolState},
};

/// Checks a donation election against the registry. `records` must be the
/// beneficiary records for `selection`, in the same order.
pub fn validate_election(
    protocol: &ProtocolState,
    donation_bps: u16,
    selection: &[u16],
    records: &[Beneficiary],
) -> Result<()> {
    require!(
        (MIN_DONATION_BPS..=MAX_DONATION_BPS).contains(&donation_bps),
        VaultError::InvalidDonationPercent
    );
    require!(
        (MIN_BENEFICIARIES..=MAX_BENEFICIARIES).contains(&selection.len()),
        VaultError::InvalidBeneficiarySelection
    );
    require!(
        records.len() == selection.len(),
        VaultError::InvalidBeneficiarySelection
    );

    for (i, (id, record)) in selection.iter().zip(records).enumerate() {
        require!(
            !selection[..i].contains(id),
            VaultError::InvalidBeneficiarySelection
        );
        require!(
            *id < protocol.beneficiary_count && record.id == *id && record.active,
            VaultError::InvalidBeneficiarySelection
        );
    }

    Ok(())
}

/// All rejections `open` can produce before anything moves.
pub fn validate_open(
    protocol: &ProtocolState,
    position: &Position,
    principal: u64,
    donation_bps: u16,
    selection: &[u16],
    records: &[Beneficiary],
) -> Result<u64> {
    protocol.require_not_paused()?;
    require!(!position.active, VaultError::DuplicatePosition);
    validate_election(protocol, donation_bps, selection, records)?;
    require!(
        principal >= protocol.min_deposit,
        VaultError::DepositBelowMinimum
    );

    let per_swap_amount = apply_bps(principal, PER_SWAP_BPS)?;
    require!(per_swap_amount > 0, VaultError::DepositBelowMinimum);
    Ok(per_swap_amount)
}

/// Creates the owner's position and deploys its principal. Returns the new
/// position id. `position` may be a previously closed record of the same
/// owner; it is re-initialized from scratch.
#[allow(clippy::too_many_arguments)]
pub fn open<S: YieldSource>(
    protocol: &mut ProtocolState,
    position: &mut Position,
    owner: Pubkey,
    principal: u64,
    donation_bps: u16,
    selection: &[u16],
    records: &[Beneficiary],
    now: i64,
    source: &mut S,
) -> Result<u64> {
    let per_swap_amount = validate_open(
        protocol,
        position,
        principal,
        donation_bps,
        selection,
        records,
    )?;

    let total_principal_locked = checked_add(protocol.total_principal_locked, principal)?;
    let active_position_count = protocol
        .active_position_count
        .checked_add(1)
        .ok_or(VaultError::MathOverflow)?;

    source.supply(principal)?;

    let position_id = protocol.allocate_position_id()?;
    protocol.total_principal_locked = total_principal_locked;
    protocol.active_position_count = active_position_count;

    *position = Position {
        owner,
        position_id,
        principal_deposited: principal,
        per_swap_amount,
        last_swap_time: now,
        active: true,
        created_at: now,
        bump: position.bump,
        ..Default::default()
    };
    position.set_election(donation_bps, selection);

    position.check_conservation()?;
    protocol.check_conservation()?;

    #[cfg(feature = "verbose")]
    msg!(
        "open: id={} principal={} per_swap={}",
        position_id,
        principal,
        per_swap_amount
    );

    Ok(position_id)
}

/// Replaces the donation election of an active position.
pub fn update_election(
    protocol: &ProtocolState,
    position: &mut Position,
    donation_bps: u16,
    selection: &[u16],
    records: &[Beneficiary],
) -> Result<()> {
    protocol.require_not_paused()?;
    position.require_active()?;
    validate_election(protocol, donation_bps, selection, records)?;

    position.set_election(donation_bps, selection);

    position.check_conservation()?;
    protocol.check_conservation()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    pub principal_returned: u64,
    pub swapped_balance_returned: u64,
    /// Pending yield settled on the way out, if any
    pub claim: Option<ClaimOutcome>,
}

/// Withdraws the remaining principal, pays out principal and converted
/// balance, settles pending yield, and deactivates the position.
///
/// `beneficiaries` are only consulted when the position still has pending
/// yield; they must then match the election.
pub fn close<S: YieldSource, P: Payouts>(
    protocol: &mut ProtocolState,
    position: &mut Position,
    beneficiaries: &mut [Beneficiary],
    now: i64,
    source: &mut S,
    payouts: &mut P,
) -> Result<CloseOutcome> {
    protocol.require_not_paused()?;
    position.require_active()?;

    let remaining = position.remaining_principal();
    let swapped_balance = position.swapped_balance;
    let total_principal_locked = checked_sub(protocol.total_principal_locked, remaining)?;
    let active_position_count = protocol
        .active_position_count
        .checked_sub(1)
        .ok_or(VaultError::InvariantViolation)?;

    let plan = if position.pending_yield > 0 {
        Some(donation::prepare_claim(protocol, position, beneficiaries, payouts)?)
    } else {
        None
    };
    let owner = position.owner;
    if remaining > 0 {
        payouts.check_recipient(Asset::Deposit, &owner)?;
    }
    if swapped_balance > 0 {
        payouts.check_recipient(Asset::Converted, &owner)?;
    }

    if remaining > 0 {
        let received = source.withdraw(remaining)?;
        require!(received >= remaining, VaultError::InsufficientLiquidity);
    }

    let position_snapshot = position.clone();
    let beneficiaries_snapshot = beneficiaries.to_vec();

    let claim = match plan {
        Some(plan) => Some(donation::settle_claim(plan, position, beneficiaries, payouts)?),
        None => None,
    };

    let transferred = payouts
        .transfer(Asset::Deposit, &owner, remaining)
        .and_then(|_| payouts.transfer(Asset::Converted, &owner, swapped_balance));
    if let Err(err) = transferred {
        *position = position_snapshot;
        beneficiaries.clone_from_slice(&beneficiaries_snapshot);
        return Err(err);
    }

    position.active = false;
    position.closed_at = now;
    protocol.total_principal_locked = total_principal_locked;
    protocol.active_position_count = active_position_count;

    position.check_conservation()?;
    protocol.check_conservation()?;

    Ok(CloseOutcome {
        principal_returned: remaining,
        swapped_balance_returned: swapped_balance,
        claim,
    })
}
