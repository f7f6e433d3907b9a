use anchor_lang::prelude::*;

use crate::{
    adapters::{Asset, Payouts},
    errors::VaultError,
    math::{apply_bps, checked_add},
    state::{Beneficiary, Position, ProtocolState},
};

/// Deterministic split of one claim.
///
/// `user_amount + donated == total` exactly. The donated part is divided
/// evenly; the rounding remainder goes to the first selected beneficiary so
/// the sum of beneficiary shares is exactly `donated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationSplit {
    pub total: u64,
    pub user_amount: u64,
    pub donated: u64,
    pub per_beneficiary: u64,
    pub remainder: u64,
}

impl DonationSplit {
    pub fn compute(total: u64, donation_bps: u16, beneficiary_count: usize) -> Result<Self> {
        require!(beneficiary_count > 0, VaultError::BeneficiaryMismatch);

        let donated = apply_bps(total, donation_bps as u64)?;
        let user_amount = total.checked_sub(donated).ok_or(VaultError::MathOverflow)?;
        let count = beneficiary_count as u64;

        Ok(Self {
            total,
            user_amount,
            donated,
            per_beneficiary: donated / count,
            remainder: donated % count,
        })
    }

    pub fn share_for(&self, index: usize) -> u64 {
        if index == 0 {
            self.per_beneficiary + self.remainder
        } else {
            self.per_beneficiary
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub split: DonationSplit,
    /// (beneficiary id, amount) for every beneficiary that received a transfer
    pub donations: Vec<(u16, u64)>,
}

/// A claim that has passed every check and is ready to pay out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimPlan {
    pub split: DonationSplit,
    yield_donated: u64,
    yield_claimed: u64,
    /// (election index, share, staged total_received, staged donor_count)
    credits: Vec<(usize, u64, (u64, u64))>,
}

/// Every check a claim makes before money moves: gates, election records,
/// counter arithmetic and routing of each recipient. Mutates nothing.
/// `beneficiaries` must be the records of the position's election, in
/// election order.
pub fn prepare_claim<P: Payouts>(
    protocol: &ProtocolState,
    position: &Position,
    beneficiaries: &[Beneficiary],
    payouts: &P,
) -> Result<ClaimPlan> {
    protocol.require_not_paused()?;
    position.require_active()?;

    let pending = position.pending_yield;
    require!(pending > 0, VaultError::NoYieldToClaim);

    let selection = position.selected_beneficiaries();
    require!(
        beneficiaries.len() == selection.len(),
        VaultError::BeneficiaryMismatch
    );
    for (record, id) in beneficiaries.iter().zip(selection) {
        require!(record.id == *id, VaultError::BeneficiaryMismatch);
    }

    let split = DonationSplit::compute(pending, position.donation_bps, selection.len())?;

    let yield_donated = checked_add(position.yield_donated, split.donated)?;
    let yield_claimed = checked_add(position.yield_claimed, split.user_amount)?;
    let mut credits = Vec::with_capacity(beneficiaries.len());
    for (index, record) in beneficiaries.iter().enumerate() {
        let share = split.share_for(index);
        if share > 0 {
            credits.push((index, share, record.credited(share)?));
        }
    }

    if split.user_amount > 0 {
        payouts.check_recipient(Asset::Deposit, &position.owner)?;
    }
    for (index, _, _) in &credits {
        payouts.check_recipient(Asset::Deposit, &beneficiaries[*index].payout)?;
    }

    Ok(ClaimPlan {
        split,
        yield_donated,
        yield_claimed,
        credits,
    })
}

/// Applies a prepared claim and makes its transfers.
///
/// The ledger is finalized before the first transfer so a re-entrant claim
/// sees `pending_yield == 0`; a failed transfer restores every record
/// touched. Funds already sent by then are only recovered by reverting the
/// enclosing transaction, so callers must propagate the error.
pub fn settle_claim<P: Payouts>(
    plan: ClaimPlan,
    position: &mut Position,
    beneficiaries: &mut [Beneficiary],
    payouts: &mut P,
) -> Result<ClaimOutcome> {
    require!(
        position.pending_yield == plan.split.total,
        VaultError::InvariantViolation
    );

    let position_snapshot = position.clone();
    let beneficiaries_snapshot = beneficiaries.to_vec();

    position.pending_yield = 0;
    position.yield_donated = plan.yield_donated;
    position.yield_claimed = plan.yield_claimed;
    for (index, _, (total_received, donor_count)) in &plan.credits {
        beneficiaries[*index].total_received = *total_received;
        beneficiaries[*index].donor_count = *donor_count;
    }

    let owner = position.owner;
    let mut transferred = payouts.transfer(Asset::Deposit, &owner, plan.split.user_amount);
    for (index, share, _) in &plan.credits {
        if transferred.is_err() {
            break;
        }
        transferred = payouts.transfer(Asset::Deposit, &beneficiaries[*index].payout, *share);
    }

    if let Err(err) = transferred {
        *position = position_snapshot;
        beneficiaries.clone_from_slice(&beneficiaries_snapshot);
        return Err(err);
    }

    position.check_conservation()?;

    #[cfg(feature = "verbose")]
    msg!(
        "claim: total={} user={} donated={}",
        plan.split.total,
        plan.split.user_amount,
        plan.split.donated
    );

    Ok(ClaimOutcome {
        split: plan.split,
        donations: plan
            .credits
            .iter()
            .map(|(index, share, _)| (beneficiaries[*index].id, *share))
            .collect(),
    })
}

/// Pays out a position's pending yield, split between the owner and the
/// election. Nothing is sent unless every recipient can be routed.
pub fn claim<P: Payouts>(
    protocol: &ProtocolState,
    position: &mut Position,
    beneficiaries: &mut [Beneficiary],
    payouts: &mut P,
) -> Result<ClaimOutcome> {
    let plan = prepare_claim(protocol, position, beneficiaries, payouts)?;
    settle_claim(plan, position, beneficiaries, payouts)
}
