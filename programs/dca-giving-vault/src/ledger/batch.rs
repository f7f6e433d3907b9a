use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::{
    adapters::{Exchange, Payouts, YieldSource},
    errors::VaultError,
    ledger::{accrual, donation, donation::ClaimPlan, scheduler},
    state::{Beneficiary, Position, ProtocolState},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOperation {
    Swap,
    Claim,
    Accrue,
}

#[derive(Debug)]
pub struct SkippedOwner {
    pub owner: Pubkey,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub attempted: u32,
    pub succeeded: u32,
    pub skipped: Vec<SkippedOwner>,
}

/// Custom error number of a skipped item, 0 for non-program errors.
pub fn error_code(error: &Error) -> u32 {
    match error {
        Error::AnchorError(err) => err.error_code_number,
        Error::ProgramError(_) => 0,
    }
}

fn election_records(registry: &[Beneficiary], position: &Position) -> Result<Vec<Beneficiary>> {
    position
        .selected_beneficiaries()
        .iter()
        .map(|id| {
            registry
                .iter()
                .find(|record| record.id == *id)
                .cloned()
                .ok_or_else(|| error!(VaultError::BeneficiaryMismatch))
        })
        .collect()
}

/// An owner that passed every ledger-side check of the operation.
enum Ready {
    Swap,
    Accrue,
    Claim(Vec<Beneficiary>, ClaimPlan),
}

fn check<P: Payouts>(
    operation: BatchOperation,
    protocol: &ProtocolState,
    position: &Position,
    registry: &[Beneficiary],
    now: i64,
    payouts: &P,
) -> Result<Ready> {
    match operation {
        BatchOperation::Swap => scheduler::check_swap(protocol, position, now).map(|_| Ready::Swap),
        BatchOperation::Accrue => accrual::check_accrue(protocol, position).map(|_| Ready::Accrue),
        BatchOperation::Claim => {
            let records = election_records(registry, position)?;
            let plan = donation::prepare_claim(protocol, position, &records, payouts)?;
            Ok(Ready::Claim(records, plan))
        }
    }
}

/// Applies `operation` to every position in turn.
///
/// An owner failing a ledger-side check (ineligible, nothing to claim,
/// missing records, unroutable payout) is recorded in the report and
/// skipped; nothing external has been called for it at that point. Once an
/// owner's operation reaches the yield source, the exchange or a transfer,
/// any failure is returned and the whole batch must be reverted. `registry`
/// must contain every beneficiary record referenced by a claiming position.
#[allow(clippy::too_many_arguments)]
pub fn execute_batch<S: YieldSource, E: Exchange, P: Payouts>(
    operation: BatchOperation,
    protocol: &mut ProtocolState,
    positions: &mut [Position],
    registry: &mut [Beneficiary],
    now: i64,
    source: &mut S,
    exchange: &mut E,
    payouts: &mut P,
) -> Result<BatchReport> {
    protocol.require_not_paused()?;

    let mut report = BatchReport::default();

    for position in positions.iter_mut() {
        report.attempted += 1;

        let ready = match check(operation, protocol, position, registry, now, payouts) {
            Ok(ready) => ready,
            Err(error) => {
                #[cfg(feature = "verbose")]
                msg!("batch: skipped {} ({})", position.owner, error);

                report.skipped.push(SkippedOwner {
                    owner: position.owner,
                    error,
                });
                continue;
            }
        };

        match ready {
            Ready::Swap => {
                scheduler::execute_swap(protocol, position, now, source, exchange)?;
            }
            Ready::Accrue => {
                accrual::accrue(protocol, position, source)?;
            }
            Ready::Claim(mut records, plan) => {
                donation::settle_claim(plan, position, &mut records, payouts)?;
                for record in records {
                    if let Some(slot) = registry.iter_mut().find(|r| r.id == record.id) {
                        *slot = record;
                    }
                }
            }
        }
        report.succeeded += 1;
    }

    Ok(report)
}
