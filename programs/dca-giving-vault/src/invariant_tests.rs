// Property tests over the ledger: whatever sequence of operations runs,
// principal and yield stay fully accounted for.

use anchor_lang::prelude::*;
use proptest::prelude::*;

use crate::{
    adapters::Asset,
    constants::*,
    ledger::{
        accrual,
        batch::{self, BatchOperation},
        donation,
        donation::DonationSplit,
        positions, scheduler,
    },
    state::{Beneficiary, Position, ProtocolState},
    test_utils::*,
};

const SLOTS: usize = 3;

fn election(slot: usize) -> &'static [u16] {
    match slot {
        0 => &[0],
        1 => &[1, 2],
        _ => &[0, 3, 5],
    }
}

#[derive(Debug, Clone)]
enum Fault {
    Heal,
    Shortfall(u64),
    ExchangeDown,
    Unroutable(u16),
    TransfersStopAfter(usize),
}

#[derive(Debug, Clone)]
enum Step {
    Open { slot: usize, principal: u64, donation_bps: u16 },
    Swap { slot: usize },
    Yield { amount: u64 },
    Accrue { slot: usize },
    Claim { slot: usize },
    Close { slot: usize },
    Batch { operation: BatchOperation },
    Wait { seconds: i64 },
    Inject(Fault),
}

fn fault() -> impl Strategy<Value = Fault> {
    prop_oneof![
        3 => Just(Fault::Heal),
        1 => (1..3u64).prop_map(Fault::Shortfall),
        1 => Just(Fault::ExchangeDown),
        1 => (0..6u16).prop_map(Fault::Unroutable),
        1 => (0..3usize).prop_map(Fault::TransfersStopAfter),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..SLOTS, DEFAULT_MIN_DEPOSIT..5_000_000u64, MIN_DONATION_BPS..=MAX_DONATION_BPS)
            .prop_map(|(slot, principal, donation_bps)| Step::Open { slot, principal, donation_bps }),
        2 => (0..SLOTS).prop_map(|slot| Step::Swap { slot }),
        2 => (0..250_000u64).prop_map(|amount| Step::Yield { amount }),
        2 => (0..SLOTS).prop_map(|slot| Step::Accrue { slot }),
        2 => (0..SLOTS).prop_map(|slot| Step::Claim { slot }),
        1 => (0..SLOTS).prop_map(|slot| Step::Close { slot }),
        2 => prop_oneof![
            Just(BatchOperation::Swap),
            Just(BatchOperation::Accrue),
            Just(BatchOperation::Claim),
        ]
        .prop_map(|operation| Step::Batch { operation }),
        2 => (0..3 * SECONDS_PER_DAY).prop_map(|seconds| Step::Wait { seconds }),
        1 => fault().prop_map(Step::Inject),
    ]
}

/// Everything one run touches. A step that fails is reverted as a whole,
/// the way a failed transaction would be.
#[derive(Clone)]
struct Ledger {
    protocol: ProtocolState,
    registry: Vec<Beneficiary>,
    slots: Vec<Position>,
    owners: Vec<Pubkey>,
    source: MockYieldSource,
    exchange: MockExchange,
    payouts: MockPayouts,
    now: i64,
    // Counters of records that were re-opened over
    retired_earned: u64,
    retired_claimed: u64,
    retired_donated: u64,
    principal_returned: u64,
    converted_returned: u64,
}

impl Ledger {
    fn new() -> Self {
        Self {
            protocol: protocol(6),
            registry: registry(6),
            slots: vec![Position::default(); SLOTS],
            owners: (0..SLOTS).map(|_| Pubkey::new_unique()).collect(),
            source: MockYieldSource::default(),
            exchange: MockExchange::at_rate(7, 5),
            payouts: MockPayouts::default(),
            now: START,
            retired_earned: 0,
            retired_claimed: 0,
            retired_donated: 0,
            principal_returned: 0,
            converted_returned: 0,
        }
    }

    fn apply(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Open { slot, principal, donation_bps } => {
                let selection = election(slot);
                let previous = self.slots[slot].clone();
                positions::open(
                    &mut self.protocol,
                    &mut self.slots[slot],
                    self.owners[slot],
                    principal,
                    donation_bps,
                    selection,
                    &records(&self.registry, selection),
                    self.now,
                    &mut self.source,
                )?;
                self.retired_earned += previous.total_yield_earned;
                self.retired_claimed += previous.yield_claimed;
                self.retired_donated += previous.yield_donated;
            }
            Step::Swap { slot } => {
                scheduler::execute_swap(
                    &mut self.protocol,
                    &mut self.slots[slot],
                    self.now,
                    &mut self.source,
                    &mut self.exchange,
                )?;
            }
            Step::Yield { amount } => self.source.accrue(amount),
            Step::Accrue { slot } => {
                accrual::accrue(&mut self.protocol, &mut self.slots[slot], &mut self.source)?;
            }
            Step::Claim { slot } => {
                let mut election = records(&self.registry, self.slots[slot].selected_beneficiaries());
                donation::claim(&self.protocol, &mut self.slots[slot], &mut election, &mut self.payouts)?;
                commit(&mut self.registry, &election);
            }
            Step::Close { slot } => {
                let mut election = records(&self.registry, self.slots[slot].selected_beneficiaries());
                let closed = positions::close(
                    &mut self.protocol,
                    &mut self.slots[slot],
                    &mut election,
                    self.now,
                    &mut self.source,
                    &mut self.payouts,
                )?;
                commit(&mut self.registry, &election);
                self.principal_returned += closed.principal_returned;
                self.converted_returned += closed.swapped_balance_returned;
            }
            Step::Batch { operation } => {
                batch::execute_batch(
                    operation,
                    &mut self.protocol,
                    &mut self.slots,
                    &mut self.registry,
                    self.now,
                    &mut self.source,
                    &mut self.exchange,
                    &mut self.payouts,
                )?;
            }
            Step::Wait { seconds } => self.now += seconds,
            Step::Inject(fault) => match fault {
                Fault::Heal => {
                    self.source.shortfall = 0;
                    self.exchange.fail = false;
                    self.payouts.reject = None;
                    self.payouts.fail_after = None;
                }
                Fault::Shortfall(amount) => self.source.shortfall = amount,
                Fault::ExchangeDown => self.exchange.fail = true,
                Fault::Unroutable(id) => {
                    self.payouts.reject = Some(self.registry[id as usize].payout)
                }
                Fault::TransfersStopAfter(count) => {
                    self.payouts.fail_after = Some(self.payouts.transfers.len() + count)
                }
            },
        }
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_split_is_exact(
        total in any::<u64>(),
        donation_bps in MIN_DONATION_BPS..=MAX_DONATION_BPS,
        count in MIN_BENEFICIARIES..=MAX_BENEFICIARIES,
    ) {
        let split = DonationSplit::compute(total, donation_bps, count).unwrap();

        let expected = (total as u128 * donation_bps as u128 / MAX_BPS as u128) as u64;
        prop_assert_eq!(split.donated, expected);
        prop_assert_eq!(split.user_amount + split.donated, total);
        prop_assert_eq!(split.per_beneficiary, split.donated / count as u64);

        let shares: u64 = (0..count).map(|i| split.share_for(i)).sum();
        prop_assert_eq!(shares, split.donated);
    }

    #[test]
    fn prop_second_accrual_adds_nothing(
        a in DEFAULT_MIN_DEPOSIT..10_000_000u64,
        b in DEFAULT_MIN_DEPOSIT..10_000_000u64,
        harvested in 0..1_000_000u64,
    ) {
        let mut protocol = protocol(6);
        let registry = registry(6);
        let mut source = MockYieldSource::default();
        let mut first = Position::default();
        let mut second = Position::default();
        for (position, principal) in [(&mut first, a), (&mut second, b)] {
            positions::open(
                &mut protocol,
                position,
                Pubkey::new_unique(),
                principal,
                1_000,
                &[0],
                &records(&registry, &[0]),
                START,
                &mut source,
            )
            .unwrap();
        }

        source.accrue(harvested);
        accrual::accrue(&mut protocol, &mut first, &mut source).unwrap();
        accrual::accrue(&mut protocol, &mut second, &mut source).unwrap();
        let pending = (first.pending_yield, second.pending_yield);

        prop_assert_eq!(accrual::accrue(&mut protocol, &mut first, &mut source).unwrap().new_yield, 0);
        prop_assert_eq!(accrual::accrue(&mut protocol, &mut second, &mut source).unwrap().new_yield, 0);
        prop_assert_eq!((first.pending_yield, second.pending_yield), pending);
        prop_assert!(first.pending_yield + second.pending_yield <= harvested);
    }

    #[test]
    fn prop_ledger_conserves_value(steps in prop::collection::vec(step(), 1..80)) {
        let mut ledger = Ledger::new();

        for step in steps {
            let before = ledger.clone();
            if ledger.apply(step).is_err() {
                ledger = before;
            }

            let Ledger { protocol, registry, slots, source, payouts, .. } = &ledger;

            for position in slots {
                prop_assert!(position.check_conservation().is_ok());
            }
            prop_assert!(protocol.check_conservation().is_ok());

            let refs: Vec<&Position> = slots.iter().collect();
            prop_assert_eq!(locked(&refs), protocol.total_principal_locked);
            prop_assert_eq!(source.supplied, protocol.total_principal_locked);
            prop_assert_eq!(
                slots.iter().filter(|p| p.active).count() as u64,
                protocol.active_position_count
            );

            let earned: u64 = slots.iter().map(|p| p.total_yield_earned).sum();
            prop_assert_eq!(earned + ledger.retired_earned, protocol.total_yield_harvested);

            let donated: u64 = slots.iter().map(|p| p.yield_donated).sum();
            let received: u64 = registry.iter().map(|b| b.total_received).sum();
            prop_assert_eq!(donated + ledger.retired_donated, received);

            // Deposit asset leaving the vault is claimed yield, donated
            // yield or returned principal, nothing else
            let claimed: u64 = slots.iter().map(|p| p.yield_claimed).sum();
            prop_assert_eq!(
                payouts.paid(Asset::Deposit),
                claimed + ledger.retired_claimed + donated + ledger.retired_donated + ledger.principal_returned
            );
            prop_assert_eq!(payouts.paid(Asset::Converted), ledger.converted_returned);
        }
    }
}
