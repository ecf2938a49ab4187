//! Funding ledger: custody and lifecycle of a single campaign
//!
//! Tracks what each contributor has put in, holds the pooled value until the
//! deadline, and then resolves exactly once: either the whole pool goes to the
//! recipient, or contributors reclaim their own balances one by one.
//!
//! Every mutation runs to completion before the next one starts (`&mut self`).
//! Withdrawals still zero the caller's balance before value leaves custody, so
//! a repeated or nested withdrawal can never pay out twice.

use crate::traits::{Clock, FundSink, ValueTransfer};
use crowdfund_types::{
    Address, Amount, CampaignId, CampaignParams, CampaignState, Contribution, ContributionPolicy,
    EventLog, EventRecord, LedgerError, LedgerEvent, LedgerResult, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lifetime value flows through a ledger
///
/// `contributed == custodied + paid_out + forwarded` holds after every
/// operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Everything ever accepted
    pub contributed: Amount,
    /// Everything returned through `withdraw`
    pub paid_out: Amount,
    /// Everything forwarded to the recipient
    pub forwarded: Amount,
}

/// Serializable state of a ledger, without its collaborators
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub id: CampaignId,
    pub address: Address,
    pub params: CampaignParams,
    pub policy: ContributionPolicy,
    pub state: CampaignState,
    pub balances: BTreeMap<Address, Amount>,
    pub custodied: Amount,
    pub totals: LedgerTotals,
    pub events: EventLog,
}

/// Custody and lifecycle state machine for one campaign
pub struct FundingLedger<C, S, T> {
    id: CampaignId,
    /// The ledger's own address; bare transfers to it count as contributions
    address: Address,
    params: CampaignParams,
    policy: ContributionPolicy,
    state: CampaignState,
    balances: HashMap<Address, Amount>,
    /// Value currently held by the ledger
    custodied: Amount,
    totals: LedgerTotals,
    events: EventLog,
    clock: C,
    sink: S,
    transfer: T,
}

impl<C: Clock, S: FundSink, T: ValueTransfer> FundingLedger<C, S, T> {
    /// Create a pending campaign funding `sink`.
    pub fn new(threshold: Amount, deadline: Timestamp, clock: C, sink: S, transfer: T) -> Self {
        let params = CampaignParams::new(sink.address().clone(), threshold, deadline);
        Self {
            id: CampaignId::generate(),
            address: Address::generate(),
            params,
            policy: ContributionPolicy::default(),
            state: CampaignState::Pending,
            balances: HashMap::new(),
            custodied: Amount::zero(),
            totals: LedgerTotals::default(),
            events: EventLog::new(),
            clock,
            sink,
            transfer,
        }
    }

    pub fn with_policy(mut self, policy: ContributionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rebuild a ledger from a snapshot and fresh collaborators.
    pub fn restore(snapshot: LedgerSnapshot, clock: C, sink: S, transfer: T) -> Self {
        if snapshot.params.recipient != *sink.address() {
            warn!(
                campaign = %snapshot.id,
                expected = %snapshot.params.recipient,
                actual = %sink.address(),
                "Restored ledger with a different funding recipient"
            );
        }
        Self {
            id: snapshot.id,
            address: snapshot.address,
            params: snapshot.params,
            policy: snapshot.policy,
            state: snapshot.state,
            balances: snapshot.balances.into_iter().collect(),
            custodied: snapshot.custodied,
            totals: snapshot.totals,
            events: snapshot.events,
            clock,
            sink,
            transfer,
        }
    }

    // --- Mutations ---

    /// Record a contribution of `amount` from `contributor`.
    ///
    /// Zero-value contributions are accepted and still emit an event.
    pub fn contribute(&mut self, contributor: &Address, amount: Amount) -> LedgerResult<()> {
        if !self.policy.accepts(self.state) {
            warn!(
                campaign = %self.id,
                contributor = %contributor,
                amount = %amount,
                state = %self.state,
                "Contribution rejected after resolution"
            );
            return Err(LedgerError::CampaignResolved { state: self.state });
        }

        let balance = self
            .balance_of(contributor)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        let custodied = self
            .custodied
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        let contributed = self
            .totals
            .contributed
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        self.balances.insert(contributor.clone(), balance);
        self.custodied = custodied;
        self.totals.contributed = contributed;

        let now = self.clock.now();
        self.events.record(
            now,
            LedgerEvent::Contribution(Contribution {
                contributor: contributor.clone(),
                amount,
            }),
        );

        info!(
            campaign = %self.id,
            contributor = %contributor,
            amount = %amount,
            balance = %balance,
            "Contribution received"
        );

        Ok(())
    }

    /// Value sent straight to the ledger's address with no instruction.
    ///
    /// Treated exactly like a contribution from `sender`.
    pub fn receive_direct(&mut self, sender: &Address, amount: Amount) -> LedgerResult<()> {
        debug!(
            campaign = %self.id,
            sender = %sender,
            amount = %amount,
            "Bare transfer received, crediting as contribution"
        );
        self.contribute(sender, amount)
    }

    /// Pay the caller's whole balance back. Returns the amount paid.
    ///
    /// Only allowed once the campaign failed. A caller with nothing recorded
    /// (including one who already withdrew) gets a successful zero payout.
    pub fn withdraw(&mut self, caller: &Address) -> LedgerResult<Amount> {
        if !self.state.is_open_to_withdraw() {
            warn!(
                campaign = %self.id,
                caller = %caller,
                state = %self.state,
                "Withdrawal rejected"
            );
            return Err(LedgerError::NotOpenForWithdrawal { state: self.state });
        }

        let amount = self.balance_of(caller);

        // Effects before interaction: the balance is gone before value moves.
        if let Some(balance) = self.balances.get_mut(caller) {
            *balance = Amount::zero();
        }
        self.custodied = self.custodied.saturating_sub(amount);

        if let Err(err) = self.transfer.send(caller, amount) {
            if let Some(balance) = self.balances.get_mut(caller) {
                *balance = amount;
            }
            self.custodied = self.custodied.saturating_add(amount);
            warn!(
                campaign = %self.id,
                caller = %caller,
                amount = %amount,
                error = %err,
                "Withdrawal transfer failed, rolled back"
            );
            return Err(err.into());
        }

        self.totals.paid_out = self.totals.paid_out.saturating_add(amount);
        if !amount.is_zero() {
            let now = self.clock.now();
            self.events.record(
                now,
                LedgerEvent::Withdrawal {
                    contributor: caller.clone(),
                    amount,
                },
            );
        }

        info!(
            campaign = %self.id,
            caller = %caller,
            amount = %amount,
            "Withdrawal completed"
        );

        Ok(amount)
    }

    /// Decide the outcome once the deadline has passed.
    ///
    /// Before the deadline this fails with `TooEarly`. The first call at or
    /// after the deadline either forwards the whole custody to the recipient
    /// (threshold met) or opens withdrawals. Later calls return the settled
    /// state without moving anything.
    pub fn resolve(&mut self) -> LedgerResult<CampaignState> {
        let now = self.clock.now();
        if now < self.params.deadline {
            warn!(
                campaign = %self.id,
                now = %now,
                deadline = %self.params.deadline,
                "Resolve called before deadline"
            );
            return Err(LedgerError::TooEarly {
                now,
                deadline: self.params.deadline,
            });
        }

        if self.state.is_resolved() {
            debug!(campaign = %self.id, state = %self.state, "Already resolved");
            return Ok(self.state);
        }

        let total = self.total_contributed();
        if total >= self.params.threshold {
            let amount = self.custodied;

            self.state = CampaignState::Succeeded;
            self.custodied = Amount::zero();

            if let Err(err) = self.sink.complete(amount) {
                self.state = CampaignState::Pending;
                self.custodied = amount;
                warn!(
                    campaign = %self.id,
                    recipient = %self.params.recipient,
                    amount = %amount,
                    error = %err,
                    "Forwarding to recipient failed, campaign stays pending"
                );
                return Err(err.into());
            }

            self.totals.forwarded = self.totals.forwarded.saturating_add(amount);
            self.events.record(
                now,
                LedgerEvent::FundsForwarded {
                    recipient: self.params.recipient.clone(),
                    amount,
                },
            );

            info!(
                campaign = %self.id,
                recipient = %self.params.recipient,
                amount = %amount,
                threshold = %self.params.threshold,
                "Campaign succeeded, funds forwarded"
            );
        } else {
            self.state = CampaignState::FailedOpenForWithdrawal;
            self.events.record(
                now,
                LedgerEvent::WithdrawalsOpened {
                    total,
                    threshold: self.params.threshold,
                },
            );

            info!(
                campaign = %self.id,
                total = %total,
                threshold = %self.params.threshold,
                "Campaign missed threshold, withdrawals open"
            );
        }

        Ok(self.state)
    }

    // --- Query methods ---

    /// Time until the deadline, zero once it has passed.
    pub fn time_left(&self) -> Duration {
        self.clock
            .now()
            .saturating_duration_until(self.params.deadline)
    }

    pub fn balance_of(&self, contributor: &Address) -> Amount {
        self.balances.get(contributor).copied().unwrap_or_default()
    }

    /// Sum of all recorded balances.
    pub fn total_contributed(&self) -> Amount {
        self.balances
            .values()
            .fold(Amount::zero(), |acc, amount| acc.saturating_add(*amount))
    }

    /// Value currently held by the ledger.
    pub fn custodied(&self) -> Amount {
        self.custodied
    }

    pub fn threshold(&self) -> Amount {
        self.params.threshold
    }

    pub fn deadline(&self) -> Timestamp {
        self.params.deadline
    }

    pub fn recipient(&self) -> &Address {
        &self.params.recipient
    }

    pub fn params(&self) -> &CampaignParams {
        &self.params
    }

    pub fn state(&self) -> CampaignState {
        self.state
    }

    pub fn is_open_to_withdraw(&self) -> bool {
        self.state.is_open_to_withdraw()
    }

    pub fn policy(&self) -> ContributionPolicy {
        self.policy
    }

    pub fn totals(&self) -> LedgerTotals {
        self.totals
    }

    pub fn id(&self) -> &CampaignId {
        &self.id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn contributions(&self) -> impl Iterator<Item = (&EventRecord, &Contribution)> {
        self.events.contributions()
    }

    /// Contributors with a non-zero balance, in address order.
    pub fn contributors(&self) -> Vec<(&Address, Amount)> {
        let mut contributors: Vec<_> = self
            .balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(address, amount)| (address, *amount))
            .collect();
        contributors.sort_by(|a, b| a.0.cmp(b.0));
        contributors
    }

    // --- Collaborators ---

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    // --- Persistence ---

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            id: self.id.clone(),
            address: self.address.clone(),
            params: self.params.clone(),
            policy: self.policy,
            state: self.state,
            balances: self
                .balances
                .iter()
                .map(|(address, amount)| (address.clone(), *amount))
                .collect(),
            custodied: self.custodied,
            totals: self.totals,
            events: self.events.clone(),
        }
    }

    pub fn into_parts(self) -> (LedgerSnapshot, C, S, T) {
        let snapshot = self.snapshot();
        (snapshot, self.clock, self.sink, self.transfer)
    }
}
