//! Feed controller: state machine over the filtered fact view.
//!
//! # Responsibility
//! - Own the `FactStore`, the active filter and the busy flags.
//! - Turn filter changes, submissions and votes into gateway calls and
//!   apply their results to the view.
//! - Notify subscribers of every state change and user-visible failure.
//!
//! # Invariants
//! - Only the most recently issued fetch may mutate the view or the state;
//!   older fetch results are discarded silently.
//! - A fact has at most one vote in flight from this controller.
//! - Remote failures fail the triggering action only; the view keeps its
//!   last-known-good contents.
//!
//! Each operation has a `begin_*` half returning a ticket and a
//! `complete_*` half taking the ticket with the gateway result, so callers
//! driving I/O themselves can interleave operations. The one-shot entry
//! points (`set_active_category`, `submit_fact`, `cast_vote`) run both halves
//! around a direct gateway call.
//!
//! Votes write `current + 1` as read from this view. Two clients voting on
//! the same field concurrently can lose an increment at the store; the
//! per-fact pending flag only stops duplicate clicks from this client.

use crate::feed::observer::{
    FeedEvent, FeedNotice, FeedObserver, NoticeKind, SubscriptionId, NOTICE_INSERT_FAILED,
    NOTICE_INVALID_FORM, NOTICE_LOAD_FAILED, NOTICE_VOTE_FAILED,
};
use crate::feed::store::FactStore;
use crate::gateway::{FactGateway, FactQuery, StoreError, StoreResult};
use crate::model::category::{CategoryFilter, ALL_CATEGORIES};
use crate::model::fact::{Fact, FactId, NewFact, VoteField};
use crate::model::submission::{FactDraft, FactValidationError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lifecycle of the filtered fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Failure of a controller entry point.
#[derive(Debug)]
pub enum FeedError {
    /// Local validation failed; nothing was sent to the store.
    Validation(FactValidationError),
    /// The store rejected or failed the request.
    Store(StoreError),
    /// A vote for this fact is still in flight.
    VoteInFlight(FactId),
    /// A submission is still in flight.
    SubmitInFlight,
    /// The fact is not part of the current view.
    FactNotInView(FactId),
}

impl FeedError {
    /// Stable short code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Store(err) => err.code(),
            Self::VoteInFlight(_) => "vote_in_flight",
            Self::SubmitInFlight => "submit_in_flight",
            Self::FactNotInView(_) => "fact_not_in_view",
        }
    }
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::VoteInFlight(id) => write!(f, "vote already in flight for fact {id}"),
            Self::SubmitInFlight => write!(f, "a submission is already in flight"),
            Self::FactNotInView(id) => write!(f, "fact {id} is not in the current view"),
        }
    }
}

impl Error for FeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FactValidationError> for FeedError {
    fn from(value: FactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for FeedError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of completing a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The view was replaced with `len` facts.
    Applied { len: usize },
    /// A newer fetch superseded this one; nothing changed.
    Stale,
}

/// Result of completing a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The view entry was replaced by the store's record.
    Patched,
    /// The fact left the view while the vote was in flight.
    Dropped,
}

/// In-flight filtered fetch.
#[derive(Debug)]
#[must_use = "a fetch ticket must be completed"]
pub struct FetchTicket {
    seq: u64,
    filter: CategoryFilter,
    query: FactQuery,
}

impl FetchTicket {
    /// Monotonic request number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// Query to send to the gateway.
    pub fn query(&self) -> &FactQuery {
        &self.query
    }
}

/// In-flight submission.
#[derive(Debug)]
#[must_use = "a submit ticket must be completed"]
pub struct SubmitTicket {
    fact: NewFact,
}

impl SubmitTicket {
    /// Validated insert payload to send to the gateway.
    pub fn fact(&self) -> &NewFact {
        &self.fact
    }
}

/// In-flight vote.
#[derive(Debug)]
#[must_use = "a vote ticket must be completed"]
pub struct VoteTicket {
    fact_id: FactId,
    field: VoteField,
    current_value: u32,
}

impl VoteTicket {
    pub fn fact_id(&self) -> FactId {
        self.fact_id
    }

    pub fn field(&self) -> VoteField {
        self.field
    }

    /// Counter value read from the view when the vote started.
    pub fn current_value(&self) -> u32 {
        self.current_value
    }
}

/// Explicit state container for the feed.
pub struct FeedController<G: FactGateway> {
    gateway: G,
    store: FactStore,
    state: FeedState,
    active_filter: CategoryFilter,
    latest_fetch_seq: u64,
    votes_in_flight: HashSet<FactId>,
    submitting: bool,
    form_open: bool,
    observers: Vec<(SubscriptionId, Box<dyn FeedObserver>)>,
    next_subscription: u64,
}

impl<G: FactGateway> FeedController<G> {
    /// Creates an idle controller with an empty view and the `all` filter.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            store: FactStore::new(),
            state: FeedState::Idle,
            active_filter: CategoryFilter::All,
            latest_fetch_seq: 0,
            votes_in_flight: HashSet::new(),
            submitting: false,
            form_open: false,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FeedState::Loading
    }

    pub fn active_filter(&self) -> CategoryFilter {
        self.active_filter
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// Current view, newest first.
    pub fn facts(&self) -> &[Fact] {
        self.store.facts()
    }

    /// Whether vote controls of `fact_id` should be disabled.
    pub fn is_vote_pending(&self, fact_id: FactId) -> bool {
        self.votes_in_flight.contains(&fact_id)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    /// Registers an observer for all subsequent events.
    pub fn subscribe(&mut self, observer: impl FeedObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer; returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(current, _)| *current != id);
        self.observers.len() != before
    }

    pub fn open_form(&mut self) {
        if !self.form_open {
            self.form_open = true;
            self.emit(FeedEvent::FormOpened);
        }
    }

    pub fn close_form(&mut self) {
        if self.form_open {
            self.form_open = false;
            self.emit(FeedEvent::FormClosed);
        }
    }

    /// Flips form visibility and returns the new state.
    pub fn toggle_form(&mut self) -> bool {
        if self.form_open {
            self.close_form();
        } else {
            self.open_form();
        }
        self.form_open
    }

    /// Initial load with the `all` filter.
    pub fn mount(&mut self) -> Result<FetchOutcome, FeedError> {
        self.set_active_category(ALL_CATEGORIES)
    }

    /// Switches the filter (`all` or a category name) and loads its page.
    pub fn set_active_category(&mut self, selection: &str) -> Result<FetchOutcome, FeedError> {
        let ticket = self.begin_fetch(selection)?;
        let result = self.gateway.fetch_facts(ticket.query());
        self.complete_fetch(ticket, result)
    }

    /// Reloads the page for the current filter.
    pub fn reload(&mut self) -> Result<FetchOutcome, FeedError> {
        let ticket = self.issue_fetch(self.active_filter);
        let result = self.gateway.fetch_facts(ticket.query());
        self.complete_fetch(ticket, result)
    }

    /// Activates a filter and enters `Loading`.
    ///
    /// Unknown selections are rejected without touching the state.
    pub fn begin_fetch(&mut self, selection: &str) -> Result<FetchTicket, FeedError> {
        let filter = CategoryFilter::parse(selection).ok_or_else(|| {
            warn!(
                "event=feed_fetch module=feed status=error error_code=validation_failed reason=unknown_filter"
            );
            FeedError::Validation(FactValidationError::UnknownCategory(
                selection.trim().to_string(),
            ))
        })?;
        Ok(self.issue_fetch(filter))
    }

    fn issue_fetch(&mut self, filter: CategoryFilter) -> FetchTicket {
        self.latest_fetch_seq += 1;
        let seq = self.latest_fetch_seq;
        if self.active_filter != filter {
            self.active_filter = filter;
            self.emit(FeedEvent::FilterChanged(filter));
        }
        self.set_state(FeedState::Loading);
        info!("event=feed_fetch module=feed status=start seq={seq} filter={filter}");

        FetchTicket {
            seq,
            filter,
            query: FactQuery::page(filter),
        }
    }

    /// Applies a fetch result if `ticket` is still the latest fetch.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: StoreResult<Vec<Fact>>,
    ) -> Result<FetchOutcome, FeedError> {
        if ticket.seq != self.latest_fetch_seq {
            debug!(
                "event=feed_fetch module=feed status=stale seq={} latest_seq={} filter={}",
                ticket.seq, self.latest_fetch_seq, ticket.filter
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(facts) => {
                self.store.replace(facts);
                let len = self.store.len();
                info!(
                    "event=feed_fetch module=feed status=ok seq={} filter={} rows={len}",
                    ticket.seq, ticket.filter
                );
                self.emit(FeedEvent::ViewReplaced { len });
                self.set_state(FeedState::Loaded);
                Ok(FetchOutcome::Applied { len })
            }
            Err(err) => {
                error!(
                    "event=feed_fetch module=feed status=error seq={} filter={} error_code={} error={}",
                    ticket.seq,
                    ticket.filter,
                    err.code(),
                    err
                );
                self.set_state(FeedState::Error);
                self.notify(NoticeKind::Store, NOTICE_LOAD_FAILED, &err);
                Err(FeedError::Store(err))
            }
        }
    }

    /// Validates and submits a new fact.
    pub fn submit_fact(
        &mut self,
        text: &str,
        source: &str,
        category: &str,
    ) -> Result<Fact, FeedError> {
        let ticket = self.begin_submit(FactDraft::new(text, source, category))?;
        let result = self.gateway.insert_fact(ticket.fact());
        self.complete_submit(ticket, result)
    }

    /// Validates `draft` locally and marks a submission in flight.
    pub fn begin_submit(&mut self, draft: FactDraft) -> Result<SubmitTicket, FeedError> {
        if self.submitting {
            return Err(FeedError::SubmitInFlight);
        }

        let fact = match draft.validate() {
            Ok(fact) => fact,
            Err(err) => {
                warn!(
                    "event=feed_submit module=feed status=error error_code=validation_failed reason={}",
                    err.code()
                );
                self.notify(NoticeKind::Validation, NOTICE_INVALID_FORM, &err);
                return Err(FeedError::Validation(err));
            }
        };

        self.submitting = true;
        self.emit(FeedEvent::SubmitPending(true));
        info!(
            "event=feed_submit module=feed status=start category={}",
            fact.category
        );
        Ok(SubmitTicket { fact })
    }

    /// Applies an insert result.
    ///
    /// On success the fact is prepended whatever the active filter and the
    /// form closes. On failure the form stays open.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: StoreResult<Fact>,
    ) -> Result<Fact, FeedError> {
        self.submitting = false;
        self.emit(FeedEvent::SubmitPending(false));

        match result {
            Ok(fact) => {
                info!(
                    "event=feed_submit module=feed status=ok fact_id={} category={}",
                    fact.id, ticket.fact.category
                );
                self.store.prepend(fact.clone());
                self.emit(FeedEvent::FactPrepended(fact.id));
                self.form_open = false;
                self.emit(FeedEvent::FormClosed);
                Ok(fact)
            }
            Err(err) => {
                error!(
                    "event=feed_submit module=feed status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.notify(NoticeKind::Store, NOTICE_INSERT_FAILED, &err);
                Err(FeedError::Store(err))
            }
        }
    }

    /// Increments one vote counter of a fact in the view.
    pub fn cast_vote(
        &mut self,
        fact_id: FactId,
        field: VoteField,
    ) -> Result<VoteOutcome, FeedError> {
        let ticket = self.begin_vote(fact_id, field)?;
        let result = self.gateway.increment_vote(
            ticket.fact_id(),
            ticket.field(),
            ticket.current_value(),
        );
        self.complete_vote(ticket, result)
    }

    /// Reads the current counter from the view and marks the fact's vote in
    /// flight.
    pub fn begin_vote(
        &mut self,
        fact_id: FactId,
        field: VoteField,
    ) -> Result<VoteTicket, FeedError> {
        if self.votes_in_flight.contains(&fact_id) {
            debug!(
                "event=feed_vote module=feed status=rejected fact_id={fact_id} error_code=vote_in_flight"
            );
            return Err(FeedError::VoteInFlight(fact_id));
        }
        let current_value = self
            .store
            .get(fact_id)
            .map(|fact| fact.votes(field))
            .ok_or(FeedError::FactNotInView(fact_id))?;

        self.votes_in_flight.insert(fact_id);
        self.emit(FeedEvent::VotePending {
            fact_id,
            pending: true,
        });
        info!(
            "event=feed_vote module=feed status=start fact_id={fact_id} field={field} current={current_value}"
        );
        Ok(VoteTicket {
            fact_id,
            field,
            current_value,
        })
    }

    /// Applies a vote result and re-enables the fact's vote controls.
    pub fn complete_vote(
        &mut self,
        ticket: VoteTicket,
        result: StoreResult<Fact>,
    ) -> Result<VoteOutcome, FeedError> {
        let fact_id = ticket.fact_id;
        self.votes_in_flight.remove(&fact_id);
        self.emit(FeedEvent::VotePending {
            fact_id,
            pending: false,
        });

        match result {
            Ok(updated) => {
                if self.store.patch(fact_id, updated) {
                    info!(
                        "event=feed_vote module=feed status=ok fact_id={fact_id} field={}",
                        ticket.field
                    );
                    self.emit(FeedEvent::FactPatched(fact_id));
                    Ok(VoteOutcome::Patched)
                } else {
                    debug!("event=feed_vote module=feed status=dropped fact_id={fact_id}");
                    Ok(VoteOutcome::Dropped)
                }
            }
            Err(err) => {
                error!(
                    "event=feed_vote module=feed status=error fact_id={fact_id} field={} error_code={} error={}",
                    ticket.field,
                    err.code(),
                    err
                );
                self.notify(NoticeKind::Store, NOTICE_VOTE_FAILED, &err);
                Err(FeedError::Store(err))
            }
        }
    }

    fn set_state(&mut self, state: FeedState) {
        if self.state != state {
            self.state = state;
            self.emit(FeedEvent::StateChanged(state));
        }
    }

    fn notify(&self, kind: NoticeKind, message: &'static str, cause: &dyn Display) {
        self.emit(FeedEvent::Notice(FeedNotice {
            kind,
            message,
            detail: cause.to_string(),
        }));
    }

    fn emit(&self, event: FeedEvent) {
        for (_, observer) in &self.observers {
            observer.on_event(&event);
        }
    }
}
