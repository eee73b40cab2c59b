//! Subscription interface between the feed controller and presentation.

use crate::feed::controller::FeedState;
use crate::model::category::CategoryFilter;
use crate::model::fact::FactId;

/// User-visible notice text for a failed fetch.
pub const NOTICE_LOAD_FAILED: &str = "Cannot load data!";
/// User-visible notice text for a rejected submission form.
pub const NOTICE_INVALID_FORM: &str = "Please enter valid details in the form!";
/// User-visible notice text for a failed insert.
pub const NOTICE_INSERT_FAILED: &str = "Cannot insert into database!";
/// User-visible notice text for a failed vote.
pub const NOTICE_VOTE_FAILED: &str = "Cannot record vote!";

/// Notice category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Store,
}

/// Failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedNotice {
    pub kind: NoticeKind,
    pub message: &'static str,
    /// Underlying error text for diagnostics views.
    pub detail: String,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    StateChanged(FeedState),
    FilterChanged(CategoryFilter),
    ViewReplaced { len: usize },
    FactPrepended(FactId),
    FactPatched(FactId),
    VotePending { fact_id: FactId, pending: bool },
    SubmitPending(bool),
    FormOpened,
    FormClosed,
    Notice(FeedNotice),
}

/// Receiver of feed events.
///
/// Implemented for every `Fn(&FeedEvent)` closure.
pub trait FeedObserver {
    fn on_event(&self, event: &FeedEvent);
}

impl<F: Fn(&FeedEvent)> FeedObserver for F {
    fn on_event(&self, event: &FeedEvent) {
        self(event)
    }
}

/// Handle returned by `FeedController::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
