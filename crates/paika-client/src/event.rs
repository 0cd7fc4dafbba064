//! Session events and actions.

use paika_core::QueueId;

/// Events the caller feeds into the session.
///
/// The caller is responsible for:
/// - Driving the 2-second refresh interval via [`SessionEvent::Tick`]
/// - Performing the fetches and one-shot calls the session asks for, and
///   feeding their results back as events
/// - Forwarding user intents (start, join, leave, advance, stop)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Begin polling a queue. No-op while already polling.
    StartPolling {
        /// Queue to poll.
        queue_id: QueueId,
    },

    /// Periodic refresh tick from the driver's interval.
    ///
    /// Ignored while idle, which guarantees no refresh can land after
    /// [`SessionEvent::StopPolling`] was processed.
    Tick,

    /// Raw roster payload fetched for the current queue.
    RosterReceived {
        /// Comma-encoded occupant string as returned by the service.
        raw: String,
    },

    /// Roster fetch failed. Transient: prior occupants stay untouched and
    /// the next tick retries implicitly.
    RosterFetchFailed {
        /// Human-readable failure description.
        reason: String,
    },

    /// User asks to join the current queue.
    Join,

    /// User asks to leave the current queue without stopping the watch.
    Leave,

    /// User asks to stop polling; the session tears down and issues a
    /// final leave call.
    StopPolling,

    /// Manual advance-to-play check (the cabinet-side "take the seat"
    /// button). Runs the same slot inspection as the automatic trigger.
    Advance,

    /// Cold-start recovery: restore the last joined queue from persisted
    /// state and start polling it.
    Resume,

    /// A one-shot remote call completed.
    CallCompleted {
        /// Which call completed.
        call: CallKind,
        /// How it went.
        outcome: CallOutcome,
    },
}

/// Actions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Fetch the roster for a queue (`GET /party`). The result comes back
    /// as [`SessionEvent::RosterReceived`] or
    /// [`SessionEvent::RosterFetchFailed`].
    FetchRoster {
        /// Queue to fetch.
        queue_id: QueueId,
    },

    /// Issue a one-shot remote call. Completion comes back as
    /// [`SessionEvent::CallCompleted`]. One-shot calls are never retried
    /// automatically.
    Dispatch(QueueCall),

    /// Surface a user-visible status message.
    Notify(Notice),
}

/// One-shot calls against the Remote Queue Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueCall {
    /// `POST /party` with `people=` - add the local player.
    Join {
        /// Target queue.
        queue_id: QueueId,
        /// Wire entry `name(avatarId)` for the local player.
        player: String,
    },

    /// `DELETE /party` with `people=` - remove the local player.
    Leave {
        /// Target queue.
        queue_id: QueueId,
        /// Wire entry `name(avatarId)` for the local player.
        player: String,
    },

    /// `POST /party` with `changeToPeople=` - swap the local player from
    /// the standby seat into the playing seat.
    Swap {
        /// Target queue.
        queue_id: QueueId,
        /// Wire entry of the local player (standby seat).
        from: String,
        /// Wire entry of the occupant currently in the playing seat.
        to: String,
    },

    /// `POST /partyPlay` - trigger play on the cabinet.
    Play {
        /// Target queue.
        queue_id: QueueId,
    },
}

impl QueueCall {
    /// Discriminant used when reporting completion.
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Join { .. } => CallKind::Join,
            Self::Leave { .. } => CallKind::Leave,
            Self::Swap { .. } => CallKind::Swap,
            Self::Play { .. } => CallKind::Play,
        }
    }
}

/// Discriminant for completed one-shot calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Add the local player.
    Join,
    /// Remove the local player.
    Leave,
    /// Swap standby seat into playing seat.
    Swap,
    /// Trigger play.
    Play,
}

/// Outcome of a one-shot remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The service answered HTTP 200.
    Succeeded,
    /// Transport failure or non-200 status. The user must retry manually.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

/// User-visible status notices.
///
/// Nothing the session reports is fatal; every failure degrades to one of
/// these plus an unchanged or partially-updated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Polling started for a queue.
    PollingStarted {
        /// Queue being polled.
        queue_id: QueueId,
    },

    /// Polling resumed from persisted state after a cold start.
    PollingResumed {
        /// Queue restored from the store.
        queue_id: QueueId,
    },

    /// Polling stopped and a leave call was issued.
    PollingStopped,

    /// Join call succeeded; membership was persisted.
    Joined {
        /// Queue that was joined.
        queue_id: QueueId,
    },

    /// Leave call succeeded; membership flag was cleared.
    Left,

    /// Play call succeeded - the cabinet is ours.
    PlayStarted,

    /// A refresh failed; the previous roster is still shown and the next
    /// tick will retry.
    RefreshFailed {
        /// Human-readable failure description.
        reason: String,
    },

    /// A non-empty roster payload parsed to nothing.
    RosterUnreadable,

    /// The manual advance found the player in neither active seat.
    NotInPlaySlot,

    /// A one-shot call failed; the user must retry manually.
    CallFailed {
        /// Which call failed.
        call: CallKind,
        /// Human-readable failure description.
        reason: String,
    },

    /// A user intent was rejected by a session guard (informational).
    Rejected {
        /// Guard description, e.g. "already in the queue".
        reason: String,
    },
}
