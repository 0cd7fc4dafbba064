//! Queue session state machine.
//!
//! [`QueueSession`] is the top-level state machine for one queue watch. It
//! owns the roster, the polling flag, and the auto-play trigger latch, and
//! persists resume state through an injected [`QueueStore`]. It performs no
//! I/O itself: callers execute the [`SessionAction`]s it returns and feed
//! completions back as [`SessionEvent`]s.
//!
//! All state is mutated from the single logical task that delivers events;
//! no locking is needed as long as that constraint holds.

use std::time::Duration;

use paika_core::{Identity, Occupant, QueueId, QueueStatus, QueueStore, parse_roster};

use crate::{
    error::SessionError,
    event::{CallKind, CallOutcome, Notice, QueueCall, SessionAction, SessionEvent},
};

/// Fixed refresh interval while polling.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Roster index of the seat currently playing.
const PLAYING_SEAT: usize = 2;

/// Roster index of the standby seat, swapped into the playing seat before
/// play is issued.
const STANDBY_SEAT: usize = 3;

/// The two active seats of the cabinet, by roster index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaySlot {
    /// Index 2: play is issued directly.
    Playing,
    /// Index 3: swapped into the playing seat first, then play.
    Standby,
}

/// Sans-IO state machine for one queue membership.
///
/// States are `Idle` and `Polling` (a stopped session is idle again).
/// Switching queues requires the caller to stop and restart; the session
/// never polls two queues at once.
pub struct QueueSession<S: QueueStore> {
    /// Local player identity, immutable for the session's lifetime.
    identity: Identity,

    /// Injected persistence for resume state.
    store: S,

    /// Queue currently (or last) watched.
    queue_id: Option<QueueId>,

    /// Roster as of the last successful refresh, replaced wholesale.
    occupants: Vec<Occupant>,

    /// Whether ticks should refresh the roster.
    polling: bool,

    /// Auto-play trigger latch: which seat a trigger already fired for.
    /// Cleared when the player leaves the active seats or the queue
    /// changes; the standby-to-playing move caused by the session's own
    /// swap transitions the latch without firing. Each trigger fires at
    /// most once per continuous occupancy of the active seats.
    fired: Option<PlaySlot>,
}

impl<S: QueueStore> QueueSession<S> {
    /// Create an idle session for the given player.
    pub fn new(identity: Identity, store: S) -> Self {
        Self { identity, store, queue_id: None, occupants: Vec::new(), polling: false, fired: None }
    }

    /// The local player.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Queue currently being watched. `None` while idle and never started.
    pub fn queue_id(&self) -> Option<&QueueId> {
        self.queue_id.as_ref()
    }

    /// Whether the session is polling.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Roster as of the last successful refresh.
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionAction>, SessionError> {
        match event {
            SessionEvent::StartPolling { queue_id } => Ok(self.handle_start(queue_id)),
            SessionEvent::Tick => Ok(self.handle_tick()),
            SessionEvent::RosterReceived { raw } => Ok(self.handle_roster(&raw)),
            SessionEvent::RosterFetchFailed { reason } => Ok(self.handle_fetch_failed(reason)),
            SessionEvent::Join => self.handle_join(),
            SessionEvent::Leave => self.handle_leave(),
            SessionEvent::StopPolling => Ok(self.handle_stop()),
            SessionEvent::Advance => self.handle_advance(),
            SessionEvent::Resume => self.handle_resume(),
            SessionEvent::CallCompleted { call, outcome } => self.handle_completed(call, outcome),
        }
    }

    fn handle_start(&mut self, queue_id: QueueId) -> Vec<SessionAction> {
        if self.polling {
            // Guard against duplicate timers: starting twice is a no-op.
            return Vec::new();
        }

        if self.queue_id.as_ref() != Some(&queue_id) {
            self.occupants.clear();
            self.fired = None;
        }

        tracing::debug!(queue = %queue_id, "polling started");
        self.queue_id = Some(queue_id.clone());
        self.polling = true;

        vec![
            SessionAction::FetchRoster { queue_id: queue_id.clone() },
            SessionAction::Notify(Notice::PollingStarted { queue_id }),
        ]
    }

    fn handle_tick(&mut self) -> Vec<SessionAction> {
        match (&self.queue_id, self.polling) {
            (Some(queue_id), true) => {
                vec![SessionAction::FetchRoster { queue_id: queue_id.clone() }]
            },
            _ => Vec::new(),
        }
    }

    fn handle_roster(&mut self, raw: &str) -> Vec<SessionAction> {
        if !self.polling {
            // Stale fetch completing after teardown.
            return Vec::new();
        }

        let roster = parse_roster(raw);
        let mut actions = Vec::new();

        if roster.is_empty() && !raw.trim().is_empty() {
            actions.push(SessionAction::Notify(Notice::RosterUnreadable));
        }

        self.occupants = roster;
        actions.extend(self.trigger_actions(false));
        actions
    }

    fn handle_fetch_failed(&mut self, reason: String) -> Vec<SessionAction> {
        if !self.polling {
            return Vec::new();
        }
        // Prior occupants stay untouched; the next tick retries.
        vec![SessionAction::Notify(Notice::RefreshFailed { reason })]
    }

    fn handle_join(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        let queue_id = self.queue_id.clone().ok_or(SessionError::NoActiveQueue)?;

        if self.occupants.iter().any(|o| o.name == self.identity.name) {
            return Err(SessionError::AlreadyMember { name: self.identity.name.clone() });
        }

        if let Some(status) = self.store.queue_status(&self.identity.name)?
            && status.joined
            && status.queue_id == queue_id
        {
            return Err(SessionError::AlreadyQueued { queue_id });
        }

        Ok(vec![SessionAction::Dispatch(QueueCall::Join {
            queue_id,
            player: self.identity.encode_entry(),
        })])
    }

    fn handle_leave(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        let queue_id = self.queue_id.clone().ok_or(SessionError::NoActiveQueue)?;

        Ok(vec![SessionAction::Dispatch(QueueCall::Leave {
            queue_id,
            player: self.identity.encode_entry(),
        })])
    }

    fn handle_stop(&mut self) -> Vec<SessionAction> {
        if !self.polling {
            return Vec::new();
        }

        let Some(queue_id) = self.queue_id.clone() else {
            self.polling = false;
            return Vec::new();
        };

        tracing::debug!(queue = %queue_id, "polling stopped");

        // Polling is cleared before the leave is dispatched, so no tick
        // processed after this point can emit another refresh.
        self.polling = false;
        self.occupants.clear();
        self.fired = None;

        vec![
            SessionAction::Dispatch(QueueCall::Leave {
                queue_id,
                player: self.identity.encode_entry(),
            }),
            SessionAction::Notify(Notice::PollingStopped),
        ]
    }

    fn handle_advance(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        if !self.polling {
            return Err(SessionError::NoActiveQueue);
        }

        let actions = self.trigger_actions(true);
        if actions.is_empty() {
            return Ok(vec![SessionAction::Notify(Notice::NotInPlaySlot)]);
        }
        Ok(actions)
    }

    fn handle_resume(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        if self.polling {
            return Ok(Vec::new());
        }

        let Some(status) = self.store.queue_status(&self.identity.name)? else {
            return Ok(Vec::new());
        };
        if !status.joined {
            return Ok(Vec::new());
        }

        tracing::debug!(queue = %status.queue_id, "resuming persisted queue membership");

        self.queue_id = Some(status.queue_id.clone());
        self.occupants.clear();
        self.fired = None;
        self.polling = true;

        Ok(vec![
            SessionAction::FetchRoster { queue_id: status.queue_id.clone() },
            SessionAction::Notify(Notice::PollingResumed { queue_id: status.queue_id }),
        ])
    }

    fn handle_completed(
        &mut self,
        call: CallKind,
        outcome: CallOutcome,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if let CallOutcome::Failed { reason } = outcome {
            tracing::warn!(?call, %reason, "one-shot call failed");
            return Ok(vec![SessionAction::Notify(Notice::CallFailed { call, reason })]);
        }

        match call {
            CallKind::Join => {
                let Some(queue_id) = self.queue_id.clone() else {
                    return Ok(Vec::new());
                };
                self.store.set_queue_status(
                    &self.identity.name,
                    &QueueStatus { joined: true, queue_id: queue_id.clone() },
                )?;
                Ok(vec![SessionAction::Notify(Notice::Joined { queue_id })])
            },
            CallKind::Leave => {
                self.clear_joined_flag()?;
                Ok(vec![SessionAction::Notify(Notice::Left)])
            },
            CallKind::Swap => {
                // Strictly sequential: play is only issued once the swap
                // has succeeded. A swap completing after teardown must not
                // start a game.
                let Some(queue_id) = self.queue_id.clone().filter(|_| self.polling) else {
                    return Ok(Vec::new());
                };
                // The latch stays on the standby seat: the server may keep
                // reporting the old seating for a few refreshes, and a
                // playing-seat latch here would let those stale rosters
                // fire a second swap. `trigger_actions` moves the latch
                // over once the seat change is actually observed.
                Ok(vec![SessionAction::Dispatch(QueueCall::Play { queue_id })])
            },
            CallKind::Play => Ok(vec![SessionAction::Notify(Notice::PlayStarted)]),
        }
    }

    /// Persist `joined = false`, keeping the last queue id for reference.
    fn clear_joined_flag(&mut self) -> Result<(), SessionError> {
        let queue_id = match &self.queue_id {
            Some(queue_id) => Some(queue_id.clone()),
            None => self
                .store
                .queue_status(&self.identity.name)?
                .map(|status| status.queue_id),
        };
        if let Some(queue_id) = queue_id {
            self.store
                .set_queue_status(&self.identity.name, &QueueStatus { joined: false, queue_id })?;
        }
        Ok(())
    }

    /// Seat the local player currently occupies, if any.
    fn active_slot(&self) -> Option<PlaySlot> {
        let name = &self.identity.name;
        if self.occupants.get(PLAYING_SEAT).is_some_and(|o| &o.name == name) {
            return Some(PlaySlot::Playing);
        }
        if self.occupants.get(STANDBY_SEAT).is_some_and(|o| &o.name == name) {
            return Some(PlaySlot::Standby);
        }
        None
    }

    /// Evaluate the play trigger against the current roster.
    ///
    /// The latch makes the automatic path idempotent per continuous seat
    /// occupancy; `force` bypasses it for the manual advance button.
    fn trigger_actions(&mut self, force: bool) -> Vec<SessionAction> {
        let Some(queue_id) = self.queue_id.clone() else {
            return Vec::new();
        };

        match self.active_slot() {
            None => {
                self.fired = None;
                Vec::new()
            },
            Some(slot) if !force && self.fired == Some(slot) => Vec::new(),
            Some(PlaySlot::Playing) if !force && self.fired == Some(PlaySlot::Standby) => {
                // The swap this latch fired for has landed; play was
                // already dispatched on its completion. Move the latch to
                // the observed seat without firing again.
                self.fired = Some(PlaySlot::Playing);
                Vec::new()
            },
            Some(PlaySlot::Playing) => {
                self.fired = Some(PlaySlot::Playing);
                vec![SessionAction::Dispatch(QueueCall::Play { queue_id })]
            },
            Some(PlaySlot::Standby) => {
                let Some(target) = self.occupants.get(PLAYING_SEAT) else {
                    // A standby seat implies the playing seat is occupied;
                    // a roster short enough to break that is left alone.
                    return Vec::new();
                };
                self.fired = Some(PlaySlot::Standby);
                vec![SessionAction::Dispatch(QueueCall::Swap {
                    queue_id,
                    from: self.identity.encode_entry(),
                    to: target.encode_entry(),
                })]
            },
        }
    }
}
