//! Session lifecycle state machine - NO I/O, just state transitions.
//!
//! The interactive session moves through a fixed lifecycle: resolve the
//! room, run the background synchronizer next to the input loop, then wind
//! down by leaving the room. The machine takes events as input and produces
//! a new state plus a list of actions to execute.
//!
//! The actual I/O (joining, pulling, leaving) is performed by the session
//! runner in the `parley` binary, not by this module. This enables instant
//! unit testing without network mocks.

use parley_chat_types::RoomId;

/// Lifecycle state of an interactive chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No room resolved yet.
    Idle,
    /// Room resolved and cursor registered; synchronizer not yet running.
    Joined {
        /// The resolved room.
        room: RoomId,
    },
    /// Background synchronizer and input loop both running.
    Running {
        /// The synchronized room.
        room: RoomId,
    },
    /// Winding down: synchronizer cancelled, leave in progress.
    Stopping {
        /// The room being left.
        room: RoomId,
    },
    /// Fully wound down.
    Stopped,
}

impl SessionState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller is responsible
    /// for executing the returned actions.
    pub fn on_event(self, event: SessionEvent) -> (Self, Vec<SessionAction>) {
        match (self, event) {
            // From Idle
            (Self::Idle, SessionEvent::RoomResolved { room }) => (
                Self::Joined { room },
                vec![SessionAction::StartSync { room }],
            ),

            // From Joined
            (Self::Joined { room }, SessionEvent::SyncStarted) => (Self::Running { room }, vec![]),
            (Self::Joined { room }, SessionEvent::ExitRequested) => (
                Self::Stopping { room },
                vec![SessionAction::LeaveRoom { room }],
            ),

            // From Running
            (Self::Running { room }, SessionEvent::ExitRequested) => (
                Self::Stopping { room },
                vec![
                    SessionAction::CancelSync,
                    SessionAction::LeaveRoom { room },
                ],
            ),

            // From Stopping
            (Self::Stopping { .. }, SessionEvent::RoomLeft) => {
                (Self::Stopped, vec![SessionAction::ReleaseTransport])
            }

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if the synchronizer should currently be running.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Check if the session has fully wound down.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// The room this session is bound to, if one has been resolved.
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Self::Idle | Self::Stopped => None,
            Self::Joined { room } | Self::Running { room } | Self::Stopping { room } => Some(*room),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur in the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The target room was created or joined and its cursor registered.
    RoomResolved {
        /// The resolved room.
        room: RoomId,
    },
    /// The background synchronizer task is up.
    SyncStarted,
    /// The user asked to exit (sentinel line or end of input).
    ExitRequested,
    /// The leave call completed (successfully or not).
    RoomLeft,
}

/// Actions to be executed by the session runner.
///
/// These are instructions, not side effects. The runner interprets them
/// and performs the actual I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Spawn the periodic pull task for the room.
    StartSync {
        /// The room to synchronize.
        room: RoomId,
    },
    /// Signal the periodic pull task to stop.
    CancelSync,
    /// Tell the service we are leaving the room.
    LeaveRoom {
        /// The room to leave.
        room: RoomId,
    },
    /// Drop the connection to the service.
    ReleaseTransport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_lifecycle() {
        let room = RoomId::new(1);
        let state = SessionState::new();

        let (state, actions) = state.on_event(SessionEvent::RoomResolved { room });
        assert_eq!(state, SessionState::Joined { room });
        assert_eq!(actions, vec![SessionAction::StartSync { room }]);

        let (state, actions) = state.on_event(SessionEvent::SyncStarted);
        assert!(state.is_running());
        assert!(actions.is_empty());

        let (state, actions) = state.on_event(SessionEvent::ExitRequested);
        assert_eq!(state, SessionState::Stopping { room });
        assert_eq!(
            actions,
            vec![SessionAction::CancelSync, SessionAction::LeaveRoom { room }]
        );

        let (state, actions) = state.on_event(SessionEvent::RoomLeft);
        assert!(state.is_stopped());
        assert_eq!(actions, vec![SessionAction::ReleaseTransport]);
    }

    #[test]
    fn exit_before_sync_starts_skips_cancel() {
        let room = RoomId::new(1);
        let (state, _) = SessionState::new().on_event(SessionEvent::RoomResolved { room });

        let (state, actions) = state.on_event(SessionEvent::ExitRequested);

        assert_eq!(state, SessionState::Stopping { room });
        assert_eq!(actions, vec![SessionAction::LeaveRoom { room }]);
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let (state, actions) = SessionState::new().on_event(SessionEvent::SyncStarted);
        assert_eq!(state, SessionState::Idle);
        assert!(actions.is_empty());

        let (state, actions) = SessionState::Stopped.on_event(SessionEvent::ExitRequested);
        assert_eq!(state, SessionState::Stopped);
        assert!(actions.is_empty());
    }

    #[test]
    fn room_accessor_tracks_binding() {
        let room = RoomId::new(4);
        assert_eq!(SessionState::new().room(), None);

        let (state, _) = SessionState::new().on_event(SessionEvent::RoomResolved { room });
        assert_eq!(state.room(), Some(room));

        assert_eq!(SessionState::Stopped.room(), None);
    }
}
