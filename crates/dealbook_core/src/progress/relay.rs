//! Pure relay state machine for one progress session.

use crate::progress::message::{ProgressMessage, TASK_COMPLETED};
use crate::progress::session::SessionError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, handshake not completed.
    Open,
    /// Handshake done; echoing inbound events.
    Relaying,
    /// Terminal.
    Closed,
}

/// Replies produced by one inbound message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayStep {
    pub replies: Vec<ProgressMessage>,
    /// Set when the session must close after sending `replies`.
    pub close: bool,
}

#[derive(Debug)]
pub struct ProgressRelay {
    state: SessionState,
    relayed: u64,
}

impl Default for ProgressRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRelay {
    pub fn new() -> Self {
        Self {
            state: SessionState::Open,
            relayed: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of progress events echoed so far.
    pub fn relayed(&self) -> u64 {
        self.relayed
    }

    /// `Open -> Relaying`.
    pub fn on_handshake(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Open => {
                self.state = SessionState::Relaying;
                Ok(())
            }
            SessionState::Relaying => Err(SessionError::AlreadyAccepted),
            SessionState::Closed => Err(SessionError::Closed),
        }
    }

    /// Handles one inbound frame while relaying.
    ///
    /// Non-object frames produce no replies. A frame carrying both fields
    /// echoes the progress first, then acknowledges completion and closes.
    pub fn on_message(&mut self, frame: &Value) -> Result<RelayStep, SessionError> {
        match self.state {
            SessionState::Open => return Err(SessionError::NotAccepted),
            SessionState::Closed => return Err(SessionError::Closed),
            SessionState::Relaying => {}
        }

        let mut step = RelayStep::default();
        let Some(object) = frame.as_object() else {
            return Ok(step);
        };

        if let Some(percentage) = object.get("progress_percentage") {
            step.replies
                .push(ProgressMessage::progress(percentage.clone()));
            self.relayed += 1;
        }

        if object.get("message").and_then(Value::as_str) == Some(TASK_COMPLETED) {
            step.replies.push(ProgressMessage::completed());
            step.close = true;
            self.state = SessionState::Closed;
        }

        Ok(step)
    }

    /// Moves to `Closed` from any state. Returns whether the state changed.
    pub fn close(&mut self) -> bool {
        let changed = self.state != SessionState::Closed;
        self.state = SessionState::Closed;
        changed
    }
}
