//! Session driver: runs one relay over one transport until it terminates.

use crate::progress::relay::ProgressRelay;
use crate::progress::transport::{Inbound, SessionTransport, TransportError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::thread::JoinHandle;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Ends the session when no frame arrives in time. `None` waits forever.
    pub idle_timeout: Option<Duration>,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Completion acknowledged.
    Completed,
    /// Peer disconnected.
    Disconnected,
    IdleTimeout,
    /// Relay or transport fault; the session was closed anyway.
    Faulted(String),
}

#[derive(Debug)]
pub enum SessionError {
    NotAccepted,
    AlreadyAccepted,
    Closed,
    Transport(TransportError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAccepted => write!(f, "session handshake not completed"),
            Self::AlreadyAccepted => write!(f, "session handshake already completed"),
            Self::Closed => write!(f, "session is closed"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for SessionError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// One progress session bound to its transport.
///
/// Dropping the session closes the transport, so unwinding out of `run`
/// still leaves the connection closed.
pub struct ProgressSession<T: SessionTransport> {
    id: Uuid,
    transport: T,
    relay: ProgressRelay,
    options: SessionOptions,
}

impl<T: SessionTransport> ProgressSession<T> {
    pub fn new(transport: T, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            relay: ProgressRelay::new(),
            options,
        }
    }

    /// Runs the session to termination and closes it.
    pub fn run(mut self) -> SessionOutcome {
        info!("event=progress_session module=progress status=start session_id={}", self.id);
        let outcome = match self.relay_loop() {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "event=progress_session module=progress status=error session_id={} error={err}",
                    self.id
                );
                SessionOutcome::Faulted(err.to_string())
            }
        };
        self.shutdown();
        info!(
            "event=progress_session module=progress status=closed session_id={} outcome={:?} relayed={}",
            self.id,
            outcome,
            self.relay.relayed()
        );
        outcome
    }

    fn relay_loop(&mut self) -> Result<SessionOutcome, SessionError> {
        self.transport.accept()?;
        self.relay.on_handshake()?;

        loop {
            let frame = match self.transport.receive(self.options.idle_timeout)? {
                Inbound::Message(frame) => frame,
                Inbound::Disconnected => return Ok(SessionOutcome::Disconnected),
                Inbound::TimedOut => return Ok(SessionOutcome::IdleTimeout),
            };

            let step = self.relay.on_message(&frame)?;
            for reply in &step.replies {
                match self.transport.send(&reply.to_value()) {
                    Ok(()) => {}
                    Err(TransportError::PeerGone) => return Ok(SessionOutcome::Disconnected),
                    Err(err) => return Err(err.into()),
                }
            }
            if step.close {
                return Ok(SessionOutcome::Completed);
            }
        }
    }

    fn shutdown(&mut self) {
        self.relay.close();
        if self.transport.is_closed() {
            return;
        }
        if let Err(err) = self.transport.close() {
            warn!(
                "event=progress_session module=progress status=error session_id={} error_code=close_failed error={err}",
                self.id
            );
        }
    }
}

impl<T: SessionTransport> Drop for ProgressSession<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs a session on the calling thread.
pub fn run_session<T: SessionTransport>(transport: T, options: SessionOptions) -> SessionOutcome {
    ProgressSession::new(transport, options).run()
}

/// Runs a session on its own named thread.
pub fn spawn_session<T>(
    transport: T,
    options: SessionOptions,
) -> std::io::Result<JoinHandle<SessionOutcome>>
where
    T: SessionTransport + Send + 'static,
{
    std::thread::Builder::new()
        .name("progress-session".to_string())
        .spawn(move || run_session(transport, options))
}
