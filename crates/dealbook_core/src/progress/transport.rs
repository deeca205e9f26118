//! Transport seam for progress sessions.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Result of waiting for the next inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Message(Value),
    /// The peer went away; not an error.
    Disconnected,
    /// No frame arrived within the idle timeout.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Inbound frame was not valid JSON.
    Malformed(String),
    /// The session was already closed from the server side.
    Closed,
    /// The peer is gone and cannot receive frames.
    PeerGone,
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(details) => write!(f, "malformed frame: {details}"),
            Self::Closed => write!(f, "session is closed"),
            Self::PeerGone => write!(f, "peer disconnected"),
        }
    }
}

impl Error for TransportError {}

/// Bidirectional JSON message transport for one connection.
pub trait SessionTransport {
    /// Completes the connection handshake.
    fn accept(&mut self) -> Result<(), TransportError>;
    /// Blocks until the next frame, a disconnect, or the idle timeout.
    fn receive(&mut self, idle_timeout: Option<Duration>) -> Result<Inbound, TransportError>;
    fn send(&mut self, message: &Value) -> Result<(), TransportError>;
    /// Closes from the server side. Must be a no-op when already closed.
    fn close(&mut self) -> Result<(), TransportError>;
    fn is_closed(&self) -> bool;
}
