//! In-process transport pair over channels.
//!
//! The peer side plays the client: it sends raw text frames and observes
//! what the session emits, including the server-side close.

use crate::progress::transport::{Inbound, SessionTransport, TransportError};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Frame observed by the peer.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    Message(Value),
    Close,
}

/// Server half of an in-process connection.
#[derive(Debug)]
pub struct MemoryTransport {
    inbound: Receiver<String>,
    outbound: Sender<ServerFrame>,
    closed: Arc<AtomicBool>,
}

/// Client half of an in-process connection.
#[derive(Debug)]
pub struct MemoryPeer {
    outbound: Sender<String>,
    inbound: Receiver<ServerFrame>,
    closed: Arc<AtomicBool>,
}

/// Creates a connected `(server, client)` pair.
pub fn memory_pair() -> (MemoryTransport, MemoryPeer) {
    let (client_tx, server_rx) = mpsc::channel();
    let (server_tx, client_rx) = mpsc::channel();
    let closed = Arc::new(AtomicBool::new(false));
    (
        MemoryTransport {
            inbound: server_rx,
            outbound: server_tx,
            closed: Arc::clone(&closed),
        },
        MemoryPeer {
            outbound: client_tx,
            inbound: client_rx,
            closed,
        },
    )
}

impl SessionTransport for MemoryTransport {
    fn accept(&mut self) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        Ok(())
    }

    fn receive(&mut self, idle_timeout: Option<Duration>) -> Result<Inbound, TransportError> {
        let raw = match idle_timeout {
            Some(timeout) => match self.inbound.recv_timeout(timeout) {
                Ok(raw) => raw,
                Err(RecvTimeoutError::Timeout) => return Ok(Inbound::TimedOut),
                Err(RecvTimeoutError::Disconnected) => return Ok(Inbound::Disconnected),
            },
            None => match self.inbound.recv() {
                Ok(raw) => raw,
                Err(_) => return Ok(Inbound::Disconnected),
            },
        };

        serde_json::from_str(&raw)
            .map(Inbound::Message)
            .map_err(|err| TransportError::Malformed(err.to_string()))
    }

    fn send(&mut self, message: &Value) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.outbound
            .send(ServerFrame::Message(message.clone()))
            .map_err(|_| TransportError::PeerGone)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Peer may already be gone; the close still counts.
        let _ = self.outbound.send(ServerFrame::Close);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl MemoryPeer {
    pub fn send_json(&self, message: &Value) -> Result<(), TransportError> {
        self.send_text(&message.to_string())
    }

    /// Sends a raw frame, valid JSON or not.
    pub fn send_text(&self, raw: &str) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.outbound
            .send(raw.to_string())
            .map_err(|_| TransportError::PeerGone)
    }

    /// Waits up to `timeout` for the next server frame.
    pub fn recv(&self, timeout: Duration) -> Option<ServerFrame> {
        self.inbound.recv_timeout(timeout).ok()
    }

    /// True once the server closed the session.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Drops the client half, simulating an abrupt disconnect.
    pub fn disconnect(self) {}
}
