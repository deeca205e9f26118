//! Progress notification channel.
//!
//! # Responsibility
//! - Relay caller-supplied progress events back to the same caller.
//! - Drive one session per connection as an explicit state machine
//!   (`Open -> Relaying -> Closed`) on its own thread.
//!
//! # Invariants
//! - Sessions share no state with each other or with the data services.
//! - `progress_percentage` is echoed unchanged; no range/type validation.
//! - Every exit path closes the session from the server side; closing an
//!   already-closed session is a no-op.

pub mod memory;
pub mod message;
pub mod relay;
pub mod session;
pub mod transport;

pub use memory::{memory_pair, MemoryPeer, MemoryTransport, ServerFrame};
pub use message::{ProgressMessage, TASK_COMPLETED};
pub use relay::{ProgressRelay, RelayStep, SessionState};
pub use session::{
    run_session, spawn_session, ProgressSession, SessionError, SessionOptions, SessionOutcome,
};
pub use transport::{Inbound, SessionTransport, TransportError};
