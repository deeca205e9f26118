use dealbook_core::progress::{
    memory_pair, run_session, spawn_session, Inbound, ServerFrame, SessionOptions,
    SessionOutcome, SessionTransport, TransportError,
};
use serde_json::{json, Value};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn relays_progress_then_completes_and_closes() {
    let (transport, peer) = memory_pair();
    let handle = spawn_session(transport, SessionOptions::default()).unwrap();

    peer.send_json(&json!({"progress_percentage": 42})).unwrap();
    assert_eq!(
        peer.recv(WAIT),
        Some(ServerFrame::Message(json!({"progress_percentage": 42})))
    );

    peer.send_json(&json!({"message": "Task completed"})).unwrap();
    assert_eq!(
        peer.recv(WAIT),
        Some(ServerFrame::Message(json!({"message": "Task completed"})))
    );
    assert_eq!(peer.recv(WAIT), Some(ServerFrame::Close));

    assert_eq!(handle.join().unwrap(), SessionOutcome::Completed);
    assert!(peer.is_closed());
    assert_eq!(
        peer.send_json(&json!({"progress_percentage": 50})),
        Err(TransportError::Closed)
    );
}

#[test]
fn ignores_frames_without_known_fields() {
    let (transport, peer) = memory_pair();
    let handle = spawn_session(transport, SessionOptions::default()).unwrap();

    peer.send_json(&json!({"message": "halfway"})).unwrap();
    peer.send_json(&json!([1, 2, 3])).unwrap();
    peer.send_json(&json!({"progress_percentage": "n/a"})).unwrap();
    assert_eq!(
        peer.recv(WAIT),
        Some(ServerFrame::Message(json!({"progress_percentage": "n/a"})))
    );

    peer.disconnect();
    assert_eq!(handle.join().unwrap(), SessionOutcome::Disconnected);
}

#[test]
fn disconnect_ends_session_without_acknowledgment() {
    let (transport, peer) = memory_pair();
    drop(peer);
    assert_eq!(
        run_session(transport, SessionOptions::default()),
        SessionOutcome::Disconnected
    );
}

#[test]
fn malformed_frame_faults_and_closes() {
    let (transport, peer) = memory_pair();
    let handle = spawn_session(transport, SessionOptions::default()).unwrap();

    peer.send_text("{not json").unwrap();
    assert_eq!(peer.recv(WAIT), Some(ServerFrame::Close));
    match handle.join().unwrap() {
        SessionOutcome::Faulted(reason) => assert!(reason.contains("malformed")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(peer.is_closed());
}

#[test]
fn idle_timeout_closes_quiet_sessions() {
    let (transport, peer) = memory_pair();
    let options = SessionOptions {
        idle_timeout: Some(Duration::from_millis(50)),
    };
    let handle = spawn_session(transport, options).unwrap();

    assert_eq!(handle.join().unwrap(), SessionOutcome::IdleTimeout);
    assert_eq!(peer.recv(WAIT), Some(ServerFrame::Close));
}

#[test]
fn memory_transport_close_is_idempotent() {
    let (mut transport, peer) = memory_pair();
    transport.close().unwrap();
    transport.close().unwrap();
    assert!(transport.is_closed());
    assert_eq!(peer.recv(WAIT), Some(ServerFrame::Close));
    assert_eq!(peer.recv(Duration::from_millis(20)), None);
    assert_eq!(
        transport.send(&Value::Null),
        Err(TransportError::Closed)
    );
}

#[test]
fn receive_reports_disconnect_as_inbound_state() {
    let (mut transport, peer) = memory_pair();
    peer.disconnect();
    assert_eq!(transport.receive(None), Ok(Inbound::Disconnected));
}

#[test]
fn peer_gone_before_reply_counts_as_disconnect() {
    let (transport, peer) = memory_pair();
    peer.send_json(&json!({"progress_percentage": 10})).unwrap();
    drop(peer);
    assert_eq!(
        run_session(transport, SessionOptions::default()),
        SessionOutcome::Disconnected
    );
}
