// src/core/relay.rs

use futures::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace};
use url::Url;

use crate::core::controller::SessionEvent;

/// Lifecycle of one relay: `Idle` until the socket opens, then `Open`.
/// Both `Closed` and `Error` are terminal.
///
/// `Error` is reachable from `Open` (read failure) and also straight from
/// `Idle` when the connection cannot be established at all; a relay that
/// never opened still reports why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayState {
    #[default]
    Idle,
    Open,
    Closed,
    Error,
}

impl RelayState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RelayState::Closed | RelayState::Error)
    }
}

/// What the channel task reports back, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Opened,
    Message(String),
    Closed,
    Error(String),
}

/// Ordered, append-only scan output for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    lines: Vec<String>,
}

impl OutputBuffer {
    pub fn append(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The streaming channel bound to a single session.
///
/// A relay is never reused: each launch attaches a fresh one with a new `id`,
/// and events carrying any other id are stale. Dropping the relay detaches it,
/// so an open socket cannot outlive its owner.
#[derive(Debug)]
pub struct LiveOutputRelay {
    id: u64,
    session_id: String,
    state: RelayState,
    task: Option<JoinHandle<()>>,
}

impl LiveOutputRelay {
    /// Spawns the channel task for `url`. Events are tagged with `id` and sent
    /// to `events`; the relay itself stays `Idle` until the controller applies
    /// the `Opened` event.
    pub fn attach(id: u64, session_id: &str, url: Url, events: UnboundedSender<SessionEvent>) -> Self {
        info!(relay_id = id, session_id, url = %url, "Attaching live output relay.");
        let task = tokio::spawn(pump(id, url, events));
        Self {
            id,
            session_id: session_id.to_string(),
            state: RelayState::Idle,
            task: Some(task),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    /// `false` once `detach` has run; events must then be dropped.
    pub fn is_attached(&self) -> bool {
        self.task.is_some()
    }

    pub(crate) fn set_state(&mut self, state: RelayState) {
        debug!(relay_id = self.id, from = ?self.state, to = ?state, "Relay state change.");
        self.state = state;
    }

    /// Forcibly closes the channel. Idempotent.
    pub fn detach(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if !self.state.is_terminal() {
                self.state = RelayState::Closed;
            }
            info!(relay_id = self.id, session_id = %self.session_id, "Live output relay detached.");
        }
    }
}

impl Drop for LiveOutputRelay {
    fn drop(&mut self) {
        self.detach();
    }
}

async fn pump(relay_id: u64, url: Url, events: UnboundedSender<SessionEvent>) {
    let emit = |event: RelayEvent| events.send(SessionEvent::Relay { relay_id, event }).is_ok();

    let mut stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!(relay_id, url = %url, error = %e, "Live output channel failed to open.");
            emit(RelayEvent::Error(e.to_string()));
            return;
        }
    };
    info!(relay_id, "Live output channel open.");
    if !emit(RelayEvent::Opened) {
        return;
    }

    while let Some(frame) = stream.next().await {
        let line = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Close(reason)) => {
                debug!(relay_id, reason = ?reason, "Remote side closed the channel.");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                error!(relay_id, error = %e, "Live output channel failed.");
                emit(RelayEvent::Error(e.to_string()));
                return;
            }
        };
        trace!(relay_id, line = %line, "Output line received.");
        if !emit(RelayEvent::Message(line)) {
            // Controller is gone; nothing left to report to.
            return;
        }
    }

    let _ = stream.close(None).await;
    info!(relay_id, "Live output channel closed.");
    emit(RelayEvent::Closed);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::SinkExt;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Accepts one WebSocket connection, sends `lines` as text frames and
    /// closes. Returns the `ws://` base address.
    pub(crate) async fn spawn_stream_server(lines: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
            for line in lines {
                ws.send(Message::Text(line.to_string())).await.unwrap();
            }
            let _ = ws.close(None).await;
        });
        format!("ws://{addr}")
    }

    /// Accepts one connection and then holds it open without sending anything.
    pub(crate) async fn spawn_silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
            while ws.next().await.is_some() {}
        });
        format!("ws://{addr}")
    }

    async fn collect_until_terminal(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<RelayEvent> {
        let mut seen = Vec::new();
        loop {
            let next = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
            match next {
                Some(SessionEvent::Relay { event, .. }) => {
                    let done = matches!(event, RelayEvent::Closed | RelayEvent::Error(_));
                    seen.push(event);
                    if done {
                        return seen;
                    }
                }
                Some(_) => {}
                None => return seen,
            }
        }
    }

    #[tokio::test]
    async fn relays_frames_in_order_then_closes() {
        let base = spawn_stream_server(vec!["line1", "line2", "line3"]).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let url = Url::parse(&format!("{base}/api/ws/scan/abc")).unwrap();
        let _relay = LiveOutputRelay::attach(1, "abc", url, tx);

        let events = collect_until_terminal(&mut rx).await;
        assert_eq!(
            events,
            vec![
                RelayEvent::Opened,
                RelayEvent::Message("line1".into()),
                RelayEvent::Message("line2".into()),
                RelayEvent::Message("line3".into()),
                RelayEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn refused_connection_reports_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let url = Url::parse(&format!("ws://{addr}/api/ws/scan/abc")).unwrap();
        let _relay = LiveOutputRelay::attach(7, "abc", url, tx);

        let events = collect_until_terminal(&mut rx).await;
        assert!(matches!(events.as_slice(), [RelayEvent::Error(_)]));
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let base = spawn_silent_server().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let url = Url::parse(&format!("{base}/api/ws/scan/abc")).unwrap();
        let mut relay = LiveOutputRelay::attach(3, "abc", url, tx);
        relay.set_state(RelayState::Open);

        relay.detach();
        assert!(!relay.is_attached());
        assert_eq!(relay.state(), RelayState::Closed);

        relay.detach();
        assert_eq!(relay.state(), RelayState::Closed);
    }

    #[test]
    fn output_buffer_appends_and_clears() {
        let mut buffer = OutputBuffer::default();
        buffer.append("a".into());
        buffer.append("  b  ".into());
        assert_eq!(buffer.lines(), ["a".to_string(), "  b  ".to_string()]);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
