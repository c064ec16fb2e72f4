//! Newline-delimited JSON bridge over stdio.
//!
//! Outbound frames are requests (`startSession`, `customRequest`,
//! `stopSession`) correlated by a `seq` number, plus uncorrelated `event`
//! frames. Inbound frames either answer a pending `seq` or carry a
//! session lifecycle notification, which is forwarded to the event
//! channel for the [`crate::launch::SessionEventSink`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use crate::catalog::ConfigMap;
use crate::error::{LaunchError, Result};
use crate::launch::{DebugHost, SessionEvent, SessionHandle, SessionKind, StartOptions};

struct Shared {
    seq: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<Value>>>,
    outgoing: mpsc::Sender<String>,
}

impl Shared {
    /// Send a request frame and await the response with the same `seq`.
    async fn round_trip(&self, mut frame: Value) -> Result<Value> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        if let Value::Object(map) = &mut frame {
            map.insert("seq".into(), json!(seq));
        }

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(seq, tx);

        if self.outgoing.send(frame.to_string()).await.is_err() {
            self.pending.lock().await.remove(&seq);
            return Err(LaunchError::BridgeClosed);
        }

        rx.await.map_err(|_| LaunchError::BridgeClosed)
    }

    /// Send a frame without waiting for an answer.
    async fn fire(&self, frame: Value) -> Result<()> {
        self.outgoing
            .send(frame.to_string())
            .await
            .map_err(|_| LaunchError::BridgeClosed)
    }
}

/// A [`DebugHost`] speaking newline-delimited JSON to the editor glue.
pub struct StdioBridge {
    shared: Arc<Shared>,
}

impl StdioBridge {
    /// Create a bridge over the process's stdin/stdout.
    ///
    /// Returns the bridge and the channel of unsolicited session events.
    pub fn over_stdio() -> (Arc<Self>, mpsc::Receiver<SessionEvent>) {
        Self::over_streams(tokio::io::stdin(), tokio::io::stdout())
    }

    /// Create a bridge over arbitrary streams (for tests and sockets).
    pub fn over_streams<R, W>(reader: R, writer: W) -> (Arc<Self>, mpsc::Receiver<SessionEvent>)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, out_rx) = mpsc::channel::<String>(64);
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(64);

        let shared = Arc::new(Shared {
            seq: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            outgoing: out_tx,
        });

        tokio::spawn(write_loop(writer, out_rx, shared.clone()));
        tokio::spawn(read_loop(reader, shared.clone(), event_tx));

        (Arc::new(Self { shared }), event_rx)
    }
}

async fn write_loop<W>(mut writer: W, mut frames: mpsc::Receiver<String>, shared: Arc<Shared>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = frames.recv().await {
        if writer.write_all(line.as_bytes()).await.is_err()
            || writer.write_all(b"\n").await.is_err()
            || writer.flush().await.is_err()
        {
            warn!("bridge writer closed");
            break;
        }
    }
    // Wake every pending request so callers observe the closure.
    shared.pending.lock().await.clear();
}

async fn read_loop<R>(reader: R, shared: Arc<Shared>, events: mpsc::Sender<SessionEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Value>(&line) {
                    Ok(frame) => dispatch(&shared, frame, &events).await,
                    Err(err) => warn!(%err, "discarding malformed frame"),
                }
            }
            Ok(None) => {
                debug!("bridge reader reached end of stream");
                break;
            }
            Err(err) => {
                warn!(%err, "bridge reader failed");
                break;
            }
        }
    }
    shared.pending.lock().await.clear();
}

async fn dispatch(shared: &Arc<Shared>, frame: Value, events: &mpsc::Sender<SessionEvent>) {
    if let Some(seq) = frame.get("seq").and_then(Value::as_u64) {
        if let Some(tx) = shared.pending.lock().await.remove(&seq) {
            let _ = tx.send(frame);
            return;
        }
    }

    if let Some(event) = parse_event(&frame) {
        let _ = events.send(event).await;
    }
}

fn parse_event(frame: &Value) -> Option<SessionEvent> {
    let event = frame.get("event")?.as_str()?;
    let kind = match frame.get("kind").and_then(Value::as_str) {
        Some("interpreted") => Some(SessionKind::Interpreted),
        Some("native") => Some(SessionKind::Native),
        _ => None,
    };
    let name = frame
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match (event, kind) {
        ("sessionStarted", Some(kind)) => Some(SessionEvent::Started { kind, name }),
        ("sessionTerminated", Some(kind)) => Some(SessionEvent::Terminated { kind, name }),
        _ => Some(SessionEvent::Custom {
            event: event.to_string(),
            body: frame.get("body").cloned().unwrap_or(Value::Null),
        }),
    }
}

fn success_of(response: &Value) -> bool {
    response
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn message_of(response: &Value) -> String {
    response
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string()
}

#[async_trait]
impl DebugHost for StdioBridge {
    async fn start_session(
        &self,
        kind: SessionKind,
        workspace: &Path,
        config: &ConfigMap,
        options: StartOptions,
    ) -> Result<Option<Arc<dyn SessionHandle>>> {
        let response = self
            .shared
            .round_trip(json!({
                "command": "startSession",
                "kind": kind.to_string(),
                "workspace": workspace.display().to_string(),
                "configuration": config,
                "options": { "noDebug": options.no_debug },
            }))
            .await?;

        if !success_of(&response) {
            warn!(%kind, message = %message_of(&response), "host declined session start");
            return Ok(None);
        }

        let body = response.get("body").cloned().unwrap_or(Value::Null);
        let session_id = body
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| LaunchError::Bridge("start response missing sessionId".into()))?
            .to_string();
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| config.get("name").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        Ok(Some(Arc::new(BridgeSession {
            shared: self.shared.clone(),
            session_id,
            kind,
            name,
        })))
    }

    async fn send_event(&self, event: SessionEvent) -> Result<()> {
        let frame = match event {
            SessionEvent::Started { kind, name } => json!({
                "command": "event", "event": "sessionStarted",
                "kind": kind.to_string(), "name": name,
            }),
            SessionEvent::Terminated { kind, name } => json!({
                "command": "event", "event": "sessionTerminated",
                "kind": kind.to_string(), "name": name,
            }),
            SessionEvent::Custom { event, body } => json!({
                "command": "event", "event": event, "body": body,
            }),
        };
        self.shared.fire(frame).await
    }
}

/// A session living on the far side of the bridge.
struct BridgeSession {
    shared: Arc<Shared>,
    session_id: String,
    kind: SessionKind,
    name: String,
}

#[async_trait]
impl SessionHandle for BridgeSession {
    fn kind(&self) -> SessionKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn send_custom_request(&self, command: &str) -> Result<Value> {
        let response = self
            .shared
            .round_trip(json!({
                "command": "customRequest",
                "sessionId": self.session_id,
                "request": command,
            }))
            .await?;

        if success_of(&response) {
            Ok(response.get("body").cloned().unwrap_or(Value::Null))
        } else {
            Err(LaunchError::Bridge(message_of(&response)))
        }
    }

    async fn stop(&self) -> Result<()> {
        let response = self
            .shared
            .round_trip(json!({
                "command": "stopSession",
                "sessionId": self.session_id,
            }))
            .await?;

        if success_of(&response) {
            Ok(())
        } else {
            Err(LaunchError::Bridge(message_of(&response)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    /// A scripted peer: answers every request with `respond(frame)`.
    async fn run_peer<F>(stream: tokio::io::DuplexStream, respond: F)
    where
        F: Fn(&Value) -> Option<Value> + Send + 'static,
    {
        let (read, mut write) = tokio::io::split(stream);
        let mut lines = BufReader::new(read).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let frame: Value = serde_json::from_str(&line).unwrap();
            if let Some(mut response) = respond(&frame) {
                if let Some(seq) = frame.get("seq") {
                    response["seq"] = seq.clone();
                }
                let text = response.to_string();
                write.write_all(text.as_bytes()).await.unwrap();
                write.write_all(b"\n").await.unwrap();
            }
        }
    }

    fn bridge_pair() -> (
        Arc<StdioBridge>,
        mpsc::Receiver<SessionEvent>,
        tokio::io::DuplexStream,
    ) {
        let (near, far) = tokio::io::duplex(16 * 1024);
        let (read, write) = tokio::io::split(near);
        let (bridge, events) = StdioBridge::over_streams(read, write);
        (bridge, events, far)
    }

    #[tokio::test]
    async fn test_start_session_success() {
        let (bridge, _events, far) = bridge_pair();
        tokio::spawn(run_peer(far, |frame| {
            assert_eq!(
                frame.get("command").and_then(Value::as_str),
                Some("startSession")
            );
            Some(json!({
                "success": true,
                "body": { "sessionId": "s-1", "name": "Python: Current File" }
            }))
        }));

        let mut config = ConfigMap::new();
        config.insert("name".into(), json!("Python: Current File"));

        let handle = bridge
            .start_session(
                SessionKind::Interpreted,
                Path::new("/tmp/project"),
                &config,
                StartOptions::default(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(handle.kind(), SessionKind::Interpreted);
        assert_eq!(handle.name(), "Python: Current File");
    }

    #[tokio::test]
    async fn test_start_session_declined_yields_none() {
        let (bridge, _events, far) = bridge_pair();
        tokio::spawn(run_peer(far, |_| {
            Some(json!({ "success": false, "message": "no debugger installed" }))
        }));

        let result = bridge
            .start_session(
                SessionKind::Native,
                Path::new("/tmp/project"),
                &ConfigMap::new(),
                StartOptions::default(),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_custom_request_round_trip() {
        let (bridge, _events, far) = bridge_pair();
        tokio::spawn(run_peer(far, |frame| {
            match frame.get("command").and_then(Value::as_str) {
                Some("startSession") => Some(json!({
                    "success": true,
                    "body": { "sessionId": "s-2" }
                })),
                Some("customRequest") => {
                    assert_eq!(
                        frame.get("request").and_then(Value::as_str),
                        Some("pydevdSystemInfo")
                    );
                    Some(json!({
                        "success": true,
                        "body": { "process": { "pid": 31337 } }
                    }))
                }
                _ => None,
            }
        }));

        let handle = bridge
            .start_session(
                SessionKind::Interpreted,
                Path::new("/tmp"),
                &ConfigMap::new(),
                StartOptions::default(),
            )
            .await
            .unwrap()
            .unwrap();

        let body = handle.send_custom_request("pydevdSystemInfo").await.unwrap();
        assert_eq!(
            body.get("process").and_then(|p| p.get("pid")).and_then(Value::as_u64),
            Some(31337)
        );
    }

    #[tokio::test]
    async fn test_unsolicited_event_reaches_channel() {
        let (_bridge, mut events, far) = bridge_pair();
        let (_read, mut write) = tokio::io::split(far);

        write
            .write_all(
                b"{\"event\":\"sessionTerminated\",\"kind\":\"interpreted\",\"name\":\"py\"}\n",
            )
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        match event {
            SessionEvent::Terminated { kind, name } => {
                assert_eq!(kind, SessionKind::Interpreted);
                assert_eq!(name, "py");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_closed_peer_is_reported() {
        let (bridge, _events, far) = bridge_pair();
        drop(far);

        // Give the reader task a moment to observe the closure.
        tokio::task::yield_now().await;

        let result = bridge
            .start_session(
                SessionKind::Interpreted,
                Path::new("/tmp"),
                &ConfigMap::new(),
                StartOptions::default(),
            )
            .await;

        assert!(result.is_err());
    }
}
