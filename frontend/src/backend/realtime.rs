//! Postgres change feed over the realtime socket (Phoenix channel protocol).

use futures::channel::mpsc;
use futures::future::{self, AbortHandle};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wasm_bindgen_futures::spawn_local;

use super::{Backend, BackendError};

const HEARTBEAT_MS: u32 = 25_000;
const TOPIC_PREFIX: &str = "realtime:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    All,
}

impl ChangeKind {
    fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
            ChangeKind::All => "*",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INSERT" => Some(ChangeKind::Insert),
            "UPDATE" => Some(ChangeKind::Update),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

/// One `postgres_changes` listener.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSpec {
    pub name: String,
    pub table: String,
    pub event: ChangeKind,
    pub filter: Option<String>,
}

impl ChannelSpec {
    pub fn new(name: &str, table: &str, event: ChangeKind) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            event,
            filter: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn topic(&self) -> String {
        format!("{}{}", TOPIC_PREFIX, self.name)
    }

    fn join_payload(&self, access_token: &str) -> Value {
        let mut change = json!({
            "event": self.event.as_str(),
            "schema": "public",
            "table": self.table,
        });
        if let Some(filter) = &self.filter {
            change["filter"] = Value::String(filter.clone());
        }
        json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [change],
            },
            "access_token": access_token,
        })
    }
}

/// The three feeds the shell listens to for a signed-in user.
pub fn user_channels(user_id: &str) -> Vec<ChannelSpec> {
    let owned = format!("user_id=eq.{}", user_id);
    vec![
        ChannelSpec::new("notifications", "notifications", ChangeKind::Insert).filter(owned.clone()),
        ChannelSpec::new("reconciliations", "reconciliations", ChangeKind::All).filter(owned.clone()),
        ChannelSpec::new("invoices", "invoices", ChangeKind::Update).filter(owned),
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl PhoenixMessage {
    pub fn join(spec: &ChannelSpec, access_token: &str, reference: usize) -> Self {
        Self {
            topic: spec.topic(),
            event: "phx_join".to_string(),
            payload: spec.join_payload(access_token),
            reference: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: usize) -> Self {
        Self {
            topic: "phoenix".to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    fn to_frame(&self) -> Option<Message> {
        serde_json::to_string(self).ok().map(Message::Text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChangeEvent {
    pub channel: String,
    pub table: String,
    pub kind: ChangeKind,
    pub record: Value,
    pub old_record: Value,
}

impl ChangeEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.record.get(name).and_then(Value::as_str)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Incoming {
    Change(ChangeEvent),
    JoinRejected { topic: String, reason: String },
    Other,
}

pub fn decode_message(raw: &str) -> Incoming {
    let Ok(message) = serde_json::from_str::<PhoenixMessage>(raw) else {
        return Incoming::Other;
    };
    match message.event.as_str() {
        "postgres_changes" => {
            let data = &message.payload["data"];
            let kind = data["type"].as_str().and_then(ChangeKind::parse);
            match (kind, data["table"].as_str()) {
                (Some(kind), Some(table)) => Incoming::Change(ChangeEvent {
                    channel: message
                        .topic
                        .strip_prefix(TOPIC_PREFIX)
                        .unwrap_or(&message.topic)
                        .to_string(),
                    table: table.to_string(),
                    kind,
                    record: data["record"].clone(),
                    old_record: data["old_record"].clone(),
                }),
                _ => Incoming::Other,
            }
        }
        "phx_reply" if message.payload["status"] == "error" => Incoming::JoinRejected {
            reason: message.payload["response"].to_string(),
            topic: message.topic,
        },
        _ => Incoming::Other,
    }
}

/// Live socket; dropping it stops the heartbeat and closes the feed.
pub struct Subscription {
    handle: AbortHandle,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
        log::debug!("realtime subscription dropped");
    }
}

pub fn subscribe<F>(backend: &Backend, channels: Vec<ChannelSpec>, on_change: F) -> Result<Subscription, BackendError>
where
    F: Fn(ChangeEvent) + 'static,
{
    let socket = WebSocket::open(&backend.config().realtime_url())
        .map_err(|err| BackendError::Network(err.to_string()))?;
    let (mut sink, mut stream) = socket.split();
    let token = backend
        .session()
        .map(|session| session.access_token.clone())
        .unwrap_or_else(|| backend.config().anon_key.clone());

    let (outbox, mut pending) = mpsc::unbounded::<Message>();
    for (i, spec) in channels.iter().enumerate() {
        if let Some(frame) = PhoenixMessage::join(spec, &token, i + 1).to_frame() {
            let _ = outbox.unbounded_send(frame);
        }
    }

    let writer = async move {
        while let Some(frame) = pending.next().await {
            if let Err(err) = sink.send(frame).await {
                log::warn!("realtime send failed: {}", err);
                break;
            }
        }
    };

    let mut counter = channels.len();
    let heartbeat = async move {
        loop {
            TimeoutFuture::new(HEARTBEAT_MS).await;
            counter += 1;
            let Some(frame) = PhoenixMessage::heartbeat(counter).to_frame() else {
                continue;
            };
            if outbox.unbounded_send(frame).is_err() {
                break;
            }
        }
    };

    let reader = async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(raw)) => match decode_message(&raw) {
                    Incoming::Change(change) => {
                        log::debug!("{:?} on {}", change.kind, change.table);
                        on_change(change);
                    }
                    Incoming::JoinRejected { topic, reason } => {
                        log::warn!("realtime join for {} rejected: {}", topic, reason);
                    }
                    Incoming::Other => {}
                },
                Ok(Message::Bytes(_)) => {}
                Err(err) => {
                    log::warn!("realtime socket error: {}", err);
                    break;
                }
            }
        }
    };

    let (task, handle) = future::abortable(async move {
        future::select(Box::pin(reader), Box::pin(future::join(writer, heartbeat))).await;
        log::info!("realtime connection closed");
    });
    spawn_local(async move {
        let _ = task.await;
    });
    log::info!("realtime subscribed to {} channel(s)", channels.len());

    Ok(Subscription { handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_frame_carries_filter_and_token() {
        let spec = ChannelSpec::new("invoices", "invoices", ChangeKind::Update).filter("user_id=eq.u-1");
        let message = PhoenixMessage::join(&spec, "jwt", 3);
        let frame = serde_json::to_value(&message).unwrap();
        assert_eq!(frame["topic"], "realtime:invoices");
        assert_eq!(frame["event"], "phx_join");
        assert_eq!(frame["ref"], "3");
        assert_eq!(frame["payload"]["access_token"], "jwt");
        let change = &frame["payload"]["config"]["postgres_changes"][0];
        assert_eq!(change["event"], "UPDATE");
        assert_eq!(change["schema"], "public");
        assert_eq!(change["filter"], "user_id=eq.u-1");
    }

    #[test]
    fn unfiltered_join_has_no_filter_key() {
        let spec = ChannelSpec::new("all", "reconciliations", ChangeKind::All);
        let payload = spec.join_payload("t");
        let change = &payload["config"]["postgres_changes"][0];
        assert_eq!(change["event"], "*");
        assert!(change.get("filter").is_none());
    }

    #[test]
    fn heartbeat_targets_phoenix_topic() {
        let frame = serde_json::to_value(PhoenixMessage::heartbeat(7)).unwrap();
        assert_eq!(frame["topic"], "phoenix");
        assert_eq!(frame["event"], "heartbeat");
        assert_eq!(frame["ref"], "7");
    }

    #[test]
    fn decodes_postgres_change() {
        let raw = r#"{
            "topic": "realtime:notifications",
            "event": "postgres_changes",
            "ref": null,
            "payload": {
                "ids": [1],
                "data": {
                    "type": "INSERT",
                    "table": "notifications",
                    "schema": "public",
                    "record": { "id": 5, "title": "Rekonsiliasi tidak cocok" },
                    "old_record": null
                }
            }
        }"#;
        match decode_message(raw) {
            Incoming::Change(change) => {
                assert_eq!(change.channel, "notifications");
                assert_eq!(change.kind, ChangeKind::Insert);
                assert_eq!(change.field("title"), Some("Rekonsiliasi tidak cocok"));
                assert!(change.old_record.is_null());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn flags_rejected_joins() {
        let raw = r#"{"topic":"realtime:invoices","event":"phx_reply","ref":"1",
            "payload":{"status":"error","response":{"reason":"Invalid token"}}}"#;
        assert!(matches!(decode_message(raw), Incoming::JoinRejected { topic, .. } if topic == "realtime:invoices"));

        let ok = r#"{"topic":"realtime:invoices","event":"phx_reply","ref":"1","payload":{"status":"ok","response":{}}}"#;
        assert_eq!(decode_message(ok), Incoming::Other);
    }

    #[test]
    fn ignores_noise() {
        assert_eq!(decode_message("not json"), Incoming::Other);
        assert_eq!(
            decode_message(r#"{"topic":"phoenix","event":"phx_reply","ref":"9","payload":{"status":"ok"}}"#),
            Incoming::Other
        );
        assert_eq!(
            decode_message(r#"{"topic":"realtime:x","event":"postgres_changes","payload":{"data":{"type":"TRUNCATE","table":"x"}}}"#),
            Incoming::Other
        );
    }

    #[test]
    fn user_channels_cover_three_feeds() {
        let channels = user_channels("u-9");
        assert_eq!(channels.len(), 3);
        assert!(channels.iter().all(|c| c.filter.as_deref() == Some("user_id=eq.u-9")));
        assert_eq!(channels[1].event, ChangeKind::All);
    }
}
