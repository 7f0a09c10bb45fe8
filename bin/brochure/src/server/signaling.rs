//! Ephemeral WebRTC signaling relay.
//!
//! Peers exchange SDP blobs through a room: one side posts an `offer`, the
//! other polls for it and posts an `answer`. Rooms live in memory only and
//! disappear on restart.

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;

use super::state::AppState;

/// A room's messages: SDP payloads keyed by message type.
pub type Room = BTreeMap<String, Value>;

/// SDP messages per room, keyed by message type.
///
/// Payloads are kept as the JSON the peer sent, string or object.
#[derive(Debug, Default)]
pub struct SignalingRooms {
    rooms: Mutex<HashMap<String, Room>>,
}

impl SignalingRooms {
    /// Snapshot a room.
    #[must_use]
    pub fn get(&self, room: &str) -> Option<Room> {
        self.rooms.lock().get(room).cloned()
    }

    /// Store a message, replacing any earlier one of the same type.
    pub fn put(&self, room: &str, kind: &str, sdp: Value) {
        self.rooms
            .lock()
            .entry(room.to_string())
            .or_default()
            .insert(kind.to_string(), sdp);
    }
}

/// `?room=` query parameter.
#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    room: Option<String>,
}

/// Posted signaling message.
#[derive(Debug, Deserialize)]
struct SignalMessage {
    room: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    sdp: Value,
}

/// Whether a field counts as present: `null`, `false`, `0` and `""` do not.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn room_param(query: &RoomQuery) -> Option<&str> {
    query.room.as_deref().filter(|r| !r.is_empty())
}

/// `GET /api/signaling?room=R`
pub async fn fetch(State(state): State<AppState>, Query(query): Query<RoomQuery>) -> Response {
    let Some(room) = room_param(&query) else {
        return (StatusCode::BAD_REQUEST, "Missing room parameter").into_response();
    };

    match state.rooms.get(room) {
        Some(messages) => Json(messages).into_response(),
        None => (StatusCode::NOT_FOUND, "Room not found").into_response(),
    }
}

/// `POST /api/signaling?room=R` with `{room, type, sdp}`.
pub async fn store(
    State(state): State<AppState>,
    Query(query): Query<RoomQuery>,
    body: String,
) -> Response {
    if room_param(&query).is_none() {
        return (StatusCode::BAD_REQUEST, "Missing room parameter").into_response();
    }

    let message: SignalMessage = match serde_json::from_str(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable signaling message");
            return (StatusCode::BAD_REQUEST, "Error processing data").into_response();
        }
    };

    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(room), Some(kind), true) = (
        non_empty(message.room),
        non_empty(message.kind),
        is_present(&message.sdp),
    ) else {
        return (StatusCode::BAD_REQUEST, "Missing required fields").into_response();
    };

    state.rooms.put(&room, &kind, message.sdp);
    tracing::debug!(%room, %kind, "stored signaling message");

    (StatusCode::OK, format!("{kind} stored for room {room}")).into_response()
}

/// Any other method.
pub async fn unsupported() -> Response {
    (StatusCode::BAD_REQUEST, "Unsupported operation").into_response()
}
