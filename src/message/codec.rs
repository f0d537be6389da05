//! JSON wire codec.
//!
//! Frames look like `{"id", "type", "transaction"?, "appId"?, "payload"}`.
//! The `type` is read first so unknown kinds can be told apart from broken
//! payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Message, MessageBody, MessageType};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed message frame: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Unknown message type '{0}'")]
    UnknownType(String),

    #[error("Invalid payload for {kind:?}: {source}")]
    Payload {
        kind: MessageType,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {kind:?}: {source}")]
    Encode {
        kind: MessageType,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingFrame<'a> {
    id: Uuid,
    #[serde(rename = "type")]
    kind: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_id: Option<&'a str>,
    payload: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingFrame {
    id: Uuid,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transaction: Option<Uuid>,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default)]
    payload: Value,
}

pub fn encode(message: &Message) -> Result<String, CodecError> {
    let kind = message.message_type();
    let tagged =
        serde_json::to_value(&message.body).map_err(|source| CodecError::Encode { kind, source })?;
    let payload = match tagged {
        Value::Object(mut fields) => fields.remove("payload").unwrap_or(Value::Null),
        _ => Value::Null,
    };

    let frame = OutgoingFrame {
        id: message.id,
        kind,
        transaction: message.transaction,
        app_id: message.app_id.as_deref(),
        payload,
    };
    serde_json::to_string(&frame).map_err(|source| CodecError::Encode { kind, source })
}

pub fn decode(text: &str) -> Result<Message, CodecError> {
    let frame: IncomingFrame = serde_json::from_str(text).map_err(CodecError::Malformed)?;

    let kind: MessageType = match serde_json::from_value(Value::String(frame.kind.clone())) {
        Ok(kind) => kind,
        Err(_) => return Err(CodecError::UnknownType(frame.kind)),
    };

    let mut tagged = serde_json::Map::new();
    tagged.insert("type".to_string(), Value::String(frame.kind));
    tagged.insert("payload".to_string(), frame.payload);
    let body: MessageBody = serde_json::from_value(Value::Object(tagged))
        .map_err(|source| CodecError::Payload { kind, source })?;

    Ok(Message {
        id: frame.id,
        transaction: frame.transaction,
        app_id: frame.app_id,
        body,
    })
}
