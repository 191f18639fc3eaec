//! Chat payload classification.
//!
//! The chat stream delivers JSON payloads with a top-level `response` field
//! naming the payload family:
//!
//! ```json
//! {"response":"auth","uid":"123","status":"ok"}
//! {"response":"mall_system_msg","message":{"data":{...}}}
//! {"response":"push","message":{"from":{"role":"user","uid":"123"},"type":0,"content":"hi"}}
//! ```
//!
//! `push` payloads are further split by the numeric `type` field (and
//! `sub_type` for type 0) into the [`ContextType`] tags. Anything that
//! cannot be mapped is skipped with a warning instead of being surfaced as
//! some default tag; the dispatcher only ever sees fully classified
//! messages. Messages sent by the service desk itself echo back on the
//! stream with `from.role == "mall_cs"` and are skipped so the operator is
//! not prompted to answer their own replies.

use serde_json::Value;

use crate::domain::{ContextType, InboundMessage};

/// Outcome of classifying one reassembled payload.
#[derive(Debug)]
pub enum Classification {
    /// A fully classified message, ready for the event queue.
    Message(InboundMessage),
    /// Payload dropped; `warning` explains why when there is anything
    /// worth telling the operator.
    Skip { warning: Option<String> },
}

impl Classification {
    fn skip(warning: impl Into<String>) -> Self {
        Self::Skip {
            warning: Some(warning.into()),
        }
    }
}

/// Classify one payload. Pure: no I/O, deterministic, never panics on
/// malformed input.
pub fn classify(shop_id: &str, payload: &str) -> Classification {
    let root: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(error) => return Classification::skip(format!("unparseable chat payload: {error}")),
    };

    let Some(response) = root.get("response").and_then(Value::as_str) else {
        return Classification::skip("payload missing response field");
    };

    if response.eq_ignore_ascii_case("auth") {
        let sender_uid = root
            .get("uid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let text = root
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Classification::Message(InboundMessage {
            shop_id: shop_id.to_string(),
            sender_uid,
            nickname: None,
            context: ContextType::Auth,
            text,
            timestamp_ms: None,
            raw: root,
        });
    }

    if response.eq_ignore_ascii_case("mall_system_msg") {
        let text = root
            .get("message")
            .and_then(|message| message.get("data"))
            .map(stringify);
        return Classification::Message(InboundMessage {
            shop_id: shop_id.to_string(),
            sender_uid: String::new(),
            nickname: None,
            context: ContextType::MallSystemMessage,
            text,
            timestamp_ms: None,
            raw: root,
        });
    }

    if !response.eq_ignore_ascii_case("push") {
        return Classification::skip(format!("ignoring unknown response type: {response}"));
    }

    let Some(message) = root.get("message") else {
        return Classification::skip("push payload missing message field");
    };

    let from_role = message
        .get("from")
        .and_then(|from| from.get("role"))
        .and_then(Value::as_str);
    if from_role.is_some_and(|role| role.eq_ignore_ascii_case("mall_cs")) {
        return Classification::skip("ignoring our own outbound message");
    }

    let sender_uid = message
        .get("from")
        .and_then(|from| from.get("uid"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let nickname = message
        .get("nickname")
        .and_then(Value::as_str)
        .map(str::to_string);
    let timestamp_ms = message.get("time").and_then(Value::as_i64);

    let message_type = message.get("type").and_then(Value::as_i64).unwrap_or(-1);
    let (context, text) = match message_type {
        0 => {
            let sub_type = message.get("sub_type").and_then(Value::as_i64).unwrap_or(-1);
            match sub_type {
                1 => (ContextType::OrderInfo, info_text(message)),
                0 => (ContextType::GoodsInquiry, info_text(message)),
                _ => (ContextType::Text, content_text(message)),
            }
        }
        1 => (ContextType::Image, content_text(message)),
        14 => (ContextType::Video, content_text(message)),
        5 => (ContextType::Emotion, info_text(message)),
        64 => (ContextType::GoodsSpec, info_text(message)),
        24 => (ContextType::Transfer, info_text(message)),
        1002 => (ContextType::Withdraw, info_text(message)),
        other => (
            ContextType::SystemStatus,
            Some(format!("unsupported message type: {other}")),
        ),
    };

    Classification::Message(InboundMessage {
        shop_id: shop_id.to_string(),
        sender_uid,
        nickname,
        context,
        text,
        timestamp_ms,
        raw: root,
    })
}

/// Structured fields (`info`) keep their full JSON shape when rendered as
/// text; plain JSON strings come through unquoted.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn info_text(message: &Value) -> Option<String> {
    message.get("info").map(stringify)
}

fn content_text(message: &Value) -> Option<String> {
    message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
}
