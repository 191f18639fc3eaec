//! Inbound chat events.

use std::fmt;

/// Closed set of inbound message classifications.
///
/// Every message placed on the event queue carries exactly one of these
/// tags; payloads that map to none of them are dropped before they reach
/// the dispatcher. `MallCs` marks traffic authored by the service desk
/// itself and is filtered out during classification, so the dispatcher
/// never observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextType {
    Text,
    Image,
    Video,
    Emotion,
    Withdraw,
    GoodsInquiry,
    GoodsSpec,
    OrderInfo,
    MallSystemMessage,
    Auth,
    Transfer,
    SystemStatus,
    MallCs,
}

impl ContextType {
    /// Display-only events: shown to the operator, never prompted for.
    pub fn is_informational(self) -> bool {
        matches!(self, Self::SystemStatus | Self::MallSystemMessage)
    }

    /// Events the operator can answer with a text reply.
    pub fn is_reply_eligible(self) -> bool {
        matches!(self, Self::Text | Self::GoodsInquiry | Self::OrderInfo)
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One classified buyer-side message.
///
/// Built exclusively by the classifier, consumed exactly once by the
/// dispatch loop, never mutated in between. `raw` keeps the original
/// payload for auditing; `text` is the human-readable summary the console
/// shows.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub shop_id: String,
    pub sender_uid: String,
    pub nickname: Option<String>,
    pub context: ContextType,
    pub text: Option<String>,
    pub raw: serde_json::Value,
    /// Origin timestamp in epoch milliseconds, when the payload carried one.
    pub timestamp_ms: Option<i64>,
}
