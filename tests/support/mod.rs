//! Shared test doubles and frame builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use shopdesk::domain::{ContextType, InboundMessage};
use shopdesk::error::{Error, Result, SendError};
use shopdesk::relay::{OperatorConsole, ReplyGateway};

/// Console double fed with scripted reply input; records what it was shown.
#[derive(Default)]
pub struct ScriptedConsole {
    replies: VecDeque<Option<String>>,
    pub system_shown: Vec<ContextType>,
    pub messages_shown: Vec<InboundMessage>,
    pub acknowledged: usize,
    pub notices: Vec<String>,
    pub prompts: usize,
}

impl ScriptedConsole {
    pub fn with_replies(replies: Vec<&str>) -> Self {
        Self {
            replies: replies
                .into_iter()
                .map(|r| Some(r.to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl OperatorConsole for ScriptedConsole {
    fn show_system(&mut self, message: &InboundMessage) {
        self.system_shown.push(message.context);
    }

    fn show_message(&mut self, message: &InboundMessage) {
        self.messages_shown.push(message.clone());
    }

    fn notify(&mut self, note: &str) {
        self.notices.push(note.to_string());
    }

    async fn acknowledge(&mut self) -> Result<()> {
        self.acknowledged += 1;
        Ok(())
    }

    async fn read_reply(&mut self) -> Result<Option<String>> {
        self.prompts += 1;
        Ok(self.replies.pop_front().unwrap_or(None))
    }
}

/// Gateway double recording every submission; optionally failing them all.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

#[async_trait]
impl ReplyGateway for RecordingGateway {
    async fn send_text(&self, recipient_uid: &str, content: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Send(SendError::Rejected("scripted failure".into())));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient_uid.to_string(), content.to_string()));
        Ok(())
    }
}

/// A buyer text message frame as it arrives on the wire.
pub fn text_frame(uid: &str, content: &str) -> String {
    json!({
        "response": "push",
        "message": {
            "from": {"role": "user", "uid": uid},
            "type": 0,
            "content": content,
        }
    })
    .to_string()
}

/// A frame echoing one of our own outbound messages.
pub fn own_message_frame(content: &str) -> String {
    json!({
        "response": "push",
        "message": {
            "from": {"role": "mall_cs", "uid": "CS1"},
            "type": 0,
            "content": content,
        }
    })
    .to_string()
}

/// A withdraw notification with structured info.
pub fn withdraw_frame(uid: &str, info: serde_json::Value) -> String {
    json!({
        "response": "push",
        "message": {
            "from": {"role": "user", "uid": uid},
            "type": 1002,
            "info": info,
        }
    })
    .to_string()
}

/// An auth status frame.
pub fn auth_frame(uid: &str, status: &str) -> String {
    json!({"response": "auth", "uid": uid, "status": status}).to_string()
}
