//! Reply submission.

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use super::client::{HttpExchange, RequestClient};
use crate::config::PlatformConfig;
use crate::domain::CookieJar;
use crate::error::{Result, SendError};
use crate::relay::ReplyGateway;

/// Error code the gateway embeds in an otherwise successful envelope when
/// the platform refuses the message (rate limits, closed conversations).
const PLATFORM_REJECTED: i64 = 10002;

/// [`ReplyGateway`] backed by the merchant gateway's `send_message` command.
///
/// Each submission builds a fresh [`RequestClient`], so a slow retry on one
/// reply never blocks another and every call carries its own cookie
/// snapshot.
pub struct ReplySender {
    platform: PlatformConfig,
    cookies: CookieJar,
}

impl ReplySender {
    pub fn new(platform: PlatformConfig, cookies: CookieJar) -> Self {
        Self { platform, cookies }
    }
}

#[async_trait]
impl ReplyGateway for ReplySender {
    async fn send_text(&self, recipient_uid: &str, content: &str) -> Result<()> {
        let client = RequestClient::new(&self.platform, self.cookies.clone())?;
        submit_text(&client, &self.platform.send_url, recipient_uid, content).await
    }
}

/// Submit one text reply and interpret the gateway's layered verdicts.
pub(crate) async fn submit_text<E: HttpExchange>(
    client: &RequestClient<E>,
    url: &str,
    recipient_uid: &str,
    content: &str,
) -> Result<()> {
    let payload = json!({
        "data": {
            "cmd": "send_message",
            "request_id": request_id(),
            "message": {
                "to": {"role": "user", "uid": recipient_uid},
                "from": {"role": "mall_cs"},
                "content": content,
                "msg_id": null,
                "type": 0,
                "is_aut": 0,
                "manual_reply": 1,
            },
        },
        "client": "WEB",
    });

    let document = client
        .post_json(url, &payload)
        .await?
        .ok_or(SendError::EmptyResponse)?;

    if document.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(SendError::Rejected(document.to_string()).into());
    }

    if let Some(result) = document.get("result") {
        if result.get("error_code").and_then(Value::as_i64) == Some(PLATFORM_REJECTED) {
            let message = result
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(SendError::Platform {
                code: PLATFORM_REJECTED,
                message,
            }
            .into());
        }
    }

    Ok(())
}

fn request_id() -> String {
    Uuid::new_v4().simple().to_string()
}
