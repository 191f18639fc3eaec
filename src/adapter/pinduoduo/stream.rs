//! Chat stream client.
//!
//! Owns the long-lived WebSocket connection to the chat gateway and feeds
//! classified messages into the event queue. The connection lifecycle:
//!
//! 1. Build the stream URI with the session token and role/client/version
//!    query parameters and connect.
//! 2. Read payloads until the server closes, the queue's consumer goes
//!    away, or the transport errors out.
//!
//! tungstenite reassembles fragmented frames internally; by the time a
//! `Text` message surfaces here it is one complete logical payload, so the
//! classifier never sees a partial buffer. There is no automatic
//! reconnection: when this loop returns, the session is over and the
//! supervisor decides what happens next.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use super::classify::{classify, Classification};
use crate::config::PlatformConfig;
use crate::domain::InboundMessage;
use crate::error::Result;

/// Role tag the gateway expects from a service-desk client.
const STREAM_ROLE: &str = "mall_cs";
/// Client platform tag sent on the handshake.
const STREAM_CLIENT: &str = "web";

pub struct ChatStream {
    ws_url: String,
    ws_version: String,
    ping_interval: Duration,
    shop_id: String,
}

impl ChatStream {
    pub fn new(platform: &PlatformConfig, shop_id: impl Into<String>) -> Self {
        Self {
            ws_url: platform.ws_url.clone(),
            ws_version: platform.ws_version.clone(),
            ping_interval: Duration::from_secs(platform.ping_interval_secs),
            shop_id: shop_id.into(),
        }
    }

    fn endpoint(&self, access_token: &str) -> Result<Url> {
        let mut url = Url::parse(&self.ws_url)?;
        url.query_pairs_mut()
            .append_pair("access_token", access_token)
            .append_pair("role", STREAM_ROLE)
            .append_pair("client", STREAM_CLIENT)
            .append_pair("version", &self.ws_version);
        Ok(url)
    }

    /// Connect and pump payloads into `events` until the connection ends.
    ///
    /// Returns `Ok(())` on a server close or when the queue's consumer is
    /// gone; transport errors propagate. Dropping the `events` receiver is
    /// the consumer's way of asking this loop to stop.
    pub async fn run(
        &self,
        access_token: &str,
        events: UnboundedSender<InboundMessage>,
    ) -> Result<()> {
        let url = self.endpoint(access_token)?;
        // The URI carries the session token; log the host only.
        info!(host = url.host_str().unwrap_or_default(), "connecting to chat stream");

        let (mut ws, response) = connect_async(url.as_str()).await?;
        info!(status = %response.status(), "chat stream connected");

        let mut keepalive = tokio::time::interval(self.ping_interval);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval's first tick fires immediately; consume it so the
        // first real ping goes out one full period after connect.
        keepalive.tick().await;

        loop {
            tokio::select! {
                _ = keepalive.tick() => {
                    debug!("sending keep-alive ping");
                    ws.send(Message::Ping(Vec::new())).await?;
                }
                frame = ws.next() => {
                    let Some(frame) = frame else {
                        warn!("chat stream ended without a close frame");
                        return Ok(());
                    };
                    match frame? {
                        Message::Text(payload) => {
                            if !self.handle_payload(&payload, &events) {
                                info!("event queue closed, stopping chat stream");
                                return Ok(());
                            }
                        }
                        Message::Ping(data) => {
                            debug!("answering ping");
                            ws.send(Message::Pong(data)).await?;
                        }
                        Message::Close(frame) => {
                            info!(frame = ?frame, "chat stream closed by server");
                            // Acknowledge the close before tearing down.
                            let _ = ws.close(None).await;
                            return Ok(());
                        }
                        // Binary, Pong and raw frames carry nothing for us.
                        _ => {}
                    }
                }
            }
        }
    }

    /// Classify one payload and queue the result. Returns `false` when the
    /// queue's consumer is gone.
    fn handle_payload(&self, payload: &str, events: &UnboundedSender<InboundMessage>) -> bool {
        debug!(raw = %payload, "received payload");
        match classify(&self.shop_id, payload) {
            Classification::Message(message) => events.send(message).is_ok(),
            Classification::Skip { warning: Some(warning) } => {
                warn!(%warning, "payload skipped");
                true
            }
            Classification::Skip { warning: None } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ContextType;

    fn stream() -> ChatStream {
        ChatStream::new(&PlatformConfig::default(), "shop-1")
    }

    #[test]
    fn endpoint_carries_the_handshake_parameters() {
        let url = stream().endpoint("tok/with?chars").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("access_token".into(), "tok/with?chars".into())));
        assert!(pairs.contains(&("role".into(), "mall_cs".into())));
        assert!(pairs.contains(&("client".into(), "web".into())));
        assert!(pairs.contains(&("version".into(), "202506091557".into())));
    }

    #[test]
    fn classified_payloads_reach_the_queue() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alive = stream().handle_payload(
            r#"{"response":"auth","uid":"U1","status":"ok"}"#,
            &tx,
        );
        assert!(alive);
        let message = rx.try_recv().unwrap();
        assert_eq!(message.context, ContextType::Auth);
        assert_eq!(message.shop_id, "shop-1");
    }

    #[test]
    fn skipped_payloads_do_not_enter_the_queue() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(stream().handle_payload("not json", &tx));
        assert!(stream().handle_payload(r#"{"response":"mystery"}"#, &tx));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_queue_stops_the_stream() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let alive = stream().handle_payload(
            r#"{"response":"auth","uid":"U1","status":"ok"}"#,
            &tx,
        );
        assert!(!alive);
    }
}
