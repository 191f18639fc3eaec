//! Single-consumer dispatch loop.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use super::{DispatchEnd, OperatorConsole, ReplyGateway};
use crate::domain::InboundMessage;
use crate::error::Result;

/// Reserved operator command that shuts the loop down.
pub const EXIT_COMMAND: &str = "/exit";

/// Drains the event queue in arrival order, one message at a time.
///
/// The loop is deliberately sequential: it never looks at the next message
/// while a reply prompt or submission for the current one is outstanding.
/// The operator is the bottleneck here, not the queue.
pub struct Dispatcher<C, G> {
    console: C,
    gateway: G,
}

impl<C: OperatorConsole, G: ReplyGateway> Dispatcher<C, G> {
    pub fn new(console: C, gateway: G) -> Self {
        Self { console, gateway }
    }

    /// The console this dispatcher presents through.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Run until the queue closes or the operator exits.
    ///
    /// A failed reply submission is reported and the loop moves on; nothing
    /// that happens to a single message takes the loop down.
    pub async fn run(
        &mut self,
        events: &mut UnboundedReceiver<InboundMessage>,
    ) -> Result<DispatchEnd> {
        while let Some(message) = events.recv().await {
            if message.context.is_informational() {
                self.console.show_system(&message);
                continue;
            }

            self.console.show_message(&message);

            if !message.context.is_reply_eligible() {
                self.console.acknowledge().await?;
                continue;
            }

            let Some(reply) = self.console.read_reply().await? else {
                continue;
            };
            let reply = reply.trim();

            if reply.eq_ignore_ascii_case(EXIT_COMMAND) {
                info!("operator exit requested");
                return Ok(DispatchEnd::OperatorExit);
            }
            if reply.is_empty() {
                self.console.notify("skipped");
                continue;
            }

            match self.gateway.send_text(&message.sender_uid, reply).await {
                Ok(()) => self.console.notify("reply sent"),
                Err(error) => {
                    warn!(error = %error, recipient = %message.sender_uid, "reply failed");
                    self.console.notify(&format!("reply failed: {error}"));
                }
            }
        }

        Ok(DispatchEnd::Drained)
    }
}
