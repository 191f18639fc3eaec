//! The dispatch side of the relay and its seams.
//!
//! The dispatch loop itself is platform-agnostic: it consumes classified
//! messages from the event queue and talks to the world through two traits,
//! so the interactive console can be swapped for a script or a test double
//! without touching classification or transport code.

pub mod dispatch;

use async_trait::async_trait;

use crate::domain::InboundMessage;
use crate::error::Result;

pub use dispatch::{Dispatcher, EXIT_COMMAND};

/// How a dispatch loop run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEnd {
    /// The event queue closed and every queued message was processed.
    Drained,
    /// The operator left with the exit command.
    OperatorExit,
}

/// Presentation and input surface for the operator working the queue.
#[async_trait]
pub trait OperatorConsole: Send {
    /// Show an informational message that never takes a reply.
    fn show_system(&mut self, message: &InboundMessage);

    /// Show the details card for an actionable message.
    fn show_message(&mut self, message: &InboundMessage);

    /// Short status line about the current message (skipped, sent, failed).
    fn notify(&mut self, note: &str);

    /// Wait for the operator to acknowledge a message that cannot be
    /// replied to.
    async fn acknowledge(&mut self) -> Result<()>;

    /// Read raw reply input for the current message. `None` means input was
    /// closed.
    async fn read_reply(&mut self) -> Result<Option<String>>;
}

/// Outbound reply submission.
#[async_trait]
pub trait ReplyGateway: Send + Sync {
    async fn send_text(&self, recipient_uid: &str, content: &str) -> Result<()>;
}
