//! Pinduoduo merchant gateway protocol.
//!
//! Everything specific to the gateway's wire formats lives here: the
//! retrying HTTP client, the session setup exchanges, the chat stream, the
//! payload classifier, and reply submission.

pub mod classify;
pub mod client;
pub mod send;
pub mod session;
pub mod stream;

pub use classify::{classify, Classification};
pub use client::{HttpExchange, RequestClient, ReqwestExchange};
pub use send::ReplySender;
pub use stream::ChatStream;
