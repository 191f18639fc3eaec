//! shopdesk - real-time customer-service relay for a merchant chat platform.
//!
//! The binary authenticates an operator session against the merchant
//! gateway, opens a streaming connection for buyer messages, classifies
//! each payload into a typed event, and lets the operator answer through a
//! retrying request channel.
//!
//! # Architecture
//!
//! Data flows one way: session setup produces a token, the chat stream
//! turns wire payloads into [`domain::InboundMessage`] values, an unbounded
//! FIFO queue hands them to the single dispatch loop, and replies go back
//! out over the retrying HTTP client.
//!
//! - [`domain`] - sessions, cookies, and the closed set of message
//!   classifications
//! - [`relay`] - the dispatch loop and the trait seams it talks through
//! - [`adapter::pinduoduo`] - gateway wire formats: HTTP client, session
//!   setup, chat stream, classifier, reply submission
//! - [`adapter::console`] - interactive terminal front end
//! - [`store`] - in-memory account/shop registry
//! - [`config`] - TOML configuration and logging setup
//! - [`error`] - error taxonomy
//! - [`app`] - wiring for one relay run

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod relay;
pub mod store;
