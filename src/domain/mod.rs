//! Platform-agnostic types: sessions, cookies, classified chat events.

pub mod cookies;
pub mod event;
pub mod session;

pub use cookies::CookieJar;
pub use event::{ContextType, InboundMessage};
pub use session::{Account, Shop};
