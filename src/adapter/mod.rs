//! Concrete edges of the relay: the terminal console and the Pinduoduo
//! gateway protocol.

pub mod console;
pub mod pinduoduo;
