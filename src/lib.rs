//! Authentication, session, and profile core for a small cross-platform
//! demo application.
//!
//! The session store owns "who is logged in", persists the session across
//! process restarts, and publishes changes for reactive UI layers. The
//! account directory and profile repository model the (mock) backend behind
//! injectable ports; `storage` provides the durable key-value slot.

pub mod account;
pub mod latency;
pub mod services;
pub mod storage;
