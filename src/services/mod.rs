//! Domain services behind the session store's public contract.
//!
//! ARCHITECTURE
//! ============
//! `directory` and `profile` are injectable ports over the (mock) backend;
//! `session` composes them into the single store UI layers talk to.

pub mod directory;
pub mod profile;
pub mod session;
