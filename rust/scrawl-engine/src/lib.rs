//! Scrawl Engine
//!
//! The embedded interpreter session and the serialized background worker
//! that evaluates submissions for the REPL controller.

pub mod session;
pub mod worker;

pub use session::{Session, SessionError};
pub use worker::SessionHandle;
