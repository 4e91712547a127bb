//! Session log for foodprint
//!
//! Records who ran which command, plus free-form notes, in an append-only
//! JSON-lines file next to the catalog. This is the user-facing history;
//! diagnostics go through `tracing`.

mod entry;
mod logger;

pub use entry::{SessionAction, SessionEntry};
pub use logger::SessionLog;
