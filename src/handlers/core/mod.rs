//! Core handler infrastructure: the per-command context, the `Handler`
//! trait and the registry that dispatches parsed lines.

pub mod context;
pub mod registry;

pub use context::{Context, Handler, SessionState};
pub use registry::Registry;
