//! Command handlers.
//!
//! Each authenticated line is parsed into an [`emcom_proto::Command`] and
//! dispatched by the [`Registry`] to the handler registered for it.
//! Handlers queue reply lines on the [`Context`]; deliveries to other
//! sessions go through the session directory and never block the caller.

mod account;
mod channel;
mod core;
mod emergency;
mod messaging;
mod request;
mod session;

pub use self::core::{Context, Handler, Registry, SessionState};
