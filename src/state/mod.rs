//! State management module.
//!
//! Contains the Matrix (shared server state), its domain managers and the
//! channel entity.

mod channel;
pub mod managers;
mod matrix;
mod uid;

pub use channel::Channel;
pub use managers::request::PendingRequest;
pub use managers::session::SessionHandle;
pub use matrix::{Matrix, MatrixConfig};
pub use uid::{SessionId, SessionIdGenerator};
