//! Domain managers for server state.
//!
//! Each manager owns one domain of the server's shared state. They are
//! built once at startup, held by the [`Matrix`](crate::state::Matrix), and
//! reached by every session task through it.

pub mod channel;
pub mod credential;
pub mod request;
pub mod session;
