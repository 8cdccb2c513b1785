//! Security module for emcomd.
//!
//! Provides:
//! - **Policy**: which role levels may request, approve, broadcast or create users
//! - **Password**: Argon2 hashing with plaintext fallback for legacy records

pub mod password;
pub mod policy;

pub use password::{hash_password, verify_secret};
pub use policy::{Action, can_create_user, can_perform, can_send_emergency};
