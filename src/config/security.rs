//! Security configuration.

use serde::Deserialize;

/// Password storage and account creation policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Store secrets of newly created users as Argon2 PHC strings
    /// (default: false, stored verbatim). Verification accepts both forms.
    #[serde(default)]
    pub hash_new_passwords: bool,
    /// Minimum role level allowed to run `criar_user` (default: 0).
    #[serde(default)]
    pub user_creation_min_level: u8,
}
