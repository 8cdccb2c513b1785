//! Password hashing and verification utilities.
//!
//! User records either carry the secret verbatim or an Argon2 PHC string.
//! Verification recognises the PHC prefix and falls back to an exact
//! comparison for everything else.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

const PHC_PREFIX: &str = "$argon2";

/// Check `password` against a stored secret (hashed or verbatim).
pub fn verify_secret(password: &str, stored: &str) -> bool {
    if stored.starts_with(PHC_PREFIX) {
        match PasswordHash::new(stored) {
            Ok(hash) => Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored Argon2 hash is malformed");
                false
            }
        }
    } else {
        stored == password
    }
}

/// Hash a password using default Argon2 settings.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
