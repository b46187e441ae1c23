//! Password hashing and verification.
//!
//! Hashes use the PHC string format, so the salt and cost parameters travel
//! inside the hash itself and verification takes no extra parameters. The
//! comparison is constant-time inside the primitive; callers never compare
//! hash strings themselves.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::Error;

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
/// Returns [`Error::Hash`] when hashing fails.
pub fn hash(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| Error::Hash)
}

/// Check a plaintext password against a stored PHC hash.
///
/// A malformed stored hash is reported as [`Error::HashFormat`], distinct
/// from [`Error::BadPassword`], so operators can tell a provisioning bug
/// from a typo.
///
/// # Errors
/// [`Error::HashFormat`] or [`Error::BadPassword`].
pub fn verify(password: &str, stored_hash: &str) -> Result<(), Error> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| Error::HashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| Error::BadPassword)
}
