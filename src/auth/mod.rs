//! Credential store, password verification, and session state.

pub mod config;
pub mod session;
pub mod verifier;

pub use self::config::{load, CredentialSet};
pub use self::session::{Session, SessionStore};
