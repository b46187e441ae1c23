//! Credential store loader.
//!
//! Secrets come from exactly one of two sources, in this order:
//!
//! 1. the `CONSULTA_SECRETS` environment variable, holding a full TOML
//!    document with an `[auth]` table;
//! 2. a local TOML secrets file (default `secrets.toml`).
//!
//! A present but broken environment document never falls through to the
//! file: loading fails closed with [`Error::ConfigParse`] so a bad rotation
//! cannot silently revive stale credentials.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::errors::Error;

/// Environment variable checked before the secrets file.
pub const SECRETS_ENV: &str = "CONSULTA_SECRETS";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct SecretsDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<AuthTable>,
}

/// Wire shape of the `[auth]` table, index-aligned lists.
#[derive(Debug, Serialize, Deserialize)]
struct AuthTable {
    names: Vec<String>,
    usernames: Vec<String>,
    passwords: Vec<String>,
    cookie_name: String,
    key: String,
    cookie_expiry_days: u64,
}

/// Validated, immutable credential set for the process lifetime.
///
/// `usernames`, `names`, and `passwords` stay index-aligned; usernames are
/// case-sensitive and unique. The signing key is wrapped in a
/// [`SecretString`] so it never shows up in debug output.
#[derive(Debug, Clone)]
pub struct CredentialSet {
    names: Vec<String>,
    usernames: Vec<String>,
    passwords: Vec<String>,
    cookie_name: String,
    key: SecretString,
    cookie_expiry_days: u64,
}

impl CredentialSet {
    /// Build a credential set, enforcing the alignment invariants.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] when the lists are misaligned, a
    /// username is empty or duplicated, or the expiry is zero.
    pub fn new(
        names: Vec<String>,
        usernames: Vec<String>,
        passwords: Vec<String>,
        cookie_name: String,
        key: String,
        cookie_expiry_days: u64,
    ) -> Result<Self, Error> {
        if usernames.len() != passwords.len() || usernames.len() != names.len() {
            return Err(Error::ConfigParse(format!(
                "auth lists are misaligned: {} names, {} usernames, {} passwords",
                names.len(),
                usernames.len(),
                passwords.len()
            )));
        }

        let mut seen = HashSet::new();
        for username in &usernames {
            if username.is_empty() {
                return Err(Error::ConfigParse("empty username".to_string()));
            }
            if !seen.insert(username.as_str()) {
                return Err(Error::ConfigParse(format!("duplicate username: {username}")));
            }
        }

        if cookie_expiry_days == 0 {
            return Err(Error::ConfigParse(
                "cookie_expiry_days must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            names,
            usernames,
            passwords,
            cookie_name,
            key: SecretString::from(key),
            cookie_expiry_days,
        })
    }

    /// Stored hash for a username, `None` when the user is unknown.
    #[must_use]
    pub fn hash_for(&self, username: &str) -> Option<&str> {
        self.usernames
            .iter()
            .position(|u| u == username)
            .map(|idx| self.passwords[idx].as_str())
    }

    /// Display name for a username.
    #[must_use]
    pub fn name_for(&self, username: &str) -> Option<&str> {
        self.usernames
            .iter()
            .position(|u| u == username)
            .map(|idx| self.names[idx].as_str())
    }

    #[must_use]
    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub fn cookie_expiry_days(&self) -> u64 {
        self.cookie_expiry_days
    }

    /// Session lifetime derived from the cookie expiry.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.cookie_expiry_days * SECONDS_PER_DAY)
    }

    #[must_use]
    pub fn signing_key(&self) -> &SecretString {
        &self.key
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }

    /// Serialize back into the secrets document shape used by the
    /// provisioning tools.
    ///
    /// # Errors
    /// Returns [`Error::ConfigParse`] when TOML serialization fails.
    pub fn to_toml(&self) -> Result<String, Error> {
        let document = SecretsDocument {
            auth: Some(AuthTable {
                names: self.names.clone(),
                usernames: self.usernames.clone(),
                passwords: self.passwords.clone(),
                cookie_name: self.cookie_name.clone(),
                key: self.key.expose_secret().to_string(),
                cookie_expiry_days: self.cookie_expiry_days,
            }),
        };

        toml::to_string_pretty(&document).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

impl TryFrom<AuthTable> for CredentialSet {
    type Error = Error;

    fn try_from(table: AuthTable) -> Result<Self, Error> {
        Self::new(
            table.names,
            table.usernames,
            table.passwords,
            table.cookie_name,
            table.key,
            table.cookie_expiry_days,
        )
    }
}

/// Resolve the credential set from the environment or the secrets file.
///
/// # Errors
/// - [`Error::ConfigParse`] when a present source is malformed (the
///   environment source never falls through to the file);
/// - [`Error::ConfigMissing`] when neither source is present.
pub fn load(secrets_file: &Path) -> Result<CredentialSet, Error> {
    if let Ok(raw) = env::var(SECRETS_ENV) {
        if !raw.trim().is_empty() {
            debug!("loading credentials from {SECRETS_ENV}");
            return parse_document(&raw);
        }
    }

    if secrets_file.exists() {
        debug!("loading credentials from {}", secrets_file.display());
        let raw =
            fs::read_to_string(secrets_file).map_err(|e| Error::ConfigParse(e.to_string()))?;
        return parse_document(&raw);
    }

    Err(Error::ConfigMissing)
}

/// Load the credential set from the secrets file only, skipping the
/// environment. Used by the offline provisioning tools, which operate on
/// the file itself.
///
/// # Errors
/// [`Error::ConfigMissing`] when the file does not exist,
/// [`Error::ConfigParse`] when it is malformed.
pub fn load_file(secrets_file: &Path) -> Result<CredentialSet, Error> {
    if !secrets_file.exists() {
        return Err(Error::ConfigMissing);
    }

    let raw = fs::read_to_string(secrets_file).map_err(|e| Error::ConfigParse(e.to_string()))?;
    parse_document(&raw)
}

fn parse_document(raw: &str) -> Result<CredentialSet, Error> {
    let document: SecretsDocument =
        toml::from_str(raw).map_err(|e| Error::ConfigParse(e.to_string()))?;

    let table = document
        .auth
        .ok_or_else(|| Error::ConfigParse("missing [auth] table".to_string()))?;

    CredentialSet::try_from(table)
}
