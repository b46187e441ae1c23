pub mod provision;
pub mod server;

use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    /// Serve the lookup API.
    Server {
        port: u16,
        secrets: PathBuf,
        dataset: PathBuf,
    },
    /// Regenerate password hashes and the signing key in the secrets file.
    HashPasswords { secrets: PathBuf },
    /// Check one username/password pair against the secrets file.
    VerifyPassword { secrets: PathBuf, username: String },
}
