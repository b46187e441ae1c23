use crate::cli::actions::Action;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Turn parsed arguments into an [`Action`].
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let secrets = matches
        .get_one::<String>("secrets")
        .map(PathBuf::from)
        .context("missing required argument: --secrets")?;

    match matches.subcommand() {
        Some(("hash", _)) => Ok(Action::HashPasswords { secrets }),

        Some(("verify", sub)) => Ok(Action::VerifyPassword {
            secrets,
            username: sub
                .get_one::<String>("username")
                .cloned()
                .context("missing required argument: username")?,
        }),

        _ => Ok(Action::Server {
            port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
            secrets,
            dataset: matches
                .get_one::<String>("dataset")
                .map(PathBuf::from)
                .context("missing required argument: --dataset")?,
        }),
    }
}
