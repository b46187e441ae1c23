//! Offline provisioning tools for the secrets file.
//!
//! `hash` walks the usernames already present in the secrets file, asks for
//! a new password for each, and rewrites the file with fresh hashes and a
//! newly generated signing key. `verify` checks a single username/password
//! pair against the stored hashes, telling a wrong password apart from a
//! malformed hash.

use crate::auth::{config, verifier};
use crate::cli::actions::Action;
use crate::errors::Error;
use anyhow::{anyhow, bail, Context, Result};
use rand::{distributions::Alphanumeric, Rng};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

const KEY_LENGTH: usize = 43;

/// Handle the provisioning actions
pub fn handle(action: Action) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    match action {
        Action::HashPasswords { secrets } => hash_passwords(&secrets, &mut input),
        Action::VerifyPassword { secrets, username } => {
            verify_password(&secrets, &username, &mut input)
        }
        Action::Server { .. } => Err(anyhow!("not a provisioning action")),
    }
}

fn hash_passwords(secrets: &Path, input: &mut impl BufRead) -> Result<()> {
    let existing = config::load_file(secrets)
        .with_context(|| format!("Failed to load {}", secrets.display()))?;

    println!("Users found in {} (in order):", secrets.display());
    for username in existing.usernames() {
        println!(" - {username}");
    }
    println!("\nEnter a new password per user, or press ENTER to skip that user.");

    let mut names = Vec::new();
    let mut usernames = Vec::new();
    let mut passwords = Vec::new();

    for (username, name) in existing.usernames().iter().zip(existing.names()) {
        let password = prompt(&format!("Password for '{username}': "), input)?;

        if password.is_empty() {
            println!("Skipping '{username}' (empty password).");
            continue;
        }

        passwords.push(verifier::hash(&password)?);
        usernames.push(username.clone());
        names.push(name.clone());
    }

    if passwords.is_empty() {
        bail!("no passwords entered, leaving {} untouched", secrets.display());
    }

    let key: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect();

    let updated = config::CredentialSet::new(
        names,
        usernames,
        passwords,
        existing.cookie_name().to_string(),
        key,
        existing.cookie_expiry_days(),
    )?;

    println!("\nSummary:");
    println!(" - users kept: {}", updated.len());
    println!(" - signing key: regenerated");

    let confirm = prompt(
        &format!("Overwrite {} with these values? (y/N): ", secrets.display()),
        input,
    )?;
    if !confirm.eq_ignore_ascii_case("y") {
        bail!("aborted, {} left untouched", secrets.display());
    }

    fs::write(secrets, updated.to_toml()?)
        .with_context(|| format!("Failed to write {}", secrets.display()))?;

    println!("Updated {}.", secrets.display());

    Ok(())
}

fn verify_password(secrets: &Path, username: &str, input: &mut impl BufRead) -> Result<()> {
    let credentials = config::load_file(secrets)
        .with_context(|| format!("Failed to load {}", secrets.display()))?;

    let Some(stored_hash) = credentials.hash_for(username) else {
        println!("Known users:");
        for known in credentials.usernames() {
            println!(" - {known}");
        }
        bail!("username '{username}' not found, check capitalization");
    };

    let password = prompt(&format!("Password for '{username}': "), input)?;

    match verifier::verify(&password, stored_hash) {
        Ok(()) => {
            println!("Password matches for '{username}'.");
            Ok(())
        }
        Err(Error::BadPassword) => {
            println!("Password does NOT match for '{username}'.");
            Ok(())
        }
        Err(Error::HashFormat) => Err(anyhow!(
            "stored hash for '{username}' is malformed, regenerate it with `consulta hash`"
        )),
        Err(e) => Err(e.into()),
    }
}

fn prompt(label: &str, input: &mut impl BufRead) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim().to_string())
}
