//! # Consulta
//!
//! Credential-gated lookup over a fixed customer dataset.
//!
//! Staff authenticate with a username/password pair checked against a
//! provisioned secrets document (environment variable or local TOML file),
//! then search the in-memory dataset by legal name, CNPJ, or internal code.
//! Results are reshaped into fixed display sections; the source dataset is
//! never mutated.
//!
//! The crate ships one binary, `consulta`, which serves the HTTP surface by
//! default and carries the offline provisioning subcommands (`hash`,
//! `verify`) used to maintain the secrets file.

pub mod auth;
pub mod cli;
pub mod consulta;
pub mod dataset;
pub mod display;
pub mod errors;
pub mod search;

pub use errors::Error;
