use thiserror::Error;

/// Everything that can go wrong between the credential store and a search.
///
/// The configuration variants are fatal at startup; the rest are reported at
/// the point of the triggering action and leave prior state untouched.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no credential source found, set CONSULTA_SECRETS or provide the secrets file")]
    ConfigMissing,
    #[error("invalid credential configuration: {0}")]
    ConfigParse(String),
    #[error("unknown user")]
    UnknownUser,
    #[error("wrong password")]
    BadPassword,
    #[error("malformed password hash")]
    HashFormat,
    #[error("hash error")]
    Hash,
    #[error("empty search term")]
    EmptyQuery,
    #[error("column {0} not present in the dataset")]
    UnknownColumn(String),
}
