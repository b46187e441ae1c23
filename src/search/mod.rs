//! Query normalization and record matching.
//!
//! A search mode picks exactly one target column and one comparison
//! strategy. Digit-bearing lookups (CNPJ, internal code) compare
//! digits-only on both sides so punctuation never affects matching; name
//! lookups use case-insensitive substring containment. Matching reads the
//! dataset and returns row indices in original order, it never mutates it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::dataset::{Cell, Dataset};
use crate::errors::Error;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").expect("valid regex"));

/// Strip every character that is not a decimal digit. Comparison-only;
/// display values keep their punctuation.
#[must_use]
pub fn only_digits(s: &str) -> String {
    NON_DIGITS.replace_all(s, "").into_owned()
}

/// What the user is searching by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Name,
    TaxId,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    CaseInsensitive,
    DigitsOnly,
}

impl SearchMode {
    /// Target column for this mode.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "RAZAO_SOCIAL",
            Self::TaxId => "CNPJ",
            Self::Code => "COD_JC",
        }
    }

    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::Name => Strategy::CaseInsensitive,
            Self::TaxId | Self::Code => Strategy::DigitsOnly,
        }
    }
}

/// A raw search submission.
#[derive(Debug, Clone)]
pub struct Query {
    pub mode: SearchMode,
    pub term: String,
}

/// A query after trimming and per-strategy normalization of the term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub column: &'static str,
    pub strategy: Strategy,
    pub needle: String,
}

/// Map a query to its target column, strategy, and normalized needle.
///
/// # Errors
/// [`Error::EmptyQuery`] when the trimmed term is empty.
pub fn normalize(query: &Query) -> Result<NormalizedQuery, Error> {
    let term = query.term.trim();

    if term.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let strategy = query.mode.strategy();
    let needle = match strategy {
        Strategy::DigitsOnly => only_digits(term),
        Strategy::CaseInsensitive => term.to_lowercase(),
    };

    Ok(NormalizedQuery {
        column: query.mode.column(),
        strategy,
        needle,
    })
}

/// Filter the dataset by the query, preserving row order.
///
/// Rows with a missing value in the target column never match. Returns
/// indices into `dataset.rows()`.
///
/// # Errors
/// [`Error::EmptyQuery`] before any matching, or [`Error::UnknownColumn`]
/// when the configured column is absent from the dataset (a data/config
/// mismatch, not "no results").
pub fn search(dataset: &Dataset, query: &Query) -> Result<Vec<usize>, Error> {
    let normalized = normalize(query)?;

    let column = dataset
        .column_index(normalized.column)
        .ok_or_else(|| Error::UnknownColumn(normalized.column.to_string()))?;

    let matches = dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| cell_matches(&row[column], normalized.strategy, &normalized.needle))
        .map(|(index, _)| index)
        .collect();

    Ok(matches)
}

fn cell_matches(cell: &Cell, strategy: Strategy, needle: &str) -> bool {
    if cell.is_empty() {
        return false;
    }

    let text = cell.display();

    match strategy {
        Strategy::DigitsOnly => only_digits(&text).contains(needle),
        Strategy::CaseInsensitive => text.to_lowercase().contains(needle),
    }
}
