//! In-memory customer dataset.
//!
//! Rows hold typed cells against a column list that is normalized once at
//! load (trimmed, upper-cased) and never renamed again. The dataset is
//! immutable for the process lifetime; search and projection only ever read
//! from it.
//!
//! The CSV adapter below stands in for the spreadsheet reader, which is an
//! external collaborator as far as the core is concerned.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// A single cell. Identifier-like values with leading zeros stay [`Text`]
/// so their exact form survives to display.
///
/// [`Text`]: Cell::Text
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Plain string form: the original text, a number without a spurious
    /// trailing `.0`, or the empty string.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_number(*value),
            Self::Empty => String::new(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// The loaded table: normalized column names plus rows of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, normalizing column names and padding short rows
    /// with empty cells so every row matches the column list.
    #[must_use]
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let columns: Vec<String> = columns
            .iter()
            .map(|name| name.trim().to_uppercase())
            .collect();

        for row in &mut rows {
            row.resize(columns.len(), Cell::Empty);
        }

        Self { columns, rows }
    }

    /// Read a comma-separated file with a header row.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or has no header.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset at {}", path.display()))?;

        Self::from_csv(&raw)
            .with_context(|| format!("Failed to parse dataset at {}", path.display()))
    }

    /// Parse CSV text: first record is the header, quoted fields may hold
    /// commas, newlines, and doubled quotes.
    ///
    /// # Errors
    /// Returns an error when the header record is missing.
    pub fn from_csv(raw: &str) -> Result<Self> {
        let mut records = parse_records(raw).into_iter();

        let header = records.next().context("dataset has no header row")?;

        let rows = records
            .map(|fields| fields.iter().map(|field| type_cell(field)).collect())
            .collect();

        Ok(Self::new(header, rows))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.rows[row][column]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split CSV text into records of raw fields.
fn parse_records(raw: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                // Doubled quote is an escaped quote inside a quoted field.
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push(std::mem::take(&mut fields));
                }
                fields.clear();
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        if !(fields.len() == 1 && fields[0].is_empty()) {
            records.push(fields);
        }
    }

    records
}

fn type_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Cell::Empty;
    }

    if looks_numeric(trimmed) {
        if let Ok(value) = trimmed.parse::<f64>() {
            return Cell::Number(value);
        }
    }

    Cell::Text(trimmed.to_string())
}

/// Plain decimal with an optional sign and at most one dot. Leading-zero
/// strings stay text so codes like `00123` keep their exact form.
fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);

    if body.is_empty() {
        return false;
    }
    if body.len() > 1 && body.starts_with('0') && !body.starts_with("0.") {
        return false;
    }

    let mut dots = 0;
    for ch in body.chars() {
        match ch {
            '0'..='9' => {}
            '.' => dots += 1,
            _ => return false,
        }
    }

    dots <= 1 && body.chars().any(|ch| ch.is_ascii_digit())
}
