//! Raw tabular input
//!
//! Spreadsheet tools export schedules as delimited text. Locales that use a
//! decimal comma export with `;` as the field separator, so the delimiter is
//! detected from the header line.

use std::path::Path;

use crate::ParseError;

/// Untyped table: one header row plus string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<H, S>(headers: impl IntoIterator<Item = H>, rows: Vec<Vec<S>>) -> Self
    where
        H: Into<String>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma or semicolon separated (.csv, .txt, anything else)
    Csv,
    /// Tab separated (.tsv)
    Tsv,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => FileFormat::Tsv,
        _ => FileFormat::Csv,
    }
}

fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Read delimited text into a raw table.
///
/// A UTF-8 byte-order mark is dropped and header cells are trimmed; ragged
/// rows are accepted (missing cells read as empty).
pub fn read_csv(content: &str, format: FileFormat) -> Result<RawTable, ParseError> {
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = match format {
        FileFormat::Tsv => b'\t',
        FileFormat::Csv => sniff_delimiter(content),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::NoHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Load a schedule table from disk
pub fn load_file(path: &Path) -> Result<RawTable, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_csv(&content, detect_format(path))
}
