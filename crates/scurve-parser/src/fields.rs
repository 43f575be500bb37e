//! Cell-level parsers for dates, durations and predecessor references

use chrono::NaiveDate;
use scurve_core::{Predecessor, RelationType};

/// Parse a schedule date such as `"Seg 04/03/24"` or `"04/03/2024"`.
///
/// Leading tokens that do not start with a digit (weekday abbreviations) are
/// skipped; the first numeric token is read as `day/month/year` with a 2- or
/// 4-digit year. Anything after that token (a time of day) is ignored.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let token = text
        .split_whitespace()
        .find(|tok| tok.starts_with(|c: char| c.is_ascii_digit()))?;

    let year = token.rsplit('/').next()?;
    let format = match year.len() {
        2 => "%d/%m/%y",
        4 => "%d/%m/%Y",
        _ => return None,
    };
    NaiveDate::parse_from_str(token, format).ok()
}

/// Outcome of reading a free-text duration cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationCell {
    /// Leading integer token, e.g. `"10 dias"` -> 10
    Days(i64),
    /// Blank cell
    Empty,
    /// Leading token is not a non-negative integer
    Invalid,
}

/// Read the leading integer token of a duration cell
pub fn parse_duration(text: &str) -> DurationCell {
    let Some(first) = text.split_whitespace().next() else {
        return DurationCell::Empty;
    };
    match first.parse::<i64>() {
        Ok(days) if days >= 0 => DurationCell::Days(days),
        _ => DurationCell::Invalid,
    }
}

/// Strip a leading two-letter relationship code from a predecessor id.
///
/// The code is only removed when an id remains after it, so a task literally
/// named `"SS"` is left alone.
pub fn strip_relation_prefix(segment: &str) -> (&str, RelationType) {
    let segment = segment.trim();
    for (prefix, relation) in RelationType::PREFIXES {
        if let Some(rest) = segment.strip_prefix(prefix) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return (rest, relation);
            }
        }
    }
    (segment, RelationType::default())
}

/// Split a predecessor cell into cleaned references.
///
/// Entries are separated by `;`. Each entry is cut at its first `-` (lag
/// suffixes such as `"3FS-2 dias"`), then the relation prefix is stripped.
/// Entries that end up empty are dropped.
pub fn parse_predecessors(text: &str) -> Vec<Predecessor> {
    text.split(';')
        .filter_map(|entry| {
            let head = entry.split('-').next().unwrap_or_default();
            let (id, relation) = strip_relation_prefix(head);
            (!id.is_empty()).then(|| Predecessor::new(id).with_relation(relation))
        })
        .collect()
}
