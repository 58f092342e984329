//! ARFF dataset loading.
//!
//! Supports the header directives `@relation`, `@attribute` and `@data`,
//! `%` comment lines, `?` for missing cells and single- or double-quoted
//! names and values. Attribute types are read from the declaration:
//!
//! | Declaration                         | Type          |
//! |-------------------------------------|---------------|
//! | `numeric`, `real`, `integer`        | numeric       |
//! | `{0,1}`                             | boolean       |
//! | `{...}` whose first member is a UUID | identifier   |
//! | `{...}` whose first member is a timestamp | date    |
//! | any other `{...}`, `string`         | categorical   |
//! | `date`                              | date          |

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use subgroupforge_core::{Attribute, AttributeType, Dataset, Result, SubgroupError};
use tracing::{info, warn};

/// Options applied while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Attributes dropped at load time.
    pub blacklist: Vec<String>,
}

impl LoadOptions {
    pub fn with_blacklist<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist.extend(attributes.into_iter().map(Into::into));
        self
    }
}

/// Reads and parses an ARFF file.
pub fn load_arff_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Dataset> {
    let text = fs::read_to_string(path.as_ref())?;
    load_arff_str(&text, options)
}

/// Parses ARFF text.
pub fn load_arff_str(text: &str, options: &LoadOptions) -> Result<Dataset> {
    let blacklist: HashSet<&str> = options.blacklist.iter().map(String::as_str).collect();
    let mut relation = String::new();
    let mut columns: Vec<Column> = Vec::new();
    let mut in_data = false;
    let mut rows = 0usize;
    let mut last_line = 0;

    for (number, line) in text.lines().enumerate() {
        let line_no = number + 1;
        last_line = line_no;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if in_data {
            parse_row(line, line_no, &mut columns)?;
            rows += 1;
            continue;
        }

        let (directive, rest) = split_directive(line);
        match directive.to_ascii_lowercase().as_str() {
            "@relation" => relation = strip_quotes(rest).to_string(),
            "@attribute" => {
                let (name, kind) = parse_declaration(rest, line_no)?;
                if columns.iter().any(|c| c.name == name) {
                    return Err(parse_error(line_no, format!("duplicate attribute `{name}`")));
                }
                let keep = !blacklist.contains(name.as_str());
                columns.push(Column {
                    name,
                    kind,
                    keep,
                    cells: Vec::new(),
                });
            }
            "@data" => {
                if columns.is_empty() {
                    return Err(parse_error(line_no, "@data before any @attribute"));
                }
                in_data = true;
            }
            _ => return Err(parse_error(line_no, format!("unexpected header line `{line}`"))),
        }
    }

    if !in_data {
        return Err(parse_error(last_line, "missing @data section"));
    }

    for name in &options.blacklist {
        if !columns.iter().any(|c| &c.name == name) {
            warn!(event = "blacklist_unknown", attribute = name.as_str());
        }
    }

    let attributes = columns
        .into_iter()
        .filter(|c| c.keep)
        .map(|c| Attribute::new(c.name, c.kind, c.cells))
        .collect::<Result<Vec<_>>>()?;

    info!(
        event = "dataset_loaded",
        relation = relation.as_str(),
        attributes = attributes.len(),
        rows,
    );
    Dataset::new(relation, attributes)
}

struct Column {
    name: String,
    kind: AttributeType,
    keep: bool,
    cells: Vec<subgroupforge_core::AttributeValue>,
}

fn parse_error(line: usize, message: impl Into<String>) -> SubgroupError {
    SubgroupError::Parse {
        line,
        message: message.into(),
    }
}

fn split_directive(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(at) => (&line[..at], line[at..].trim()),
        None => (line, ""),
    }
}

fn strip_quotes(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(raw)
}

/// Splits `name type` where the name may be quoted and contain spaces.
fn parse_declaration(rest: &str, line: usize) -> Result<(String, AttributeType)> {
    let (name, body) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let close = rest[1..]
                .find(quote)
                .ok_or_else(|| parse_error(line, "unterminated attribute name"))?;
            (&rest[1..=close], rest[close + 2..].trim())
        }
        Some(_) => split_directive(rest),
        None => return Err(parse_error(line, "attribute without a name")),
    };
    if body.is_empty() {
        return Err(parse_error(line, format!("attribute `{name}` has no type")));
    }
    let kind = detect_type(body).ok_or_else(|| {
        parse_error(line, format!("unsupported type `{body}` for attribute `{name}`"))
    })?;
    Ok((name.to_string(), kind))
}

fn detect_type(body: &str) -> Option<AttributeType> {
    if let Some(set) = body.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        let members: Vec<&str> = split_cells(set).into_iter().map(strip_quotes).collect();
        let mut sorted = members.clone();
        sorted.sort_unstable();
        if sorted == ["0", "1"] {
            return Some(AttributeType::Boolean);
        }
        let first = members.first().copied().unwrap_or("");
        if AttributeType::Identifier.parse_value(first).is_ok() {
            return Some(AttributeType::Identifier);
        }
        if AttributeType::Date.parse_value(first).is_ok() {
            return Some(AttributeType::Date);
        }
        return Some(AttributeType::Categorical);
    }

    let keyword = body.split_whitespace().next().unwrap_or("");
    match keyword.to_ascii_lowercase().as_str() {
        "numeric" | "real" | "integer" => Some(AttributeType::Numeric),
        "string" => Some(AttributeType::Categorical),
        "date" => Some(AttributeType::Date),
        _ => None,
    }
}

/// Splits on commas outside of quotes.
fn split_cells(line: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (at, ch) in line.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(open), _) if open == ch => quote = None,
            (None, ',') => {
                cells.push(line[start..at].trim());
                start = at + 1;
            }
            _ => {}
        }
    }
    cells.push(line[start..].trim());
    cells
}

fn parse_row(line: &str, line_no: usize, columns: &mut [Column]) -> Result<()> {
    let cells = split_cells(line);
    if cells.len() != columns.len() {
        return Err(parse_error(
            line_no,
            format!("expected {} values, found {}", columns.len(), cells.len()),
        ));
    }
    for (column, cell) in columns.iter_mut().zip(cells) {
        if !column.keep {
            continue;
        }
        let value = column.kind.parse_value(cell).map_err(|reason| {
            parse_error(
                line_no,
                format!("invalid value `{cell}` for attribute `{}`: {reason}", column.name),
            )
        })?;
        column.cells.push(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
