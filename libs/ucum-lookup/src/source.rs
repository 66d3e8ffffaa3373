//! Table sources for the unit lookup tables.
//!
//! A source yields ordered `(key, value)` string pairs parsed from a JSON
//! object. Entry order is preserved because it defines merge precedence when
//! several sources feed one [`crate::BidirectionalLookup`].

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub trait TableSource {
    fn name(&self) -> &str;

    /// Ordered string pairs, or a load error naming the source.
    fn entries(&self) -> Result<Vec<(String, String)>>;
}

/// A table compiled into the binary via `include_str!`.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedTable {
    name: &'static str,
    json: &'static str,
}

impl EmbeddedTable {
    pub const fn new(name: &'static str, json: &'static str) -> Self {
        Self { name, json }
    }
}

impl TableSource for EmbeddedTable {
    fn name(&self) -> &str {
        self.name
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        parse_entries(self.name, self.json)
    }
}

/// A table read from a JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonTableFile {
    path: PathBuf,
}

impl JsonTableFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for JsonTableFile {
    fn name(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        let raw = fs::read_to_string(&self.path).map_err(|source| Error::Io {
            name: self.name().to_string(),
            source,
        })?;
        parse_entries(self.name(), &raw)
    }
}

fn parse_entries(name: &str, raw: &str) -> Result<Vec<(String, String)>> {
    // Tables exported from spreadsheets often carry a UTF-8 BOM.
    let raw = raw.trim_start_matches('\u{feff}');

    let value: Value = serde_json::from_str(raw).map_err(|source| Error::Json {
        name: name.to_string(),
        source,
    })?;

    let Value::Object(map) = value else {
        return Err(Error::NotAnObject {
            name: name.to_string(),
        });
    };
    if map.is_empty() {
        // A missing table is configuration breakage, not an empty dataset.
        return Err(Error::EmptyTable {
            name: name.to_string(),
        });
    }

    map.into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            _ => Err(Error::NonStringValue {
                name: name.to_string(),
                key,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_object() {
        let table = EmbeddedTable::new("t", r#"{"mg": "milligram", "g": "gram"}"#);
        let entries = table.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                ("mg".to_string(), "milligram".to_string()),
                ("g".to_string(), "gram".to_string()),
            ]
        );
    }

    #[test]
    fn bom_is_tolerated() {
        let table = EmbeddedTable::new("t", "\u{feff}{\"mg\": \"milligram\"}");
        assert_eq!(table.entries().unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let table = EmbeddedTable::new("bad", "{ not json");
        assert!(matches!(table.entries(), Err(Error::Json { name, .. }) if name == "bad"));
    }

    #[test]
    fn non_object_document_is_rejected() {
        let table = EmbeddedTable::new("arr", r#"["mg", "g"]"#);
        assert!(matches!(table.entries(), Err(Error::NotAnObject { .. })));
    }

    #[test]
    fn non_string_value_is_rejected() {
        let table = EmbeddedTable::new("t", r#"{"mg": 1}"#);
        assert!(matches!(
            table.entries(),
            Err(Error::NonStringValue { key, .. }) if key == "mg"
        ));
    }

    #[test]
    fn empty_object_is_rejected() {
        let table = EmbeddedTable::new("t", "{}");
        assert!(matches!(table.entries(), Err(Error::EmptyTable { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = JsonTableFile::new("/nonexistent/unitref/table.json");
        assert!(matches!(source.entries(), Err(Error::Io { .. })));
    }
}
