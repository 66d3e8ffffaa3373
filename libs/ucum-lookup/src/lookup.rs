use crate::error::Result;
use crate::source::TableSource;
use std::collections::HashMap;

/// Immutable two-way string mapping merged from ordered table sources.
///
/// Later sources overwrite earlier ones on key collision, in both
/// directions. After construction the table is never mutated, so it can be
/// shared across threads without locking.
#[derive(Clone, Debug, Default)]
pub struct BidirectionalLookup {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl BidirectionalLookup {
    pub fn from_sources(sources: &[&dyn TableSource]) -> Result<Self> {
        let mut table = Self::default();
        for source in sources {
            let entries = source.entries()?;
            tracing::debug!(
                source = source.name(),
                entries = entries.len(),
                "merging table source"
            );
            for (key, value) in entries {
                table.insert(key, value);
            }
        }
        Ok(table)
    }

    /// Build directly from pairs; later pairs win, same as source merging.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (key, value) in pairs {
            table.insert(key.into(), value.into());
        }
        table
    }

    fn insert(&mut self, key: String, value: String) {
        if let Some(prev) = self.forward.insert(key.clone(), value.clone()) {
            // Drop the stale reverse entry unless another key reclaimed it.
            if self.reverse.get(&prev).is_some_and(|k| *k == key) {
                self.reverse.remove(&prev);
            }
        }
        self.reverse.insert(value, key);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.forward.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.forward.get(key).map(String::as_str)
    }

    /// Reverse lookup. When several keys share a value, the last-merged key
    /// wins, mirroring the forward precedence rule.
    pub fn get_reverse(&self, value: &str) -> Option<&str> {
        self.reverse.get(value).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EmbeddedTable;

    #[test]
    fn forward_and_reverse_lookup() {
        let table = BidirectionalLookup::from_pairs([("mg", "milligram"), ("g", "gram")]);
        assert!(table.contains_key("mg"));
        assert_eq!(table.get("mg"), Some("milligram"));
        assert_eq!(table.get_reverse("gram"), Some("g"));
        assert_eq!(table.get("milligram"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn later_source_wins_on_collision() {
        let generated = EmbeddedTable::new("generated", r#"{"IU": "U/L", "cc": "mL"}"#);
        let curated = EmbeddedTable::new("curated", r#"{"IU": "[iU]"}"#);
        let table = BidirectionalLookup::from_sources(&[&generated, &curated]).unwrap();

        assert_eq!(table.get("IU"), Some("[iU]"));
        assert_eq!(table.get("cc"), Some("mL"));
        // The overwritten pair must not linger in the reverse direction.
        assert_eq!(table.get_reverse("U/L"), None);
        assert_eq!(table.get_reverse("[iU]"), Some("IU"));
    }

    #[test]
    fn shared_value_keeps_last_key_in_reverse() {
        let table = BidirectionalLookup::from_pairs([("sec", "s"), ("secs", "s")]);
        assert_eq!(table.get("sec"), Some("s"));
        assert_eq!(table.get("secs"), Some("s"));
        assert_eq!(table.get_reverse("s"), Some("secs"));
    }

    #[test]
    fn load_error_propagates_from_source() {
        let bad = EmbeddedTable::new("bad", "[]");
        assert!(BidirectionalLookup::from_sources(&[&bad]).is_err());
    }
}
