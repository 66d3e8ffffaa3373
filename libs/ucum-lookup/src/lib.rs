#![forbid(unsafe_code)]

//! Normalization of free-text unit-of-measure strings to UCUM codes.
//!
//! Two immutable lookup tables (canonical code → display unit, synonym →
//! canonical code) back a layered fallback chain of textual repairs; see
//! [`CodeResolver`]. Inputs that stay unresolved degrade to themselves and
//! are collected in an insertion-ordered invalid-code log.

mod error;
mod invalid;
mod lookup;
mod resolver;
mod source;

use once_cell::sync::Lazy;

pub use error::{Error, Result};
pub use invalid::InvalidCodeLog;
pub use lookup::BidirectionalLookup;
pub use resolver::CodeResolver;
pub use source::{EmbeddedTable, JsonTableFile, TableSource};

/// Canonical UCUM code → display unit.
pub const UCUM_DISPLAY_TABLE: EmbeddedTable = EmbeddedTable::new(
    "ucum-display",
    include_str!("../resources/ucum-display.json"),
);

/// Automatically generated synonym → canonical code table.
pub const GENERATED_SYNONYM_TABLE: EmbeddedTable = EmbeddedTable::new(
    "synonyms-generated",
    include_str!("../resources/synonyms-generated.json"),
);

/// Manually curated synonym → canonical code table. Loaded after the
/// generated table and overriding it on key collision.
pub const CURATED_SYNONYM_TABLE: EmbeddedTable = EmbeddedTable::new(
    "synonyms-curated",
    include_str!("../resources/synonyms-curated.json"),
);

static DEFAULT_RESOLVER: Lazy<CodeResolver> =
    Lazy::new(|| resolver_from_embedded_tables().expect("failed to load embedded unit tables"));

fn resolver_from_embedded_tables() -> Result<CodeResolver> {
    let codes = BidirectionalLookup::from_sources(&[&UCUM_DISPLAY_TABLE])?;
    let synonyms =
        BidirectionalLookup::from_sources(&[&GENERATED_SYNONYM_TABLE, &CURATED_SYNONYM_TABLE])?;
    Ok(CodeResolver::new(codes, synonyms))
}

/// Process-wide resolver over the embedded tables, built once on first use.
/// Prefer constructing a [`CodeResolver`] explicitly when the tables come
/// from elsewhere.
pub fn default_resolver() -> &'static CodeResolver {
    &DEFAULT_RESOLVER
}
