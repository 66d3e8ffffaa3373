//! The fallback/repair chain that turns free-text unit strings into UCUM
//! codes.
//!
//! Raw unit strings from heterogeneous sources are malformed in a small,
//! enumerable set of ways (encoding artifacts, locale degree notation, stray
//! whitespace). Instead of fuzzy matching, a fixed ordered sequence of cheap
//! textual repairs is applied, re-checking the tables after each step and
//! stopping at the first hit. Inputs that survive every repair unresolved are
//! returned unchanged and recorded in the [`InvalidCodeLog`].

use crate::invalid::InvalidCodeLog;
use crate::lookup::BidirectionalLookup;

pub struct CodeResolver {
    codes: BidirectionalLookup,
    synonyms: BidirectionalLookup,
    invalid: InvalidCodeLog,
}

impl CodeResolver {
    /// Build a resolver over a canonical-code→display table and a
    /// synonym→code table.
    ///
    /// Synonym targets are not required to exist in the code table; such
    /// entries still resolve to their target but `display_unit` falls back
    /// to the raw input for them.
    pub fn new(codes: BidirectionalLookup, synonyms: BidirectionalLookup) -> Self {
        let orphans = synonyms
            .iter()
            .filter(|(_, target)| !codes.contains_key(target))
            .count();
        if orphans > 0 {
            tracing::debug!(orphans, "synonym targets missing from the code table");
        }
        tracing::debug!(
            codes = codes.len(),
            synonyms = synonyms.len(),
            "code resolver ready"
        );
        Self {
            codes,
            synonyms,
            invalid: InvalidCodeLog::new(),
        }
    }

    /// Best-effort canonical UCUM code for a raw unit string.
    ///
    /// Never fails: an input that stays unresolved after every repair is
    /// logged and returned unchanged, so callers always get a string back.
    pub fn valid_code(&self, raw: &str) -> String {
        if let Some(code) = self.resolve_internal(raw) {
            return code;
        }

        let repaired = repair_degree_signs(&repair_characters(raw));
        if repaired != raw {
            if let Some(code) = self.resolve_internal(&repaired) {
                return code;
            }
        }

        // Space removal works on the original input, not the repaired
        // variant: a space next to a repaired character has never been
        // observed, and this keeps the chain explainable.
        if raw.contains(' ') {
            let collapsed: String = raw.chars().filter(|c| *c != ' ').collect();
            if let Some(code) = self.resolve_internal(&collapsed) {
                return code;
            }
        }

        tracing::warn!(code = raw, "unit code could not be resolved");
        self.invalid.record(raw);
        raw.to_string()
    }

    /// Best-effort human-readable display unit for a raw unit string.
    ///
    /// Same degrade-gracefully contract as [`valid_code`](Self::valid_code):
    /// if the resolved code has no display entry, the raw input comes back
    /// unchanged.
    pub fn display_unit(&self, raw: &str) -> String {
        let code = self.valid_code(raw);
        match self.codes.get(&code) {
            Some(display) if !display.is_empty() => display.to_string(),
            _ => raw.to_string(),
        }
    }

    /// Ordered snapshot of every distinct input that failed to resolve.
    pub fn invalid_codes(&self) -> Vec<String> {
        self.invalid.snapshot()
    }

    pub fn code_table(&self) -> &BidirectionalLookup {
        &self.codes
    }

    pub fn synonym_table(&self) -> &BidirectionalLookup {
        &self.synonyms
    }

    /// Identity for canonical codes, synonym target otherwise. No side
    /// effects; the invalid-code log is only touched by `valid_code`.
    fn resolve_internal(&self, code: &str) -> Option<String> {
        if self.codes.contains_key(code) {
            return Some(code.to_string());
        }
        self.synonyms.get(code).map(str::to_string)
    }
}

/// Substitutions for characters that encoding trouble or locale input turn
/// up in unit strings: accents for apostrophes, superscript digits, and the
/// micro sign.
fn repair_characters(code: &str) -> String {
    code.chars()
        .map(|c| match c {
            '\u{00b4}' | '\u{0060}' => '\'', // acute / grave accent
            '\u{00b2}' => '2',
            '\u{00b3}' => '3',
            '\u{00b5}' => 'u', // micro sign
            other => other,
        })
        .collect()
}

/// Degree-sign handling. `°C` denotes Celsius, which UCUM writes as the
/// dedicated token `Cel` — unless the text already says `°Cel`, where the
/// degree sign is redundant. Every other `°X` (Kelvin, Fahrenheit, ...)
/// keeps its base unit once the sign is stripped.
fn repair_degree_signs(code: &str) -> String {
    if !code.contains('\u{00b0}') {
        return code.to_string();
    }
    let celsius = code
        .find("°C")
        .is_some_and(|at| !code[at..].starts_with("°Cel"));
    if celsius {
        code.replace("°C", "Cel")
    } else {
        code.replace('\u{00b0}', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_repairs() {
        assert_eq!(repair_characters("µg"), "ug");
        assert_eq!(repair_characters("m²"), "m2");
        assert_eq!(repair_characters("m³"), "m3");
        assert_eq!(repair_characters("´`"), "''");
        assert_eq!(repair_characters("mg/dL"), "mg/dL");
    }

    #[test]
    fn degree_sign_celsius_becomes_cel() {
        assert_eq!(repair_degree_signs("°C"), "Cel");
        assert_eq!(repair_degree_signs("cal/°C"), "cal/Cel");
    }

    #[test]
    fn degree_sign_cel_is_not_doubled() {
        // "°Cel" must strip the sign, not rewrite to "CelCel".
        assert_eq!(repair_degree_signs("°Cel"), "Cel");
    }

    #[test]
    fn other_degree_signs_are_stripped() {
        assert_eq!(repair_degree_signs("°K"), "K");
        assert_eq!(repair_degree_signs("°F"), "F");
        assert_eq!(repair_degree_signs("mg"), "mg");
    }

    fn resolver() -> CodeResolver {
        let codes = BidirectionalLookup::from_pairs([
            ("mg", "milligram"),
            ("ug", "microgram"),
            ("m2", "square meter"),
            ("Cel", "degree Celsius"),
            ("K", "Kelvin"),
            ("mm[Hg]", "millimeter of mercury"),
        ]);
        let synonyms =
            BidirectionalLookup::from_pairs([("mmHg", "mm[Hg]"), ("ghost", "not-a-code")]);
        CodeResolver::new(codes, synonyms)
    }

    #[test]
    fn canonical_code_is_identity() {
        assert_eq!(resolver().valid_code("mg"), "mg");
    }

    #[test]
    fn synonym_resolves_to_target() {
        assert_eq!(resolver().valid_code("mmHg"), "mm[Hg]");
    }

    #[test]
    fn repaired_variant_is_retried() {
        let r = resolver();
        assert_eq!(r.valid_code("µg"), "ug");
        assert_eq!(r.valid_code("m²"), "m2");
        assert_eq!(r.valid_code("°C"), "Cel");
        assert_eq!(r.valid_code("°K"), "K");
        assert!(r.invalid_codes().is_empty());
    }

    #[test]
    fn space_fallback_uses_the_original_input() {
        let r = resolver();
        assert_eq!(r.valid_code("mm Hg"), "mm[Hg]");
        assert!(r.invalid_codes().is_empty());
    }

    #[test]
    fn unresolved_input_comes_back_unchanged_and_is_logged_once() {
        let r = resolver();
        assert_eq!(r.valid_code("bogus-unit-xyz"), "bogus-unit-xyz");
        assert_eq!(r.valid_code("bogus-unit-xyz"), "bogus-unit-xyz");
        assert_eq!(r.invalid_codes(), vec!["bogus-unit-xyz".to_string()]);
    }

    #[test]
    fn display_unit_degrades_to_input_for_orphan_synonyms() {
        let r = resolver();
        // "ghost" resolves to a target with no display entry.
        assert_eq!(r.valid_code("ghost"), "not-a-code");
        assert_eq!(r.display_unit("ghost"), "ghost");
    }

    #[test]
    fn display_unit_for_canonical_and_synonym_inputs() {
        let r = resolver();
        assert_eq!(r.display_unit("mg"), "milligram");
        assert_eq!(r.display_unit("mmHg"), "millimeter of mercury");
        assert_eq!(r.display_unit("bogus"), "bogus");
    }
}
