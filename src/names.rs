//! Country display-name resolution.
//!
//! Maps ISO-3 country abbreviations to the names shown by the dashboard
//! layer. The base mapping is derived from the flow records themselves
//! (first occurrence of each origin abbreviation wins); `NAME_OVERRIDES`
//! then patches in territories that only ever appear as destinations and a
//! handful of display-friendly shortenings. This module is the single source
//! of truth for name resolution — other modules should resolve through a
//! `NameTable` rather than reading name columns directly.

use std::collections::HashMap;

use crate::config::OverrideFile;
use crate::model::FlowRecord;

// ---------------------------------------------------------------------------
// Built-in override registry
// ---------------------------------------------------------------------------

/// One built-in display-name override.
pub struct NameOverride {
    /// ISO-3 country abbreviation as it appears in the flow table.
    pub code: &'static str,
    /// Name to display instead of the one carried by the flow table.
    pub name: &'static str,
}

/// Built-in overrides, applied on top of the names derived from the flow
/// records. Two groups:
///   - codes that appear only in destination columns and therefore never
///     contribute an origin name (SXM, ABW),
///   - official UN names shortened for display (VEN, SRB, TZA, BOL, NLD,
///     FSM) plus the UNK/UKN sentinel used by the source data.
pub static NAME_OVERRIDES: &[NameOverride] = &[
    NameOverride { code: "SXM", name: "Sint Maarten (Dutch part)" },
    NameOverride { code: "ABW", name: "Aruba" },
    NameOverride { code: "VEN", name: "Venezuela" },
    NameOverride { code: "UKN", name: "Unknown" },
    NameOverride { code: "SRB", name: "Serbia and Kosovo" },
    NameOverride { code: "TZA", name: "Tanzania" },
    NameOverride { code: "BOL", name: "Bolivia" },
    NameOverride { code: "NLD", name: "Netherlands" },
    NameOverride { code: "FSM", name: "Micronesia" },
];

/// Looks up a built-in override by code. Returns `None` if not overridden.
pub fn find_override(code: &str) -> Option<&'static NameOverride> {
    NAME_OVERRIDES.iter().find(|o| o.code == code)
}

// ---------------------------------------------------------------------------
// Name table
// ---------------------------------------------------------------------------

/// Abbreviation → display name mapping for one dataset snapshot.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: HashMap<String, String>,
}

impl NameTable {
    /// Builds the table from flow records: the first occurrence of each
    /// origin abbreviation supplies its name, then the built-in overrides
    /// are patched on top.
    pub fn from_flows(flows: &[FlowRecord]) -> Self {
        let mut names = HashMap::new();
        for record in flows {
            names
                .entry(record.origin_abbr.clone())
                .or_insert_with(|| record.origin_name.clone());
        }
        for o in NAME_OVERRIDES {
            names.insert(o.code.to_string(), o.name.to_string());
        }
        NameTable { names }
    }

    /// Applies a loaded override file on top of the current table. Config
    /// entries win over both derived names and built-in overrides.
    pub fn apply_overrides(&mut self, overrides: &OverrideFile) {
        for entry in &overrides.overrides {
            self.names.insert(entry.code.clone(), entry.name.clone());
        }
    }

    /// Resolves an abbreviation to its display name.
    ///
    /// Unknown codes fall back to the raw code — an unknown country is a
    /// display concern, never an error.
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.names.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Returns `true` if the table has an entry for `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OverrideEntry, OverrideFile};

    fn flow(origin_abbr: &str, origin_name: &str) -> FlowRecord {
        FlowRecord {
            origin_abbr: origin_abbr.to_string(),
            origin_name: origin_name.to_string(),
            destination_abbr: "CHE".to_string(),
            destination_name: "Switzerland".to_string(),
            destination_region: "Europe".to_string(),
            category: "asylum_seekers".to_string(),
            year: 2000,
            count: 10.0,
        }
    }

    #[test]
    fn test_override_codes_are_valid_iso3_format() {
        // Flow-table abbreviations are 3 uppercase ASCII letters. A
        // malformed code here would silently never match anything.
        for o in NAME_OVERRIDES {
            assert_eq!(o.code.len(), 3, "code '{}' should be 3 characters", o.code);
            assert!(
                o.code.chars().all(|c| c.is_ascii_uppercase()),
                "code '{}' should be uppercase ASCII",
                o.code
            );
        }
    }

    #[test]
    fn test_no_duplicate_override_codes() {
        let mut seen = std::collections::HashSet::new();
        for o in NAME_OVERRIDES {
            assert!(seen.insert(o.code), "duplicate override code '{}'", o.code);
        }
    }

    #[test]
    fn test_destination_only_territories_are_present() {
        // SXM and ABW never appear as origins, so without these entries the
        // map layer would display raw codes for them.
        assert!(find_override("SXM").is_some());
        assert!(find_override("ABW").is_some());
    }

    #[test]
    fn test_first_occurrence_wins_for_derived_names() {
        let flows = vec![
            flow("TGO", "Togo"),
            flow("TGO", "Togolese Republic"),
        ];
        let table = NameTable::from_flows(&flows);
        assert_eq!(table.resolve("TGO"), "Togo");
    }

    #[test]
    fn test_builtin_override_wins_over_derived_name() {
        let flows = vec![flow("VEN", "Venezuela (Bolivarian Republic of)")];
        let table = NameTable::from_flows(&flows);
        assert_eq!(table.resolve("VEN"), "Venezuela");
    }

    #[test]
    fn test_config_override_wins_over_builtin() {
        let flows = vec![flow("VEN", "Venezuela (Bolivarian Republic of)")];
        let mut table = NameTable::from_flows(&flows);
        table.apply_overrides(&OverrideFile {
            version: 1,
            overrides: vec![OverrideEntry {
                code: "VEN".to_string(),
                name: "Venezuela, RB".to_string(),
            }],
        });
        assert_eq!(table.resolve("VEN"), "Venezuela, RB");
    }

    #[test]
    fn test_unknown_code_falls_back_to_raw_code() {
        let table = NameTable::from_flows(&[]);
        assert_eq!(table.resolve("XYZ"), "XYZ");
    }
}
