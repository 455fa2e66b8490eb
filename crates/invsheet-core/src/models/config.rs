//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sheet::ColumnMapping;

/// Main configuration for the invsheet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvsheetConfig {
    /// Row reconstruction settings.
    pub parsing: ParseOptions,

    /// Spreadsheet template settings.
    pub sheet: WriteOptions,

    /// Per-supplier option overrides, keyed by supplier key.
    pub profiles: BTreeMap<String, SupplierProfile>,
}

/// Supplier-specific repair rules for the row assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairQuirk {
    /// `SS-POIGNEE EQUIPEE` followed by a bare numeric code: the word glued to
    /// the prefix belongs to the description.
    MergedPrefixWord,

    /// A digits-and-dots code following an isolated prefix carries one spurious
    /// leading digit when its integer part is longer than three digits
    /// (`VEN-` + `9161.167` becomes `VEN-161.167`).
    StripLeadingDigitAfterPrefix,
}

/// Row reconstruction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Lines a pending row may absorb before it is abandoned.
    pub max_pending_lines: usize,

    /// Characters a pending row may buffer before it is abandoned.
    pub max_pending_chars: usize,

    /// Enabled repair rules.
    pub quirks: Vec<RepairQuirk>,

    /// Warn when quantity times unit price does not match the total.
    pub check_totals: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_pending_lines: 5,
            max_pending_chars: 500,
            quirks: vec![RepairQuirk::MergedPrefixWord],
            check_totals: false,
        }
    }
}

impl ParseOptions {
    /// Whether a repair rule is enabled.
    pub fn has_quirk(&self, quirk: RepairQuirk) -> bool {
        self.quirks.contains(&quirk)
    }
}

/// Spreadsheet template settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Target sheet; the first sheet when unset.
    pub sheet_name: Option<String>,

    /// Header label to row field mapping.
    pub mapping: ColumnMapping,

    /// Blank previous data rows before writing.
    pub clear_existing: bool,

    /// How many rows from the top are searched for the header row.
    pub header_scan_rows: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sheet_name: None,
            mapping: ColumnMapping::default(),
            clear_existing: true,
            header_scan_rows: 50,
        }
    }
}

/// Stored options for one supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierProfile {
    pub options: ConvertOptions,
}

/// Per-request overrides, usually given as JSON on the command line.
///
/// Unset fields fall back to the supplier profile, then to the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<ColumnMapping>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_existing: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quirks: Option<Vec<RepairQuirk>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_totals: Option<bool>,
}

impl ConvertOptions {
    /// Parse options from a JSON object string. Empty input means no overrides.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Fill unset fields from `fallback`.
    pub fn layered(&self, fallback: &ConvertOptions) -> ConvertOptions {
        ConvertOptions {
            sheet_name: self.sheet_name.clone().or_else(|| fallback.sheet_name.clone()),
            mapping: self.mapping.clone().or_else(|| fallback.mapping.clone()),
            clear_existing: self.clear_existing.or(fallback.clear_existing),
            quirks: self.quirks.clone().or_else(|| fallback.quirks.clone()),
            check_totals: self.check_totals.or(fallback.check_totals),
        }
    }
}

impl InvsheetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Request options layered over the stored profile for `supplier_key`.
    pub fn effective_options(&self, supplier_key: &str, request: &ConvertOptions) -> ConvertOptions {
        match self.profiles.get(supplier_key) {
            Some(profile) => request.layered(&profile.options),
            None => request.clone(),
        }
    }

    /// Row reconstruction settings for a request.
    pub fn parse_options(&self, options: &ConvertOptions) -> ParseOptions {
        let mut parsing = self.parsing.clone();
        if let Some(quirks) = &options.quirks {
            parsing.quirks = quirks.clone();
        }
        if let Some(check) = options.check_totals {
            parsing.check_totals = check;
        }
        parsing
    }

    /// Template settings for a request.
    pub fn write_options(&self, options: &ConvertOptions) -> WriteOptions {
        let mut sheet = self.sheet.clone();
        if options.sheet_name.is_some() {
            sheet.sheet_name = options.sheet_name.clone();
        }
        if let Some(mapping) = &options.mapping {
            sheet.mapping = mapping.clone();
        }
        if let Some(clear) = options.clear_existing {
            sheet.clear_existing = clear;
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = InvsheetConfig::default();
        assert_eq!(config.parsing.max_pending_lines, 5);
        assert_eq!(config.parsing.max_pending_chars, 500);
        assert!(config.parsing.has_quirk(RepairQuirk::MergedPrefixWord));
        assert!(!config.parsing.has_quirk(RepairQuirk::StripLeadingDigitAfterPrefix));
        assert!(config.sheet.clear_existing);
        assert_eq!(config.sheet.header_scan_rows, 50);
        assert_eq!(config.sheet.mapping.len(), 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: InvsheetConfig =
            serde_json::from_str(r#"{"parsing": {"max_pending_lines": 3}}"#).unwrap();
        assert_eq!(config.parsing.max_pending_lines, 3);
        assert_eq!(config.parsing.max_pending_chars, 500);
        assert!(config.sheet.clear_existing);
    }

    #[test]
    fn test_options_layering() {
        let mut config = InvsheetConfig::default();
        config.profiles.insert(
            "omnia".to_string(),
            SupplierProfile {
                options: ConvertOptions {
                    sheet_name: Some("Profile".to_string()),
                    clear_existing: Some(false),
                    ..Default::default()
                },
            },
        );

        let request = ConvertOptions::from_json(
            r#"{"sheet_name": "Request", "quirks": ["strip_leading_digit_after_prefix"]}"#,
        )
        .unwrap();
        let effective = config.effective_options("omnia", &request);

        let write = config.write_options(&effective);
        assert_eq!(write.sheet_name.as_deref(), Some("Request"));
        assert!(!write.clear_existing);

        let parse = config.parse_options(&effective);
        assert_eq!(parse.quirks, vec![RepairQuirk::StripLeadingDigitAfterPrefix]);
        assert!(!parse.check_totals);
    }

    #[test]
    fn test_unknown_profile_uses_request_only() {
        let config = InvsheetConfig::default();
        let request = ConvertOptions::from_json("").unwrap();
        assert_eq!(config.effective_options("generic", &request), ConvertOptions::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvsheetConfig::default();
        config.parsing.check_totals = true;
        config.save(&path).unwrap();

        let loaded = InvsheetConfig::from_file(&path).unwrap();
        assert!(loaded.parsing.check_totals);
        assert_eq!(loaded.sheet, config.sheet);
    }
}
