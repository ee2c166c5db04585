//! Case configuration — parsed from a TOML case file, command-line heir
//! counts and environment variable overrides.
//!
//! Priority: environment variables > command line > case file > defaults.

use anyhow::{Context, Result};
use faraid_core::{EngineOptions, HeirCategory, HeirComposition, HeirNames, SpouseOnlyResidue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::report::OutputFormat;

/// Top-level case configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Estate being distributed
    #[serde(default)]
    pub estate: EstateSection,

    /// Heir counts by category name (signed so bad input can be reported)
    #[serde(default)]
    pub heirs: BTreeMap<String, i64>,

    /// Comma-separated heir names by category name
    #[serde(default)]
    pub names: BTreeMap<String, String>,

    /// Engine policy choices
    #[serde(default)]
    pub engine: EngineOptions,

    /// Output settings
    #[serde(default)]
    pub output: OutputSection,
}

/// Estate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateSection {
    /// Net estate value after debts and bequests
    #[serde(default)]
    pub value: f64,

    /// Currency code shown next to amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for EstateSection {
    fn default() -> Self {
        Self {
            value: 0.0,
            currency: default_currency(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// "table" or "json"
    #[serde(default = "default_format")]
    pub format: String,

    /// Print one line per heir instead of pooled categories
    #[serde(default)]
    pub expand_individuals: bool,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            expand_individuals: false,
            log_level: default_log_level(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_currency() -> String {
    "JOD".to_string()
}

fn default_format() -> String {
    "table".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ============================================================================
// Loading & overrides
// ============================================================================

impl CaseConfig {
    /// Load a case from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file: {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Parse a case from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).with_context(|| "Failed to parse TOML case file")
    }

    /// Add heirs from a `category=count` command-line argument.
    ///
    /// Counts for the same category are summed with those already present.
    pub fn add_heir_arg(&mut self, arg: &str) -> Result<()> {
        let (name, count) = arg
            .split_once('=')
            .with_context(|| format!("Expected CATEGORY=COUNT, got '{}'", arg))?;
        let count: i64 = count
            .trim()
            .parse()
            .with_context(|| format!("Invalid heir count in '{}'", arg))?;
        let category = HeirCategory::from_str(name)?;
        let total = self.heirs.entry(category.key().to_string()).or_insert(0);
        *total = total
            .checked_add(count)
            .with_context(|| format!("Heir count for {} overflows", category))?;
        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `FARAID_ESTATE_VALUE`
    /// - `FARAID_CURRENCY`
    /// - `FARAID_LOG_LEVEL`
    /// - `FARAID_OUTPUT_FORMAT`
    /// - `FARAID_SPOUSE_ONLY_RESIDUE` (`return_to_spouses` or `leave_unassigned`)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("FARAID_ESTATE_VALUE") {
            if let Ok(value) = v.parse::<f64>() {
                self.estate.value = value;
            }
        }
        if let Ok(v) = std::env::var("FARAID_CURRENCY") {
            self.estate.currency = v;
        }
        if let Ok(v) = std::env::var("FARAID_LOG_LEVEL") {
            self.output.log_level = v;
        }
        if let Ok(v) = std::env::var("FARAID_OUTPUT_FORMAT") {
            self.output.format = v;
        }
        if let Ok(v) = std::env::var("FARAID_SPOUSE_ONLY_RESIDUE") {
            match v.as_str() {
                "return_to_spouses" => {
                    self.engine.spouse_only_residue = SpouseOnlyResidue::ReturnToSpouses
                }
                "leave_unassigned" | "treasury" => {
                    self.engine.spouse_only_residue = SpouseOnlyResidue::LeaveUnassigned
                }
                _ => log::warn!("Ignoring unknown FARAID_SPOUSE_ONLY_RESIDUE: {}", v),
            }
        }
    }

    /// Heir composition, validated.
    pub fn composition(&self) -> Result<HeirComposition> {
        HeirComposition::from_signed(self.heirs.iter().map(|(k, v)| (k.as_str(), *v)))
            .context("Invalid [heirs] section")
    }

    /// Heir names keyed by category.
    pub fn heir_names(&self) -> Result<HeirNames> {
        self.names
            .iter()
            .map(|(k, v)| {
                let category =
                    HeirCategory::from_str(k).with_context(|| "Invalid [names] section")?;
                Ok((category, v.clone()))
            })
            .collect()
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.output.format)
    }

    /// Validate that the case is usable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.estate.value.is_finite(),
            "estate.value must be a finite number"
        );
        anyhow::ensure!(
            !self.estate.currency.trim().is_empty(),
            "estate.currency must not be empty"
        );

        self.composition()?;
        self.heir_names()?;
        self.output_format()?;

        Ok(())
    }

    /// Unusual but computable input, worth a warning.
    pub fn warnings(&self) -> Vec<String> {
        let Ok(heirs) = self.composition() else {
            return Vec::new();
        };
        let mut warnings = Vec::new();

        if heirs.has(HeirCategory::Husband) && heirs.has(HeirCategory::Wife) {
            warnings.push("both a husband and a wife are listed".to_string());
        }
        if heirs.get(HeirCategory::Husband) > 1 {
            warnings.push(format!(
                "{} husbands listed, expected at most 1",
                heirs.get(HeirCategory::Husband)
            ));
        }
        if heirs.get(HeirCategory::Wife) > 4 {
            warnings.push(format!(
                "{} wives listed, expected at most 4",
                heirs.get(HeirCategory::Wife)
            ));
        }
        if self.estate.value < 0.0 {
            warnings.push("estate value is negative".to_string());
        }
        warnings
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_toml() -> &'static str {
        r#"
[estate]
value = 1200.0

[heirs]
husband = 1
daughter = 1
"#
    }

    fn full_toml() -> &'static str {
        r#"
[estate]
value = 24000
currency = "USD"

[heirs]
wife = 2
son = 1
daughter = 2
fullBrother = 1

[names]
wife = "Aisha, Khadija"
daughter = "فاطمة، مريم"

[engine]
spouse_only_residue = "leave_unassigned"

[output]
format = "json"
expand_individuals = true
log_level = "debug"
"#
    }

    #[test]
    fn test_parse_minimal_case() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", minimal_toml()).unwrap();

        let config = CaseConfig::from_file(file.path()).unwrap();
        assert_eq!(config.estate.value, 1200.0);
        assert_eq!(config.estate.currency, "JOD"); // default
        assert_eq!(config.output.format, "table"); // default
        assert!(!config.output.expand_individuals);
        assert_eq!(
            config.engine.spouse_only_residue,
            SpouseOnlyResidue::ReturnToSpouses
        );

        let heirs = config.composition().unwrap();
        assert_eq!(heirs.get(HeirCategory::Husband), 1);
        assert_eq!(heirs.get(HeirCategory::Daughter), 1);
    }

    #[test]
    fn test_parse_full_case() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", full_toml()).unwrap();

        let config = CaseConfig::from_file(file.path()).unwrap();
        assert_eq!(config.estate.value, 24000.0);
        assert_eq!(config.estate.currency, "USD");
        assert_eq!(config.output_format().unwrap(), OutputFormat::Json);
        assert!(config.output.expand_individuals);
        assert_eq!(
            config.engine.spouse_only_residue,
            SpouseOnlyResidue::LeaveUnassigned
        );

        let heirs = config.composition().unwrap();
        assert_eq!(heirs.get(HeirCategory::FullBrother), 1);
        assert_eq!(heirs.get(HeirCategory::Wife), 2);

        let names = config.heir_names().unwrap();
        assert_eq!(names[&HeirCategory::Wife], "Aisha, Khadija");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = CaseConfig::from_file(Path::new("/nonexistent/case.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_negative_count() {
        let config = CaseConfig::parse("[heirs]\nson = -1\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_category() {
        let config = CaseConfig::parse("[heirs]\nuncle = 1\n").unwrap();
        assert!(config.validate().is_err());

        let config = CaseConfig::parse("[names]\nuncle = \"Omar\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_format() {
        let config = CaseConfig::parse("[output]\nformat = \"xml\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_non_finite_estate() {
        let mut config = CaseConfig::parse(minimal_toml()).unwrap();
        config.estate.value = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_heir_args() {
        let mut config = CaseConfig::parse(minimal_toml()).unwrap();
        config.add_heir_arg("daughter=2").unwrap();
        config.add_heir_arg("fullSister=1").unwrap();

        let heirs = config.composition().unwrap();
        assert_eq!(heirs.get(HeirCategory::Daughter), 3);
        assert_eq!(heirs.get(HeirCategory::FullSister), 1);

        assert!(config.add_heir_arg("son").is_err());
        assert!(config.add_heir_arg("son=two").is_err());
        assert!(config.add_heir_arg("cousin=1").is_err());
    }

    #[test]
    fn test_heir_arg_overflow_is_an_error() {
        let mut config = CaseConfig::default();
        config.add_heir_arg("son=9223372036854775807").unwrap();

        assert!(config.add_heir_arg("son=1").is_err());
        assert_eq!(config.heirs["son"], i64::MAX);
        // Still rejected at validation, not silently truncated
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warnings() {
        let config = CaseConfig::parse("[heirs]\nhusband = 2\nwife = 5\n").unwrap();
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 3);

        let config = CaseConfig::parse(minimal_toml()).unwrap();
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CaseConfig::parse(minimal_toml()).unwrap();

        std::env::set_var("FARAID_ESTATE_VALUE", "5000");
        std::env::set_var("FARAID_CURRENCY", "ILS");
        std::env::set_var("FARAID_SPOUSE_ONLY_RESIDUE", "treasury");

        config.apply_env_overrides();

        assert_eq!(config.estate.value, 5000.0);
        assert_eq!(config.estate.currency, "ILS");
        assert_eq!(
            config.engine.spouse_only_residue,
            SpouseOnlyResidue::LeaveUnassigned
        );

        // Clean up
        std::env::remove_var("FARAID_ESTATE_VALUE");
        std::env::remove_var("FARAID_CURRENCY");
        std::env::remove_var("FARAID_SPOUSE_ONLY_RESIDUE");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = CaseConfig::parse(full_toml()).unwrap();
        let serialized = toml::to_string_pretty(&config).unwrap();

        let reparsed = CaseConfig::parse(&serialized).unwrap();
        assert_eq!(reparsed.heirs, config.heirs);
        assert_eq!(reparsed.estate.currency, config.estate.currency);
    }
}
