//! Report rendering — plain-text table or JSON.

use anyhow::{Context, Result};
use faraid_core::{DistributionResult, IndividualShare};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

/// Output format for the distribution report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format: {} (expected table or json)", other),
        }
    }
}

/// Everything printed for one case
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub currency: &'a str,
    pub result: &'a DistributionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individuals: Option<Vec<IndividualShare>>,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
}

impl<'a> Report<'a> {
    pub fn new(currency: &'a str, result: &'a DistributionResult) -> Self {
        Self {
            currency,
            result,
            individuals: None,
            notes: explanatory_notes(result),
            warnings: Vec::new(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.to_table()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report")
            }
        }
    }

    fn to_table(&self) -> String {
        let mut out = String::new();

        if self.result.is_empty() {
            out.push_str("No heirs: nothing to distribute.\n");
            return out;
        }

        let _ = writeln!(
            out,
            "Estate: {:.2} {}",
            self.result.estate_value, self.currency
        );
        out.push('\n');

        match &self.individuals {
            Some(lines) => {
                let _ = writeln!(
                    out,
                    "{:<24} {:<22} {:>8} {:>14}",
                    "Heir", "Share", "%", "Amount"
                );
                for line in lines {
                    let _ = writeln!(
                        out,
                        "{:<24} {:<22} {:>8.3} {:>14.2}",
                        line.name, line.fraction, line.percentage, line.amount
                    );
                }
            }
            None => {
                let _ = writeln!(
                    out,
                    "{:<24} {:>5} {:<22} {:>8} {:>14}  {}",
                    "Heir", "Count", "Share", "%", "Amount", "Rule"
                );
                for entry in &self.result.entries {
                    let _ = writeln!(
                        out,
                        "{:<24} {:>5} {:<22} {:>8.3} {:>14.2}  {}",
                        entry.label(),
                        entry.count,
                        entry.fraction,
                        entry.percentage,
                        entry.amount,
                        entry.notes
                    );
                }
            }
        }

        let _ = writeln!(
            out,
            "{:<24} {:>5} {:<22} {:>8.3} {:>14.2}",
            "Total",
            "",
            "",
            self.result.total_percentage(),
            self.result.total_amount()
        );

        if !self.result.exclusions.is_empty() {
            out.push_str("\nExcluded:\n");
            for exclusion in &self.result.exclusions {
                let _ = writeln!(
                    out,
                    "  {} ({}): {}",
                    exclusion.category.label(),
                    exclusion.count,
                    exclusion.reason
                );
            }
        }

        if !self.notes.is_empty() {
            out.push_str("\nNotes:\n");
            for note in &self.notes {
                let _ = writeln!(out, "  - {}", note);
            }
        }

        if !self.warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for warning in &self.warnings {
                let _ = writeln!(out, "  ! {}", warning);
            }
        }

        out
    }
}

/// Human-readable explanation of the corrections applied to a result
pub fn explanatory_notes(result: &DistributionResult) -> Vec<String> {
    let mut notes = Vec::new();

    if result.is_proportionally_reduced {
        notes.push(
            "The fixed shares exceeded the estate; every share was reduced \
             proportionally ('awl)."
                .to_string(),
        );
    }
    if result.is_residue_returned {
        notes.push(
            "No residuary heir remained; the surplus was returned to the \
             fixed-share heirs in proportion to their shares (radd)."
                .to_string(),
        );
    }
    if result.unassigned_percentage > 0.0 {
        notes.push(format!(
            "{:.3}% of the estate is unassigned and passes to the public treasury.",
            result.unassigned_percentage
        ));
    }
    if !result.is_balanced() {
        notes.push(format!(
            "Shares sum to {:.3}% rather than 100%; this combination of heirs \
             is outside the modelled rules.",
            result.total_percentage() + result.unassigned_percentage
        ));
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use faraid_core::{compute, expand_individuals, HeirCategory, HeirComposition, HeirNames};

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!(" JSON ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_notes_for_awl() {
        let heirs = HeirComposition::new()
            .with(HeirCategory::Husband, 1)
            .with(HeirCategory::FullSister, 2);
        let result = compute(&heirs, 700.0);
        let notes = explanatory_notes(&result);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("'awl"));
    }

    #[test]
    fn test_notes_for_radd() {
        let heirs = HeirComposition::new()
            .with(HeirCategory::Mother, 1)
            .with(HeirCategory::Daughter, 1);
        let result = compute(&heirs, 100.0);
        let notes = explanatory_notes(&result);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("radd"));
    }

    #[test]
    fn test_no_notes_for_plain_case() {
        let heirs = HeirComposition::new()
            .with(HeirCategory::Wife, 1)
            .with(HeirCategory::Son, 1);
        let result = compute(&heirs, 800.0);
        assert!(explanatory_notes(&result).is_empty());
    }

    #[test]
    fn test_table_lists_heirs_and_exclusions() {
        let heirs = HeirComposition::new()
            .with(HeirCategory::Son, 1)
            .with(HeirCategory::FullBrother, 2);
        let result = compute(&heirs, 1000.0);
        let table = Report::new("JOD", &result)
            .render(OutputFormat::Table)
            .unwrap();

        assert!(table.contains("Estate: 1000.00 JOD"));
        assert!(table.contains("Son"));
        assert!(table.contains("Excluded:"));
        assert!(table.contains("Full brother"));
        assert!(table.contains(&result.entry(HeirCategory::Son).unwrap().notes));
    }

    #[test]
    fn test_table_for_empty_case() {
        let result = compute(&HeirComposition::new(), 1000.0);
        let table = Report::new("JOD", &result)
            .render(OutputFormat::Table)
            .unwrap();
        assert!(table.contains("nothing to distribute"));
    }

    #[test]
    fn test_json_with_individuals() {
        let heirs = HeirComposition::new().with(HeirCategory::Daughter, 2);
        let result = compute(&heirs, 900.0);
        let mut names = HeirNames::new();
        names.insert(HeirCategory::Daughter, "Fatima, Maryam".to_string());

        let mut report = Report::new("USD", &result);
        report.individuals = Some(expand_individuals(&result, &names));
        let json = report.render(OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["individuals"].as_array().unwrap().len(), 2);
        assert_eq!(value["individuals"][1]["name"], "Maryam");
        assert_eq!(value["result"]["is_residue_returned"], true);
    }
}
