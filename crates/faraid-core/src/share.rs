//! Distribution results

use crate::heir::HeirCategory;
use crate::ledger::Exclusion;
use serde::{Deserialize, Serialize};

/// Allowed drift, in percentage points, before shares count as over or under 100%
pub const BALANCE_TOLERANCE: f64 = 0.01;

/// One line of a distribution: a (possibly pooled) heir category and its share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    /// Heir category this line belongs to
    pub category: HeirCategory,
    /// Heads sharing this line after exclusion
    pub count: u32,
    /// Human-readable share, e.g. "1/6" or "1/6 + residue"
    pub fraction: String,
    /// Percentage of the estate for the whole line (0-100)
    pub percentage: f64,
    /// `percentage / 100 * estate value`
    pub amount: f64,
    /// Which rules produced the figure
    pub notes: String,
}

impl ShareEntry {
    pub fn new(
        category: HeirCategory,
        count: u32,
        fraction: impl Into<String>,
        percentage: f64,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            category,
            count,
            fraction: fraction.into(),
            percentage,
            amount: 0.0,
            notes: notes.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    pub fn is_spouse(&self) -> bool {
        self.category.is_spouse()
    }

    /// Append a rule annotation to the notes
    pub fn annotate(&mut self, note: &str) {
        if self.notes.is_empty() {
            self.notes.push_str(note);
        } else {
            self.notes.push(' ');
            self.notes.push_str(note);
        }
    }
}

/// The outcome of a distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Estate value the amounts were computed from
    pub estate_value: f64,
    /// Share lines in the order the rules produced them
    pub entries: Vec<ShareEntry>,
    /// Relatives removed by closer ones, in the order they were excluded
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
    /// 'Awl: shares exceeded the estate and were scaled down
    pub is_proportionally_reduced: bool,
    /// Radd: the shortfall was returned to fixed-share heirs
    pub is_residue_returned: bool,
    /// Percentage left to the public treasury when it is not returned to spouses
    #[serde(default)]
    pub unassigned_percentage: f64,
}

impl DistributionResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all line percentages
    pub fn total_percentage(&self) -> f64 {
        self.entries.iter().map(|e| e.percentage).sum()
    }

    /// Sum of all line amounts
    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Shares account for the whole estate (or there are no heirs at all)
    pub fn is_balanced(&self) -> bool {
        if self.entries.is_empty() {
            return true;
        }
        (self.total_percentage() + self.unassigned_percentage - 100.0).abs() <= BALANCE_TOLERANCE
    }

    /// First line for a category
    pub fn entry(&self, category: HeirCategory) -> Option<&ShareEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Percentage held by a category, zero if it inherits nothing
    pub fn percentage_of(&self, category: HeirCategory) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.percentage)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShareEntry> {
        self.entries.iter()
    }
}
