//! Working state threaded through the rules
//!
//! Every rule reads and mutates one [`Ledger`]: the heir counts left after
//! exclusion, the share lines assigned so far, and the part of the 100%
//! budget not yet handed out.

use crate::heir::{HeirCategory, HeirComposition};
use crate::share::{DistributionResult, ShareEntry};
use serde::{Deserialize, Serialize};

/// Residue below this many percentage points counts as nothing left
pub const RESIDUE_EPSILON: f64 = 1e-9;

/// A category removed from the distribution by a closer relative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub category: HeirCategory,
    /// Heads that were excluded
    pub count: u32,
    /// Which relative excluded them
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    /// Heir counts after exclusion
    pub heirs: HeirComposition,
    /// Percentage of the estate not yet assigned (may go negative before 'Awl)
    pub remaining: f64,
    pub entries: Vec<ShareEntry>,
    pub exclusions: Vec<Exclusion>,
    /// A residuary heir took (or was entitled to) the residue
    pub residuary_found: bool,
    pub proportionally_reduced: bool,
    pub residue_returned: bool,
    /// Shortfall deliberately left unassigned
    pub unassigned: f64,
}

impl Ledger {
    pub fn new(heirs: &HeirComposition) -> Self {
        Self {
            heirs: heirs.clone(),
            remaining: 100.0,
            entries: Vec::new(),
            exclusions: Vec::new(),
            residuary_found: false,
            proportionally_reduced: false,
            residue_returned: false,
            unassigned: 0.0,
        }
    }

    pub fn count(&self, category: HeirCategory) -> u32 {
        self.heirs.get(category)
    }

    pub fn has(&self, category: HeirCategory) -> bool {
        self.heirs.has(category)
    }

    /// Zero out a category, recording who excluded it
    pub fn exclude(&mut self, category: HeirCategory, reason: &str) {
        let count = self.heirs.get(category);
        if count == 0 {
            return;
        }
        log::debug!("{} ({}) excluded: {}", category, count, reason);
        self.heirs.clear(category);
        self.exclusions.push(Exclusion {
            category,
            count,
            reason: reason.to_string(),
        });
    }

    /// Record a share line and deduct it from the budget
    pub fn assign(&mut self, entry: ShareEntry) {
        log::debug!(
            "{} x{} assigned {} ({:.4}%)",
            entry.category,
            entry.count,
            entry.fraction,
            entry.percentage
        );
        self.remaining -= entry.percentage;
        self.entries.push(entry);
    }

    /// Unassigned residue, never negative
    pub fn residue(&self) -> f64 {
        if self.remaining > RESIDUE_EPSILON {
            self.remaining
        } else {
            0.0
        }
    }

    pub fn entry_mut(&mut self, category: HeirCategory) -> Option<&mut ShareEntry> {
        self.entries.iter_mut().find(|e| e.category == category)
    }

    /// Sum of all assigned percentages
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.percentage).sum()
    }

    /// Fix monetary amounts and hand the lines out
    pub fn into_result(self, estate_value: f64) -> DistributionResult {
        let entries = self
            .entries
            .into_iter()
            .map(|mut e| {
                e.amount = e.percentage / 100.0 * estate_value;
                e
            })
            .collect();

        DistributionResult {
            estate_value,
            entries,
            exclusions: self.exclusions,
            is_proportionally_reduced: self.proportionally_reduced,
            is_residue_returned: self.residue_returned,
            unassigned_percentage: self.unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_deducts_budget() {
        let mut ledger = Ledger::new(&HeirComposition::new().with(HeirCategory::Wife, 2));
        ledger.assign(ShareEntry::new(HeirCategory::Wife, 2, "1/4", 25.0, ""));

        assert_eq!(ledger.remaining, 75.0);
        assert_eq!(ledger.residue(), 75.0);
        assert_eq!(ledger.total(), 25.0);
    }

    #[test]
    fn test_residue_never_negative() {
        let mut ledger = Ledger::new(&HeirComposition::new());
        ledger.assign(ShareEntry::new(HeirCategory::Husband, 1, "1/2", 50.0, ""));
        ledger.assign(ShareEntry::new(HeirCategory::FullSister, 2, "2/3", 66.0, ""));

        assert!(ledger.remaining < 0.0);
        assert_eq!(ledger.residue(), 0.0);
    }

    #[test]
    fn test_exclude_records_reason() {
        let mut ledger = Ledger::new(
            &HeirComposition::new()
                .with(HeirCategory::Father, 1)
                .with(HeirCategory::PaternalGrandfather, 1),
        );
        ledger.exclude(HeirCategory::PaternalGrandfather, "father");
        ledger.exclude(HeirCategory::PaternalGrandmother, "father");

        assert!(!ledger.has(HeirCategory::PaternalGrandfather));
        assert_eq!(ledger.exclusions.len(), 1);
        assert_eq!(ledger.exclusions[0].reason, "father");
    }

    #[test]
    fn test_into_result_computes_amounts() {
        let mut ledger = Ledger::new(&HeirComposition::new());
        ledger.assign(ShareEntry::new(HeirCategory::Husband, 1, "1/4", 25.0, ""));
        ledger.assign(ShareEntry::new(HeirCategory::Daughter, 1, "1/2", 75.0, ""));

        let result = ledger.into_result(1200.0);
        assert_eq!(result.entries[0].amount, 300.0);
        assert_eq!(result.entries[1].amount, 900.0);
        assert_eq!(result.total_amount(), 1200.0);
    }
}
