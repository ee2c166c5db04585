//! The distribution engine
//!
//! Runs the ordered rule set over a fresh [`Ledger`] and turns the result into
//! a [`DistributionResult`]. Pure and synchronous: no I/O, no shared state,
//! so separate calls may run in parallel without coordination.

use crate::heir::HeirComposition;
use crate::ledger::Ledger;
use crate::rules::{classical_rules, Rule, SpouseOnlyResidue};
use crate::share::DistributionResult;
use serde::{Deserialize, Serialize};

/// Policy choices the classical rules leave open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Disposal of the shortfall when spouses are the only heirs
    #[serde(default)]
    pub spouse_only_residue: SpouseOnlyResidue,
}

/// Fara'id distribution engine
#[derive(Debug, Clone)]
pub struct InheritanceEngine {
    rules: Vec<Rule>,
}

impl Default for InheritanceEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl InheritanceEngine {
    /// Engine with the classical rule set
    pub fn new(options: EngineOptions) -> Self {
        Self {
            rules: classical_rules(options.spouse_only_residue),
        }
    }

    /// Engine with a custom rule list, applied in the given order
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Distribute an estate between the given heirs
    ///
    /// Total over its input: never panics, never errors. With no heir present
    /// the result is empty and carries no flags. Amounts scale with
    /// `estate_value` whatever its sign.
    pub fn compute(&self, heirs: &HeirComposition, estate_value: f64) -> DistributionResult {
        let mut ledger = Ledger::new(heirs);
        if heirs.is_empty() {
            return ledger.into_result(estate_value);
        }

        let mut phase = None;
        for rule in &self.rules {
            if phase != Some(rule.phase()) {
                phase = Some(rule.phase());
                log::debug!("entering {:?} phase", rule.phase());
            }
            rule.apply(&mut ledger);
        }

        let result = ledger.into_result(estate_value);
        if !result.is_balanced() {
            // Heir combination the rule set does not model; report, never fail.
            log::warn!(
                "distribution sums to {:.4}% (unassigned {:.4}%) for {:?}",
                result.total_percentage(),
                result.unassigned_percentage,
                heirs
            );
        }
        result
    }
}

/// Distribute with the classical rules and default options
pub fn compute(heirs: &HeirComposition, estate_value: f64) -> DistributionResult {
    InheritanceEngine::default().compute(heirs, estate_value)
}
