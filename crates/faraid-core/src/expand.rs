//! Per-individual expansion
//!
//! The engine keeps each category pooled on one line. For display, a pooled
//! line can be split into one line per heir, with the line's percentage and
//! amount divided equally by head count. No rule logic happens here.

use crate::heir::HeirCategory;
use crate::share::DistributionResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name lists per category, e.g. `Daughter => "Fatima, Maryam"`
pub type HeirNames = BTreeMap<HeirCategory, String>;

/// One named heir's portion of a pooled line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualShare {
    pub category: HeirCategory,
    pub name: String,
    /// Share description of the pooled line
    pub fraction: String,
    pub percentage: f64,
    pub amount: f64,
}

/// Split a comma-separated name list
///
/// Accepts `,`, the Arabic comma `،` and the Arabic conjunction ` و `.
pub fn split_names(names: &str) -> Vec<String> {
    names
        .replace('،', ",")
        .replace(" و ", ",")
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// One line per heir, in entry order
///
/// Missing names fall back to `"<label> <n>"`, or to the bare label when the
/// line has a single heir.
pub fn expand_individuals(result: &DistributionResult, names: &HeirNames) -> Vec<IndividualShare> {
    let mut lines = Vec::new();
    for entry in &result.entries {
        let given = names
            .get(&entry.category)
            .map(|n| split_names(n))
            .unwrap_or_default();
        let count = entry.count.max(1);

        if count == 1 {
            lines.push(IndividualShare {
                category: entry.category,
                name: given
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| entry.label().to_string()),
                fraction: entry.fraction.clone(),
                percentage: entry.percentage,
                amount: entry.amount,
            });
            continue;
        }

        let percentage = entry.percentage / count as f64;
        let amount = entry.amount / count as f64;
        for index in 0..count as usize {
            let name = given
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("{} {}", entry.label(), index + 1));
            lines.push(IndividualShare {
                category: entry.category,
                name,
                fraction: entry.fraction.clone(),
                percentage,
                amount,
            });
        }
    }
    lines
}
