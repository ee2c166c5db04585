//! Heir categories and household composition
//!
//! A [`HeirComposition`] maps each recognised [`HeirCategory`] to a head count.
//! The engine accepts any composition of non-negative counts; signed or textual
//! input is validated here, at the boundary, before it reaches the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeirError {
    #[error("Negative heir count for {category}: {count}")]
    NegativeCount { category: HeirCategory, count: i64 },

    #[error("Heir count for {category} is too large: {count}")]
    CountTooLarge { category: HeirCategory, count: i64 },

    #[error("Unknown heir category: {0}")]
    UnknownCategory(String),
}

/// A class of relative recognised by the distribution rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeirCategory {
    Husband,
    Wife,
    Son,
    Daughter,
    Father,
    Mother,
    PaternalGrandfather,
    PaternalGrandmother,
    MaternalGrandmother,
    PaternalGrandson,
    FullBrother,
    FullSister,
    PaternalBrother,
    PaternalSister,
    MaternalBrother,
    MaternalSister,
}

impl HeirCategory {
    /// Every category, in display order
    pub const ALL: [HeirCategory; 16] = [
        HeirCategory::Husband,
        HeirCategory::Wife,
        HeirCategory::Son,
        HeirCategory::Daughter,
        HeirCategory::Father,
        HeirCategory::Mother,
        HeirCategory::PaternalGrandfather,
        HeirCategory::PaternalGrandmother,
        HeirCategory::MaternalGrandmother,
        HeirCategory::PaternalGrandson,
        HeirCategory::FullBrother,
        HeirCategory::FullSister,
        HeirCategory::PaternalBrother,
        HeirCategory::PaternalSister,
        HeirCategory::MaternalBrother,
        HeirCategory::MaternalSister,
    ];

    /// Sibling categories (full, paternal and maternal)
    pub const SIBLINGS: [HeirCategory; 6] = [
        HeirCategory::FullBrother,
        HeirCategory::FullSister,
        HeirCategory::PaternalBrother,
        HeirCategory::PaternalSister,
        HeirCategory::MaternalBrother,
        HeirCategory::MaternalSister,
    ];

    /// English display label
    pub fn label(&self) -> &'static str {
        match self {
            HeirCategory::Husband => "Husband",
            HeirCategory::Wife => "Wife",
            HeirCategory::Son => "Son",
            HeirCategory::Daughter => "Daughter",
            HeirCategory::Father => "Father",
            HeirCategory::Mother => "Mother",
            HeirCategory::PaternalGrandfather => "Paternal grandfather",
            HeirCategory::PaternalGrandmother => "Paternal grandmother",
            HeirCategory::MaternalGrandmother => "Maternal grandmother",
            HeirCategory::PaternalGrandson => "Paternal grandson",
            HeirCategory::FullBrother => "Full brother",
            HeirCategory::FullSister => "Full sister",
            HeirCategory::PaternalBrother => "Paternal brother",
            HeirCategory::PaternalSister => "Paternal sister",
            HeirCategory::MaternalBrother => "Maternal brother",
            HeirCategory::MaternalSister => "Maternal sister",
        }
    }

    /// Arabic name as used in court documents
    pub fn arabic_name(&self) -> &'static str {
        match self {
            HeirCategory::Husband => "الزوج",
            HeirCategory::Wife => "الزوجة",
            HeirCategory::Son => "الابن",
            HeirCategory::Daughter => "البنت",
            HeirCategory::Father => "الأب",
            HeirCategory::Mother => "الأم",
            HeirCategory::PaternalGrandfather => "الجد لأب",
            HeirCategory::PaternalGrandmother => "الجدة لأب",
            HeirCategory::MaternalGrandmother => "الجدة لأم",
            HeirCategory::PaternalGrandson => "ابن الابن",
            HeirCategory::FullBrother => "الأخ الشقيق",
            HeirCategory::FullSister => "الأخت الشقيقة",
            HeirCategory::PaternalBrother => "الأخ لأب",
            HeirCategory::PaternalSister => "الأخت لأب",
            HeirCategory::MaternalBrother => "الأخ لأم",
            HeirCategory::MaternalSister => "الأخت لأم",
        }
    }

    /// snake_case key, as used in case files
    pub fn key(&self) -> &'static str {
        match self {
            HeirCategory::Husband => "husband",
            HeirCategory::Wife => "wife",
            HeirCategory::Son => "son",
            HeirCategory::Daughter => "daughter",
            HeirCategory::Father => "father",
            HeirCategory::Mother => "mother",
            HeirCategory::PaternalGrandfather => "paternal_grandfather",
            HeirCategory::PaternalGrandmother => "paternal_grandmother",
            HeirCategory::MaternalGrandmother => "maternal_grandmother",
            HeirCategory::PaternalGrandson => "paternal_grandson",
            HeirCategory::FullBrother => "full_brother",
            HeirCategory::FullSister => "full_sister",
            HeirCategory::PaternalBrother => "paternal_brother",
            HeirCategory::PaternalSister => "paternal_sister",
            HeirCategory::MaternalBrother => "maternal_brother",
            HeirCategory::MaternalSister => "maternal_sister",
        }
    }

    pub fn is_spouse(&self) -> bool {
        matches!(self, HeirCategory::Husband | HeirCategory::Wife)
    }

    pub fn is_sibling(&self) -> bool {
        Self::SIBLINGS.contains(self)
    }
}

impl fmt::Display for HeirCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HeirCategory {
    type Err = HeirError;

    /// Accepts snake_case keys, camelCase keys and the short UI aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();

        let category = match normalized.as_str() {
            "husband" => HeirCategory::Husband,
            "wife" | "wives" => HeirCategory::Wife,
            "son" | "sons" => HeirCategory::Son,
            "daughter" | "daughters" => HeirCategory::Daughter,
            "father" => HeirCategory::Father,
            "mother" => HeirCategory::Mother,
            "paternalgrandfather" => HeirCategory::PaternalGrandfather,
            "paternalgrandmother" => HeirCategory::PaternalGrandmother,
            "maternalgrandmother" => HeirCategory::MaternalGrandmother,
            "paternalgrandson" => HeirCategory::PaternalGrandson,
            "fullbrother" | "brotherfull" => HeirCategory::FullBrother,
            "fullsister" | "sisterfull" => HeirCategory::FullSister,
            "paternalbrother" => HeirCategory::PaternalBrother,
            "paternalsister" => HeirCategory::PaternalSister,
            "maternalbrother" => HeirCategory::MaternalBrother,
            "maternalsister" => HeirCategory::MaternalSister,
            _ => return Err(HeirError::UnknownCategory(s.to_string())),
        };
        Ok(category)
    }
}

/// Head count per heir category
///
/// Categories that are absent have a count of zero. Counts of zero are never
/// stored, so two compositions with the same living heirs compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<HeirCategory, u32>",
    into = "BTreeMap<HeirCategory, u32>"
)]
pub struct HeirComposition {
    counts: BTreeMap<HeirCategory, u32>,
}

impl HeirComposition {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, category: HeirCategory, count: u32) -> Self {
        self.set(category, count);
        self
    }

    /// Build from signed counts keyed by category name
    ///
    /// This is the validation boundary: unknown names and negative counts are
    /// rejected here so the engine only ever sees well-formed input. Repeated
    /// keys are summed.
    pub fn from_signed<I, K>(entries: I) -> Result<Self, HeirError>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let mut composition = Self::new();
        for (name, count) in entries {
            let category = HeirCategory::from_str(name.as_ref())?;
            if count < 0 {
                return Err(HeirError::NegativeCount { category, count });
            }
            let total = count.saturating_add(composition.get(category) as i64);
            let total =
                u32::try_from(total).map_err(|_| HeirError::CountTooLarge {
                    category,
                    count: total,
                })?;
            composition.set(category, total);
        }
        Ok(composition)
    }

    pub fn set(&mut self, category: HeirCategory, count: u32) {
        if count == 0 {
            self.counts.remove(&category);
        } else {
            self.counts.insert(category, count);
        }
    }

    pub fn get(&self, category: HeirCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn has(&self, category: HeirCategory) -> bool {
        self.get(category) > 0
    }

    /// Zero out a category (exclusion)
    pub fn clear(&mut self, category: HeirCategory) {
        self.counts.remove(&category);
    }

    /// Total heads across the given categories
    pub fn total_of(&self, categories: &[HeirCategory]) -> u64 {
        categories.iter().map(|c| self.get(*c) as u64).sum()
    }

    /// Total heads across all categories
    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| *c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Categories with a positive count, in category order
    pub fn iter(&self) -> impl Iterator<Item = (HeirCategory, u32)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }

    /// An inheriting descendant: son, daughter or son's son
    pub fn has_descendant(&self) -> bool {
        self.has(HeirCategory::Son)
            || self.has(HeirCategory::Daughter)
            || self.has(HeirCategory::PaternalGrandson)
    }

    /// Son or son's son present
    pub fn has_male_descendant(&self) -> bool {
        self.has(HeirCategory::Son) || self.has(HeirCategory::PaternalGrandson)
    }

    /// Father or paternal grandfather present
    pub fn has_male_ascendant(&self) -> bool {
        self.has(HeirCategory::Father) || self.has(HeirCategory::PaternalGrandfather)
    }

    /// Heads across all six sibling categories
    pub fn sibling_count(&self) -> u64 {
        self.total_of(&HeirCategory::SIBLINGS)
    }
}

impl From<BTreeMap<HeirCategory, u32>> for HeirComposition {
    fn from(counts: BTreeMap<HeirCategory, u32>) -> Self {
        counts.into_iter().collect()
    }
}

impl From<HeirComposition> for BTreeMap<HeirCategory, u32> {
    fn from(composition: HeirComposition) -> Self {
        composition.counts
    }
}

impl FromIterator<(HeirCategory, u32)> for HeirComposition {
    fn from_iter<T: IntoIterator<Item = (HeirCategory, u32)>>(iter: T) -> Self {
        let mut composition = Self::new();
        for (category, count) in iter {
            composition.set(category, composition.get(category).saturating_add(count));
        }
        composition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            HeirCategory::from_str("full_brother").unwrap(),
            HeirCategory::FullBrother
        );
        assert_eq!(
            HeirCategory::from_str("fullBrother").unwrap(),
            HeirCategory::FullBrother
        );
        assert_eq!(
            HeirCategory::from_str("brotherFull").unwrap(),
            HeirCategory::FullBrother
        );
        assert_eq!(
            HeirCategory::from_str(" Maternal Grandmother ").unwrap(),
            HeirCategory::MaternalGrandmother
        );
        assert!(matches!(
            HeirCategory::from_str("uncle"),
            Err(HeirError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_keys_parse_back() {
        for category in HeirCategory::ALL {
            assert_eq!(HeirCategory::from_str(category.key()).unwrap(), category);
        }
    }

    #[test]
    fn test_zero_counts_not_stored() {
        let composition = HeirComposition::new()
            .with(HeirCategory::Son, 2)
            .with(HeirCategory::Daughter, 0);

        assert_eq!(composition.iter().count(), 1);
        assert!(!composition.has(HeirCategory::Daughter));
        assert_eq!(composition, HeirComposition::new().with(HeirCategory::Son, 2));
    }

    #[test]
    fn test_from_signed_rejects_negative() {
        let result = HeirComposition::from_signed([("son", 1), ("daughter", -1)]);
        assert_eq!(
            result,
            Err(HeirError::NegativeCount {
                category: HeirCategory::Daughter,
                count: -1
            })
        );
    }

    #[test]
    fn test_from_signed_rejects_unknown() {
        let result = HeirComposition::from_signed([("cousin", 1)]);
        assert!(matches!(result, Err(HeirError::UnknownCategory(_))));
    }

    #[test]
    fn test_from_signed_rejects_overflow() {
        let result = HeirComposition::from_signed([("son", i64::from(u32::MAX) + 1)]);
        assert!(matches!(result, Err(HeirError::CountTooLarge { .. })));
    }

    #[test]
    fn test_from_signed_overflow_reports_summed_count() {
        let result = HeirComposition::from_signed([("son", i64::from(u32::MAX)), ("son", 1)]);
        assert_eq!(
            result,
            Err(HeirError::CountTooLarge {
                category: HeirCategory::Son,
                count: i64::from(u32::MAX) + 1,
            })
        );
    }

    #[test]
    fn test_arabic_names() {
        assert_eq!(HeirCategory::Husband.arabic_name(), "الزوج");
        assert_eq!(HeirCategory::MaternalSister.arabic_name(), "الأخت لأم");

        let names: std::collections::BTreeSet<&str> =
            HeirCategory::ALL.iter().map(|c| c.arabic_name()).collect();
        assert_eq!(names.len(), HeirCategory::ALL.len());
    }

    #[test]
    fn test_from_signed_sums_repeated_keys() {
        let composition =
            HeirComposition::from_signed([("son", 1), ("sons", 2), ("wife", 0)]).unwrap();
        assert_eq!(composition.get(HeirCategory::Son), 3);
        assert!(!composition.has(HeirCategory::Wife));
    }

    #[test]
    fn test_predicates() {
        let composition = HeirComposition::new()
            .with(HeirCategory::Daughter, 1)
            .with(HeirCategory::PaternalGrandfather, 1)
            .with(HeirCategory::FullSister, 2)
            .with(HeirCategory::MaternalBrother, 1);

        assert!(composition.has_descendant());
        assert!(!composition.has_male_descendant());
        assert!(composition.has_male_ascendant());

        let grandson_only = HeirComposition::new().with(HeirCategory::PaternalGrandson, 1);
        assert!(grandson_only.has_descendant());
        assert!(grandson_only.has_male_descendant());
        assert_eq!(composition.sibling_count(), 3);
        assert_eq!(composition.total(), 5);
        assert!(HeirCategory::Wife.is_spouse());
        assert!(HeirCategory::MaternalSister.is_sibling());
        assert!(!HeirCategory::Mother.is_sibling());
    }

    #[test]
    fn test_serde_uses_snake_case_keys() {
        let composition = HeirComposition::new()
            .with(HeirCategory::Husband, 1)
            .with(HeirCategory::FullSister, 2);

        let json = serde_json::to_string(&composition).unwrap();
        assert_eq!(json, r#"{"husband":1,"full_sister":2}"#);

        let restored: HeirComposition = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, composition);

        let with_zero: HeirComposition =
            serde_json::from_str(r#"{"husband":1,"full_sister":2,"son":0}"#).unwrap();
        assert_eq!(with_zero, composition);
    }
}
