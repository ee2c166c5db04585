//! Distribution rules
//!
//! The engine is an ordered list of [`Rule`]s applied to one [`Ledger`].
//! Rules fall into four phases, always run in this order:
//!
//! 1. **Blocking (Hajb)**: closer relatives exclude farther ones
//! 2. **Fixed shares (Fard)**: 1/2, 1/4, 1/8, 2/3, 1/3, 1/6
//! 3. **Residuary (Ta'sib)**: the first matching agnate takes what is left
//! 4. **Correction**: 'Awl scales an over-allocation down, Radd returns a
//!    shortfall to the fixed-share heirs
//!
//! Within a phase, each rule only looks at the counts left by the blocking
//! phase, so rules can be tested one at a time.

use crate::fraction::Fraction;
use crate::heir::HeirCategory;
use crate::ledger::Ledger;
use crate::share::{ShareEntry, BALANCE_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::fmt;

use HeirCategory::*;

/// What happens to the shortfall when only spouses inherit
///
/// Schools differ here. Returning the residue to the spouses matches modern
/// personal-status practice; classically it escheats to the public treasury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpouseOnlyResidue {
    /// Spouses take the whole estate, in proportion to their shares
    #[default]
    ReturnToSpouses,
    /// Shortfall stays unassigned (public treasury)
    LeaveUnassigned,
}

/// Rule phase, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Blocking,
    FixedShare,
    Residuary,
    Correction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingRule {
    /// Father excludes the paternal grandfather and grandmother
    FatherExcludesGrandparents,
    /// Mother excludes the maternal grandmother
    MotherExcludesMaternalGrandmother,
    /// Father or son excludes every sibling
    FatherOrSonExcludesSiblings,
    /// Paternal grandfather, standing in for the father, excludes every sibling
    GrandfatherExcludesSiblings,
    /// Full brother excludes paternal half-siblings
    FullBrotherExcludesPaternalSiblings,
    /// Any descendant or male ascendant excludes maternal half-siblings
    DescendantOrMaleAscendantExcludesMaternalSiblings,
    /// Son excludes the son's son
    SonExcludesGrandson,
    /// Son's son excludes every sibling
    GrandsonExcludesSiblings,
    /// Mother excludes the paternal grandmother too
    MotherExcludesPaternalGrandmother,
    /// Two full sisters exhaust the two thirds; paternal sisters get nothing
    /// unless a paternal brother makes them residuary
    FullSistersExcludePaternalSisters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedShareRule {
    Husband,
    Wife,
    Father,
    Mother,
    Daughters,
    FullSisters,
    PaternalGrandfather,
    Grandmothers,
    MaternalSiblings,
    PaternalSisters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResiduaryRule {
    SonsWithDaughters,
    Grandsons,
    Father,
    PaternalGrandfather,
    FullBrothersWithSisters,
    SistersWithDaughters,
    PaternalBrothersWithSisters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionRule {
    /// 'Awl
    ProportionalReduction,
    /// Radd
    ResidueReturn { spouse_only: SpouseOnlyResidue },
}

/// One step of the distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Block(BlockingRule),
    Fixed(FixedShareRule),
    Residuary(ResiduaryRule),
    Correction(CorrectionRule),
}

/// The classical rule set, in application order
pub fn classical_rules(spouse_only: SpouseOnlyResidue) -> Vec<Rule> {
    vec![
        Rule::Block(BlockingRule::FatherExcludesGrandparents),
        Rule::Block(BlockingRule::MotherExcludesMaternalGrandmother),
        Rule::Block(BlockingRule::FatherOrSonExcludesSiblings),
        Rule::Block(BlockingRule::GrandfatherExcludesSiblings),
        Rule::Block(BlockingRule::FullBrotherExcludesPaternalSiblings),
        Rule::Block(BlockingRule::DescendantOrMaleAscendantExcludesMaternalSiblings),
        Rule::Block(BlockingRule::SonExcludesGrandson),
        Rule::Block(BlockingRule::GrandsonExcludesSiblings),
        Rule::Block(BlockingRule::MotherExcludesPaternalGrandmother),
        Rule::Block(BlockingRule::FullSistersExcludePaternalSisters),
        Rule::Fixed(FixedShareRule::Husband),
        Rule::Fixed(FixedShareRule::Wife),
        Rule::Fixed(FixedShareRule::Father),
        Rule::Fixed(FixedShareRule::Mother),
        Rule::Fixed(FixedShareRule::Daughters),
        Rule::Fixed(FixedShareRule::FullSisters),
        Rule::Fixed(FixedShareRule::PaternalGrandfather),
        Rule::Fixed(FixedShareRule::Grandmothers),
        Rule::Fixed(FixedShareRule::MaternalSiblings),
        Rule::Fixed(FixedShareRule::PaternalSisters),
        Rule::Residuary(ResiduaryRule::SonsWithDaughters),
        Rule::Residuary(ResiduaryRule::Grandsons),
        Rule::Residuary(ResiduaryRule::Father),
        Rule::Residuary(ResiduaryRule::PaternalGrandfather),
        Rule::Residuary(ResiduaryRule::FullBrothersWithSisters),
        Rule::Residuary(ResiduaryRule::SistersWithDaughters),
        Rule::Residuary(ResiduaryRule::PaternalBrothersWithSisters),
        Rule::Correction(CorrectionRule::ProportionalReduction),
        Rule::Correction(CorrectionRule::ResidueReturn { spouse_only }),
    ]
}

impl Rule {
    pub fn phase(&self) -> Phase {
        match self {
            Rule::Block(_) => Phase::Blocking,
            Rule::Fixed(_) => Phase::FixedShare,
            Rule::Residuary(_) => Phase::Residuary,
            Rule::Correction(_) => Phase::Correction,
        }
    }

    pub fn apply(&self, ledger: &mut Ledger) {
        match self {
            Rule::Block(rule) => rule.apply(ledger),
            Rule::Fixed(rule) => rule.apply(ledger),
            Rule::Residuary(rule) => rule.apply(ledger),
            Rule::Correction(rule) => rule.apply(ledger),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Block(rule) => write!(f, "blocking:{:?}", rule),
            Rule::Fixed(rule) => write!(f, "fixed:{:?}", rule),
            Rule::Residuary(rule) => write!(f, "residuary:{:?}", rule),
            Rule::Correction(rule) => write!(f, "correction:{:?}", rule),
        }
    }
}

// ============================================================================
// Blocking (Hajb)
// ============================================================================

impl BlockingRule {
    pub fn apply(&self, ledger: &mut Ledger) {
        match self {
            BlockingRule::FatherExcludesGrandparents => {
                if ledger.has(Father) {
                    ledger.exclude(PaternalGrandfather, "excluded by the father");
                    ledger.exclude(PaternalGrandmother, "excluded by the father");
                }
            }
            BlockingRule::MotherExcludesMaternalGrandmother => {
                if ledger.has(Mother) {
                    ledger.exclude(MaternalGrandmother, "excluded by the mother");
                }
            }
            BlockingRule::FatherOrSonExcludesSiblings => {
                let reason = if ledger.has(Father) {
                    "excluded by the father"
                } else if ledger.has(Son) {
                    "excluded by a son"
                } else {
                    return;
                };
                for sibling in HeirCategory::SIBLINGS {
                    ledger.exclude(sibling, reason);
                }
            }
            BlockingRule::GrandfatherExcludesSiblings => {
                if ledger.has(PaternalGrandfather) {
                    for sibling in HeirCategory::SIBLINGS {
                        ledger.exclude(sibling, "excluded by the paternal grandfather");
                    }
                }
            }
            BlockingRule::FullBrotherExcludesPaternalSiblings => {
                if ledger.has(FullBrother) {
                    ledger.exclude(PaternalBrother, "excluded by a full brother");
                    ledger.exclude(PaternalSister, "excluded by a full brother");
                }
            }
            BlockingRule::DescendantOrMaleAscendantExcludesMaternalSiblings => {
                let reason = if ledger.heirs.has_descendant() {
                    "excluded by a descendant"
                } else if ledger.heirs.has_male_ascendant() {
                    "excluded by a male ascendant"
                } else {
                    return;
                };
                ledger.exclude(MaternalBrother, reason);
                ledger.exclude(MaternalSister, reason);
            }
            BlockingRule::SonExcludesGrandson => {
                if ledger.has(Son) {
                    ledger.exclude(PaternalGrandson, "excluded by a son");
                }
            }
            BlockingRule::GrandsonExcludesSiblings => {
                if ledger.has(PaternalGrandson) {
                    for sibling in HeirCategory::SIBLINGS {
                        ledger.exclude(sibling, "excluded by a son's son");
                    }
                }
            }
            BlockingRule::MotherExcludesPaternalGrandmother => {
                if ledger.has(Mother) {
                    ledger.exclude(PaternalGrandmother, "excluded by the mother");
                }
            }
            BlockingRule::FullSistersExcludePaternalSisters => {
                if ledger.count(FullSister) >= 2
                    && !ledger.has(PaternalBrother)
                    && !ledger.has(Daughter)
                {
                    ledger.exclude(PaternalSister, "two thirds taken by the full sisters");
                }
            }
        }
    }
}

// ============================================================================
// Fixed shares (Fard)
// ============================================================================

impl FixedShareRule {
    pub fn apply(&self, ledger: &mut Ledger) {
        match self {
            FixedShareRule::Husband => {
                if !ledger.has(Husband) {
                    return;
                }
                let (share, note) = spouse_share(ledger, Fraction::QUARTER, Fraction::HALF);
                assign_fixed(ledger, Husband, ledger.count(Husband), share, note);
            }
            FixedShareRule::Wife => {
                if !ledger.has(Wife) {
                    return;
                }
                let (share, note) = spouse_share(ledger, Fraction::EIGHTH, Fraction::QUARTER);
                assign_fixed(ledger, Wife, ledger.count(Wife), share, note);
            }
            FixedShareRule::Father => ascendant_fixed_share(ledger, Father),
            FixedShareRule::PaternalGrandfather => ascendant_fixed_share(ledger, PaternalGrandfather),
            FixedShareRule::Mother => {
                if !ledger.has(Mother) {
                    return;
                }
                let (share, note) =
                    if ledger.heirs.has_descendant() || ledger.heirs.sibling_count() > 1 {
                        (
                            Fraction::SIXTH,
                            "a descendant or more than one sibling inherits",
                        )
                    } else {
                        (
                            Fraction::THIRD,
                            "no descendant and no more than one sibling",
                        )
                    };
                assign_fixed(ledger, Mother, 1, share, note);
            }
            FixedShareRule::Daughters => {
                if ledger.has(Son) {
                    return;
                }
                sole_or_pooled(
                    ledger,
                    Daughter,
                    "sole daughter with no son",
                    "daughters with no son",
                );
            }
            FixedShareRule::FullSisters => {
                if ledger.has(FullBrother) || ledger.has(Daughter) {
                    return;
                }
                sole_or_pooled(
                    ledger,
                    FullSister,
                    "sole full sister",
                    "full sisters share two thirds",
                );
            }
            FixedShareRule::Grandmothers => {
                let heads = ledger.heirs.total_of(&[PaternalGrandmother, MaternalGrandmother]);
                if heads == 0 {
                    return;
                }
                for category in [PaternalGrandmother, MaternalGrandmother] {
                    let count = ledger.count(category);
                    if count == 0 {
                        continue;
                    }
                    let share = Fraction::SIXTH.portion(count as u64, heads);
                    let note = if count as u64 == heads {
                        "no mother inherits"
                    } else {
                        "grandmothers share one sixth"
                    };
                    assign_fixed(ledger, category, count, share, note);
                }
            }
            FixedShareRule::MaternalSiblings => {
                let heads = ledger.heirs.total_of(&[MaternalBrother, MaternalSister]);
                if heads == 0 {
                    return;
                }
                let (pool, note) = if heads == 1 {
                    (Fraction::SIXTH, "sole maternal sibling")
                } else {
                    (Fraction::THIRD, "maternal siblings share one third equally")
                };
                for category in [MaternalBrother, MaternalSister] {
                    let count = ledger.count(category);
                    if count > 0 {
                        let share = pool.portion(count as u64, heads);
                        assign_fixed(ledger, category, count, share, note);
                    }
                }
            }
            FixedShareRule::PaternalSisters => {
                if ledger.has(PaternalBrother) || ledger.has(Daughter) {
                    return;
                }
                match ledger.count(FullSister) {
                    0 => sole_or_pooled(
                        ledger,
                        PaternalSister,
                        "sole paternal sister",
                        "paternal sisters share two thirds",
                    ),
                    1 => {
                        let count = ledger.count(PaternalSister);
                        if count > 0 {
                            assign_fixed(
                                ledger,
                                PaternalSister,
                                count,
                                Fraction::SIXTH,
                                "completing two thirds with one full sister",
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn assign_fixed(
    ledger: &mut Ledger,
    category: HeirCategory,
    count: u32,
    share: Fraction,
    note: &str,
) {
    ledger.assign(ShareEntry::new(
        category,
        count,
        share.to_string(),
        share.percent(),
        format!("Fixed share: {}", note),
    ));
}

/// Husband or wife: the smaller share when a descendant inherits
fn spouse_share(
    ledger: &Ledger,
    with_descendant: Fraction,
    without_descendant: Fraction,
) -> (Fraction, &'static str) {
    if ledger.heirs.has_descendant() {
        (with_descendant, "a descendant inherits")
    } else {
        (without_descendant, "no descendant inherits")
    }
}

/// 1/2 for one head, 2/3 pooled for two or more
fn sole_or_pooled(ledger: &mut Ledger, category: HeirCategory, sole: &str, pooled: &str) {
    match ledger.count(category) {
        0 => {}
        1 => assign_fixed(ledger, category, 1, Fraction::HALF, sole),
        n => assign_fixed(ledger, category, n, Fraction::TWO_THIRDS, pooled),
    }
}

/// Father, or the paternal grandfather in his place
fn ascendant_fixed_share(ledger: &mut Ledger, category: HeirCategory) {
    if !ledger.has(category) {
        return;
    }
    if ledger.heirs.has_male_descendant() {
        assign_fixed(ledger, category, 1, Fraction::SIXTH, "a male descendant inherits");
    } else if ledger.has(Daughter) {
        assign_fixed(
            ledger,
            category,
            1,
            Fraction::SIXTH,
            "only female descendants inherit",
        );
    }
    // No descendant at all: residue only, assigned in the residuary phase.
}

// ============================================================================
// Residuary (Ta'sib)
// ============================================================================

impl ResiduaryRule {
    /// Categories this rule would make residuary
    fn claimants(&self) -> &'static [HeirCategory] {
        match self {
            ResiduaryRule::SonsWithDaughters => &[Son],
            ResiduaryRule::Grandsons => &[PaternalGrandson],
            ResiduaryRule::Father => &[],
            ResiduaryRule::PaternalGrandfather => &[],
            ResiduaryRule::FullBrothersWithSisters => &[FullBrother, FullSister],
            ResiduaryRule::SistersWithDaughters => &[FullSister, PaternalSister],
            ResiduaryRule::PaternalBrothersWithSisters => &[PaternalBrother, PaternalSister],
        }
    }

    pub fn apply(&self, ledger: &mut Ledger) {
        if ledger.residuary_found {
            // A closer residuary heir took the residue; anyone this rule would
            // have served and who holds no fixed share is displaced.
            for &category in self.claimants() {
                if !ledger.entries.iter().any(|e| e.category == category) {
                    ledger.exclude(category, "residue taken by a closer residuary heir");
                }
            }
            return;
        }
        match self {
            ResiduaryRule::SonsWithDaughters => agnatic_residue(
                ledger,
                Son,
                Daughter,
                "Residuary with the daughters, a son takes twice a daughter's portion",
                "Residuary alongside the sons",
            ),
            ResiduaryRule::Grandsons => {
                agnatic_residue(ledger, PaternalGrandson, Daughter, "Residuary: son's son", "")
            }
            ResiduaryRule::Father => ascendant_residue(ledger, Father),
            ResiduaryRule::PaternalGrandfather => ascendant_residue(ledger, PaternalGrandfather),
            ResiduaryRule::FullBrothersWithSisters => agnatic_residue(
                ledger,
                FullBrother,
                FullSister,
                "Residuary with the full sisters, a brother takes twice a sister's portion",
                "Residuary alongside the full brothers",
            ),
            ResiduaryRule::SistersWithDaughters => {
                if !ledger.has(Daughter) {
                    return;
                }
                let sisters = if ledger.has(FullSister) {
                    FullSister
                } else if ledger.has(PaternalSister) && !ledger.has(PaternalBrother) {
                    PaternalSister
                } else {
                    return;
                };
                let residue = ledger.residue();
                ledger.residuary_found = true;
                ledger.assign(ShareEntry::new(
                    sisters,
                    ledger.count(sisters),
                    "residue",
                    residue,
                    "Residuary together with the daughters",
                ));
            }
            ResiduaryRule::PaternalBrothersWithSisters => agnatic_residue(
                ledger,
                PaternalBrother,
                PaternalSister,
                "Residuary with the paternal sisters, a brother takes twice a sister's portion",
                "Residuary alongside the paternal brothers",
            ),
        }
    }
}

/// Split the residue between males and females at 2:1 per head
///
/// The `female` category only joins the split when it has not already taken
/// a fixed share.
fn agnatic_residue(
    ledger: &mut Ledger,
    male: HeirCategory,
    female: HeirCategory,
    male_note: &str,
    female_note: &str,
) {
    let males = ledger.count(male);
    if males == 0 {
        return;
    }
    let females = if ledger.entries.iter().any(|e| e.category == female) {
        0
    } else {
        ledger.count(female)
    };

    let residue = ledger.residue();
    let male_parts = males as f64 * 2.0;
    let total_parts = male_parts + females as f64;
    ledger.residuary_found = true;

    let male_note = if females == 0 {
        "Residuary"
    } else {
        male_note
    };
    ledger.assign(ShareEntry::new(
        male,
        males,
        format!("residue ({} parts)", males as u64 * 2),
        residue * male_parts / total_parts,
        male_note,
    ));
    if females > 0 {
        ledger.assign(ShareEntry::new(
            female,
            females,
            format!("residue ({} parts)", females),
            residue * females as f64 / total_parts,
            female_note,
        ));
    }
}

/// Father (or paternal grandfather) takes whatever is left, if anything
fn ascendant_residue(ledger: &mut Ledger, category: HeirCategory) {
    let residue = ledger.residue();
    if !ledger.has(category) || residue <= 0.0 {
        return;
    }
    ledger.residuary_found = true;
    match ledger.entries.iter().position(|e| e.category == category) {
        Some(idx) => {
            let entry = &mut ledger.entries[idx];
            entry.percentage += residue;
            entry.fraction = format!("{} + residue", entry.fraction);
            entry.annotate("+ residue as residuary");
            ledger.remaining -= residue;
        }
        None => ledger.assign(ShareEntry::new(
            category,
            1,
            "residue",
            residue,
            "Residuary: no descendant inherits",
        )),
    }
    log::debug!("{} takes residue {:.4}%", category, residue);
}

// ============================================================================
// Correction ('Awl / Radd)
// ============================================================================

impl CorrectionRule {
    pub fn apply(&self, ledger: &mut Ledger) {
        match self {
            CorrectionRule::ProportionalReduction => {
                let total = ledger.total();
                if total <= 100.0 + BALANCE_TOLERANCE {
                    return;
                }
                let factor = 100.0 / total;
                for entry in &mut ledger.entries {
                    entry.percentage *= factor;
                    entry.annotate("(reduced by 'awl)");
                }
                ledger.proportionally_reduced = true;
                log::debug!("'awl: shares summed to {:.4}%, scaled by {:.6}", total, factor);
            }
            CorrectionRule::ResidueReturn { spouse_only } => {
                let total = ledger.total();
                if ledger.residuary_found
                    || ledger.entries.is_empty()
                    || total >= 100.0 - BALANCE_TOLERANCE
                {
                    return;
                }
                let shortfall = 100.0 - total;
                let others: f64 = ledger
                    .entries
                    .iter()
                    .filter(|e| !e.is_spouse())
                    .map(|e| e.percentage)
                    .sum();

                if others > 0.0 {
                    for entry in ledger.entries.iter_mut().filter(|e| !e.is_spouse()) {
                        entry.percentage += shortfall * entry.percentage / others;
                        entry.annotate("(radd)");
                    }
                    ledger.residue_returned = true;
                    log::debug!("radd: {:.4}% returned to fixed-share heirs", shortfall);
                    return;
                }

                match spouse_only {
                    SpouseOnlyResidue::ReturnToSpouses if total > 0.0 => {
                        for entry in &mut ledger.entries {
                            entry.percentage = 100.0 * entry.percentage / total;
                            entry.annotate("(radd: no other heir)");
                        }
                        ledger.residue_returned = true;
                        log::debug!("radd: {:.4}% returned to the spouses", shortfall);
                    }
                    _ => {
                        ledger.unassigned = shortfall;
                        log::debug!("{:.4}% left unassigned (treasury)", shortfall);
                    }
                }
            }
        }
    }
}
