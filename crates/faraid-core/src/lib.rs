//! Fara'id Core
//!
//! Islamic inheritance distribution: given a household of heirs and an estate
//! value, compute each heir category's share under the classical fixed-share
//! and residuary rules.
//!
//! # Concepts
//!
//! - **Hajb**: closer relatives exclude farther ones
//! - **Fard**: fixed shares (1/2, 1/4, 1/8, 2/3, 1/3, 1/6)
//! - **Ta'sib**: residuary heirs take what the fixed shares leave
//! - **'Awl**: shares over 100% are scaled down proportionally
//! - **Radd**: a shortfall with no residuary heir is returned to the
//!   fixed-share heirs (spouses last)
//!
//! # Example
//!
//! ```
//! use faraid_core::{compute, HeirCategory, HeirComposition};
//!
//! let heirs = HeirComposition::new()
//!     .with(HeirCategory::Husband, 1)
//!     .with(HeirCategory::Daughter, 1);
//!
//! let result = compute(&heirs, 1200.0);
//!
//! assert!(result.is_residue_returned);
//! assert_eq!(result.entry(HeirCategory::Husband).unwrap().amount, 300.0);
//! assert_eq!(result.entry(HeirCategory::Daughter).unwrap().amount, 900.0);
//! ```

pub mod engine;
pub mod expand;
pub mod fraction;
pub mod heir;
pub mod ledger;
pub mod rules;
pub mod share;

// Re-exports
pub use engine::{compute, EngineOptions, InheritanceEngine};
pub use expand::{expand_individuals, HeirNames, IndividualShare};
pub use fraction::Fraction;
pub use heir::{HeirCategory, HeirComposition, HeirError};
pub use ledger::Exclusion;
pub use rules::SpouseOnlyResidue;
pub use share::{DistributionResult, ShareEntry, BALANCE_TOLERANCE};
