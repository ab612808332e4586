//! Class-partition outcomes.
//!
//! The partition rule of a model maps a unit's observed covariates to the
//! subset of latent classes consistent with them. The result is a three-way
//! tagged variant so that every caller has to handle every case explicitly;
//! there is no fallthrough branch.

/// Which latent classes are consistent with a unit's observed covariates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    /// Exactly one class is consistent; the unit contributes its weighted
    /// class density directly, with no mixture.
    Determined(usize),
    /// Two or more classes are consistent; the unit contributes a
    /// log-sum-exp mixture over this subset.
    Ambiguous(Vec<usize>),
    /// The covariate pattern cannot occur under the structural assumptions.
    /// Valid input data never produces this; it is caught at load time as a
    /// fatal data error, never silently given zero probability.
    Impossible,
}

impl Partition {
    /// The consistent class subset, or None for an impossible pattern.
    pub fn classes(&self) -> Option<&[usize]> {
        match self {
            Partition::Determined(class) => Some(std::slice::from_ref(class)),
            Partition::Ambiguous(classes) => Some(classes),
            Partition::Impossible => None,
        }
    }

    /// Whether the pattern is structurally impossible.
    pub fn is_impossible(&self) -> bool {
        matches!(self, Partition::Impossible)
    }
}
