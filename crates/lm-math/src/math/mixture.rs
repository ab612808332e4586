//! Log-domain combinators for finite mixtures over latent classes.
//!
//! A unit whose latent class is only partially observed contributes
//! `log( Σ_c exp(log_weight_c + log_density_c) )` over the classes consistent
//! with its observed covariates. The weights are the unconditional class-prior
//! probabilities; callers never renormalize them over the consistent subset.

use super::stable::log_sum_exp;

/// Marginal log-probability of one unit: combine (log-weight, log-density)
/// pairs for the consistent class subset.
///
/// A single pair returns `log_weight + log_density` exactly, with no
/// exp/ln round trip, so the fully determined case carries zero mixture
/// overhead. Empty input returns NEG_INFINITY; NaN propagates.
pub fn log_mix(terms: &[(f64, f64)]) -> f64 {
    match terms {
        [] => f64::NEG_INFINITY,
        [(lw, ld)] => lw + ld,
        _ => {
            let joint: Vec<f64> = terms.iter().map(|&(lw, ld)| lw + ld).collect();
            log_sum_exp(&joint)
        }
    }
}

/// Two-component mixture without allocating.
pub fn log_mix2(lw0: f64, ld0: f64, lw1: f64, ld1: f64) -> f64 {
    super::stable::log_add_exp(lw0 + ld0, lw1 + ld1)
}

/// Log-density of `repeats` conditionally independent replicates of a
/// sub-observation whose single-replicate log-density is `sub_log_density`.
///
/// On the log scale the product of replicates is an additive term, so a
/// sub-mixture value can be reused here and combined again at an outer
/// mixture level (two-level marginalization).
pub fn log_repeat(sub_log_density: f64, repeats: u32) -> f64 {
    if repeats == 0 {
        return 0.0;
    }
    f64::from(repeats) * sub_log_density
}
