//! Bernoulli and binomial-count log-mass functions.
//!
//! Per-class outcome densities for binary data, in two parameterizations:
//! - probability scale, with deterministic boundary semantics at rate 0 or 1
//!   (a matching outcome contributes exactly 0.0, a mismatch NEG_INFINITY,
//!   never NaN);
//! - log-odds scale via softplus, which keeps full precision for rates near
//!   the boundary and serves callers that hold logit-scale parameters.

use super::stable::{log1p_exp, log_choose, log_sigmoid};

/// Log-mass of a single binary outcome at success rate `rate`.
///
/// Rates outside [0,1] (or NaN) return NaN; the caller is expected to have
/// rejected such parameter points before evaluating data terms.
pub fn bernoulli_log_pmf(outcome: bool, rate: f64) -> f64 {
    if rate.is_nan() || !(0.0..=1.0).contains(&rate) {
        return f64::NAN;
    }
    if outcome {
        if rate == 0.0 {
            return f64::NEG_INFINITY;
        }
        if rate == 1.0 {
            return 0.0;
        }
        rate.ln()
    } else {
        if rate == 1.0 {
            return f64::NEG_INFINITY;
        }
        if rate == 0.0 {
            return 0.0;
        }
        (-rate).ln_1p()
    }
}

/// Log-mass of a single binary outcome at log-odds `logit`.
///
/// `log P(1) = -softplus(-logit)`, `log P(0) = -softplus(logit)`; exact at
/// `logit = ±inf` where the probability-scale form would need special cases.
pub fn bernoulli_log_pmf_logit(outcome: bool, logit: f64) -> f64 {
    if outcome {
        log_sigmoid(logit)
    } else {
        log_sigmoid(-logit)
    }
}

/// Sufficient-statistic form: log-mass of `successes` ones and `failures`
/// zeros at success rate `rate`, without the binomial coefficient.
///
/// The coefficient depends only on the data and is dropped as an additive
/// constant of the log-posterior. Counts may be fractional (effective
/// counts); negative or NaN counts return NaN.
pub fn bernoulli_counts_log_pmf(successes: f64, failures: f64, rate: f64) -> f64 {
    if successes.is_nan() || failures.is_nan() || successes < 0.0 || failures < 0.0 {
        return f64::NAN;
    }
    if rate.is_nan() || !(0.0..=1.0).contains(&rate) {
        return f64::NAN;
    }
    // Boundary rates: 0 * log(0) is taken as 0 so a deterministic prediction
    // that matches the data contributes nothing rather than NaN.
    let success_part = if successes == 0.0 {
        0.0
    } else if rate == 0.0 {
        return f64::NEG_INFINITY;
    } else {
        successes * rate.ln()
    };
    let failure_part = if failures == 0.0 {
        0.0
    } else if rate == 1.0 {
        return f64::NEG_INFINITY;
    } else {
        failures * (-rate).ln_1p()
    };
    success_part + failure_part
}

/// Sufficient-statistic form on the log-odds scale.
///
/// `successes * log sigmoid(l) + failures * log sigmoid(-l)`; finite for all
/// finite `logit`, and exact at `±inf` when the matching count is zero.
pub fn bernoulli_counts_log_pmf_logit(successes: f64, failures: f64, logit: f64) -> f64 {
    if successes.is_nan() || failures.is_nan() || successes < 0.0 || failures < 0.0 {
        return f64::NAN;
    }
    if logit.is_nan() {
        return f64::NAN;
    }
    let success_part = if successes == 0.0 {
        0.0
    } else {
        -successes * log1p_exp(-logit)
    };
    let failure_part = if failures == 0.0 {
        0.0
    } else {
        -failures * log1p_exp(logit)
    };
    success_part + failure_part
}

/// Full binomial log-pmf: k successes in n trials at success rate `rate`,
/// including the binomial coefficient.
pub fn binomial_log_pmf(k: f64, n: f64, rate: f64) -> f64 {
    if k.is_nan() || n.is_nan() || k < 0.0 || n < 0.0 || k > n {
        return f64::NAN;
    }
    log_choose(n, k) + bernoulli_counts_log_pmf(k, n - k, rate)
}
