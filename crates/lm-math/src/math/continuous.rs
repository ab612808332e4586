//! Log-densities of the continuous distributions used as priors.
//!
//! Beta uses the shape parameterization, Gamma the rate parameterization
//! (`rate = 1/scale`), Normal the (mean, sd) parameterization.

use super::stable::{log_beta, log_gamma};

const LOG_2PI: f64 = 1.837_877_066_409_345_3;

/// Log of the Beta(alpha, beta) PDF at x.
///
/// Invalid shapes (or NaN anywhere) return NaN; x outside [0,1] returns
/// NEG_INFINITY. Boundary x follows the shape: the density diverges for
/// shape < 1, vanishes for shape > 1, and is finite for shape = 1.
pub fn beta_log_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        return match alpha.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Greater) => f64::NEG_INFINITY,
            _ => -log_beta(1.0, beta),
        };
    }
    if x == 1.0 {
        return match beta.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Greater) => f64::NEG_INFINITY,
            _ => -log_beta(alpha, 1.0),
        };
    }
    (alpha - 1.0) * x.ln() + (beta - 1.0) * (-x).ln_1p() - log_beta(alpha, beta)
}

/// Log of the Gamma(shape, rate) PDF at x.
pub fn gamma_log_pdf(x: f64, shape: f64, rate: f64) -> f64 {
    if x.is_nan() || shape.is_nan() || rate.is_nan() || shape <= 0.0 || rate <= 0.0 {
        return f64::NAN;
    }
    if x < 0.0 {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        return match shape.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Greater) => f64::NEG_INFINITY,
            _ => rate.ln(),
        };
    }
    shape * rate.ln() - log_gamma(shape) + (shape - 1.0) * x.ln() - rate * x
}

/// Log of the Normal(mean, sd) PDF at x.
pub fn normal_log_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    if x.is_nan() || mean.is_nan() || sd.is_nan() || sd <= 0.0 {
        return f64::NAN;
    }
    let z = (x - mean) / sd;
    -0.5 * (LOG_2PI + z * z) - sd.ln()
}
