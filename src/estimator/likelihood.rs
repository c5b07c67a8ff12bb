//! Poisson log-likelihood terms.

use crate::calib::CalibrationFunction;
use statrs::function::gamma::ln_gamma;

/// Log-likelihood of gain-normalized counts at `(x, y)`, up to the additive
/// normalization constant.
///
/// Each channel contributes `n * ln(r) - r` with `r` the mean response at
/// the candidate point. The term is dropped only when both the count and
/// the response are exactly zero (0 * ln 0 contributes nothing); a zero
/// count against a nonzero response still pays the `-r` term.
pub(crate) fn score(calib: &CalibrationFunction, normalized: &[f64], x: f64, y: f64) -> f64 {
    let mut log_like = 0.0;
    for (channel, &count) in normalized.iter().enumerate() {
        let response = calib.mdrf(channel).evaluate(x, y);
        if count != 0.0 || response != 0.0 {
            log_like += count * response.ln() - response;
        }
    }
    log_like
}

/// Additive Poisson normalization `sum ln Gamma(n + 1)` over channels with
/// a positive count.
pub(crate) fn normalization(normalized: &[f64]) -> f64 {
    normalized
        .iter()
        .filter(|&&count| count > 0.0)
        .map(|&count| ln_gamma(count + 1.0))
        .sum()
}
