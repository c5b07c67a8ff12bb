//! The contracting-grid refinement loop.

use crate::calib::CalibrationFunction;
use crate::estimator::likelihood;
use crate::estimator::{strictly_inside, SearchConfig};

/// Result of the contracting-grid search in unit-square coordinates.
pub(crate) struct SearchOutcome {
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Score of the cell selected in the last iteration, without the
    /// Poisson normalization term.
    pub(crate) score: f64,
}

/// Runs the fixed-iteration contracting-grid search from the domain center.
///
/// Each iteration scores every cell of a `grid_size` x `grid_size` window
/// straddling the current estimate symmetrically, moves to the best cell
/// and shrinks the spacing by the contraction factor. Cells outside the
/// open unit square score negative infinity, so they are never selected
/// while any in-domain cell remains; ties go to the first cell in x-major
/// scan order.
pub(crate) fn contracting_search(
    calib: &CalibrationFunction,
    normalized: &[f64],
    config: &SearchConfig,
) -> SearchOutcome {
    let half = (config.grid_size as f64 - 1.0) / 2.0;
    let mut x = 0.5;
    let mut y = 0.5;
    let mut step = 1.0 / config.grid_size as f64;
    let mut score = f64::NEG_INFINITY;

    for _ in 0..config.iterations {
        let mut best = f64::NEG_INFINITY;
        let mut best_ix = 0usize;
        let mut best_iy = 0usize;
        for ix in 0..config.grid_size {
            let test_x = x + (ix as f64 - half) * step;
            for iy in 0..config.grid_size {
                let test_y = y + (iy as f64 - half) * step;
                let cell = if strictly_inside(test_x) && strictly_inside(test_y) {
                    likelihood::score(calib, normalized, test_x, test_y)
                } else {
                    f64::NEG_INFINITY
                };
                if cell > best {
                    best = cell;
                    best_ix = ix;
                    best_iy = iy;
                }
            }
        }
        x += (best_ix as f64 - half) * step;
        y += (best_iy as f64 - half) * step;
        score = best;
        step /= config.contraction;
    }

    SearchOutcome { x, y, score }
}
