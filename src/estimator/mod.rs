//! Maximum-likelihood position estimation by contracting-grid search.
//!
//! Each event is localized by a fixed number of local exhaustive searches
//! on a small grid window that re-centers on the best candidate and shrinks
//! geometrically. The fixed iteration count bounds the work per event, and
//! the calibration is read-only, so events are estimated independently; the
//! `rayon` feature adds a parallel batch entry point.

mod likelihood;
mod search;

use crate::calib::CalibrationFunction;
use crate::camera::CameraGeometry;
use crate::event::{DetectorEvent, EstimatedEvent};
use crate::trace::{trace_event, trace_span};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Membership test for the open unit interval. The boundary itself is
/// domain-exterior for the search.
pub(crate) fn strictly_inside(u: f64) -> bool {
    0.0 < u && u < 1.0
}

/// Contracting-grid search parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    /// Side length of the candidate window.
    pub grid_size: usize,
    /// Step shrink factor applied after every iteration.
    pub contraction: f64,
    /// Fixed number of refinement iterations.
    pub iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grid_size: 6,
            contraction: 1.75,
            iterations: 12,
        }
    }
}

/// Position estimator bound to a fitted calibration.
pub struct Estimator {
    calib: CalibrationFunction,
    search: SearchConfig,
    geometry: CameraGeometry,
}

impl Estimator {
    /// Creates an estimator with default search parameters and geometry.
    pub fn new(calib: CalibrationFunction) -> Self {
        Self {
            calib,
            search: SearchConfig::default(),
            geometry: CameraGeometry::default(),
        }
    }

    /// Replaces the search parameters.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Replaces the camera geometry used for the physical mapping.
    pub fn with_geometry(mut self, geometry: CameraGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// The calibration this estimator evaluates against.
    pub fn calibration(&self) -> &CalibrationFunction {
        &self.calib
    }

    /// Estimates the position of one event.
    ///
    /// The event must carry one count per calibration channel; input shape
    /// is the data source's responsibility and is not re-validated here.
    pub fn estimate(&self, event: &DetectorEvent) -> EstimatedEvent {
        debug_assert_eq!(event.num_channels(), self.calib.num_channels());
        let normalized: Vec<f64> = event
            .counts()
            .iter()
            .enumerate()
            .map(|(channel, &count)| f64::from(count) / self.calib.gain(channel))
            .collect();

        let outcome = search::contracting_search(&self.calib, &normalized, &self.search);

        let inside = strictly_inside(outcome.x) && strictly_inside(outcome.y);
        let (log_like, valid) = if inside {
            let log_like = outcome.score - likelihood::normalization(&normalized);
            let threshold = self.calib.thresh().evaluate(outcome.x, outcome.y);
            (log_like, log_like > threshold)
        } else {
            (f64::NEG_INFINITY, false)
        };

        EstimatedEvent {
            x: self.geometry.to_physical(outcome.x),
            y: self.geometry.to_physical(outcome.y),
            log_like,
            valid,
        }
    }

    /// Estimates a batch sequentially; output index `i` corresponds to
    /// input index `i`.
    pub fn estimate_batch(&self, events: &[DetectorEvent]) -> Vec<EstimatedEvent> {
        let _span = trace_span!("estimate_batch", events = events.len()).entered();
        let out: Vec<_> = events.iter().map(|event| self.estimate(event)).collect();
        trace_event!("batch_estimated", events = out.len());
        out
    }

    /// Estimates a batch across rayon workers, with the same index-addressed
    /// output as [`Self::estimate_batch`].
    #[cfg(feature = "rayon")]
    pub fn estimate_batch_par(&self, events: &[DetectorEvent]) -> Vec<EstimatedEvent> {
        let _span = trace_span!("estimate_batch", events = events.len(), parallel = true).entered();
        events.par_iter().map(|event| self.estimate(event)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{strictly_inside, Estimator, SearchConfig};
    use crate::calib::CalibrationFunction;
    use crate::event::DetectorEvent;
    use crate::spline::basis::BasisSpec;
    use crate::spline::surface::SplineSurface;

    #[test]
    fn the_unit_square_boundary_is_domain_exterior() {
        assert!(!strictly_inside(0.0));
        assert!(!strictly_inside(1.0));
        assert!(strictly_inside(f64::MIN_POSITIVE));
        assert!(strictly_inside(0.5));
        assert!(!strictly_inside(-0.1));
        assert!(!strictly_inside(1.1));
    }

    #[test]
    fn all_zero_calibration_yields_an_invalid_event() {
        let spec = BasisSpec::new(3, 2).unwrap();
        let calib = CalibrationFunction::from_parts(
            vec![SplineSurface::zero(spec, spec); 2],
            SplineSurface::constant(spec, spec, -1000.0),
            vec![1.0, 1.0],
        )
        .unwrap();
        let estimator = Estimator::new(calib).with_search(SearchConfig {
            grid_size: 4,
            contraction: 2.0,
            iterations: 3,
        });
        // Every candidate scores -inf, so the search drifts with the first
        // cell of each window and the event cannot come out valid.
        let event = DetectorEvent::new(vec![5, 0]);
        let estimated = estimator.estimate(&event);
        assert!(!estimated.valid);
        assert_eq!(estimated.log_like, f64::NEG_INFINITY);
    }

    #[test]
    fn gains_scale_the_normalized_counts() {
        let spec = BasisSpec::new(3, 2).unwrap();
        // A single peaked channel keeps the search inside the domain.
        let peaked = || {
            let n = spec.num_coefs();
            let mut coefs = vec![1.0; n * n];
            coefs[(n / 2) * n + n / 2] = 5.0;
            SplineSurface::from_coefs(spec, spec, coefs).unwrap()
        };
        let calib_unit = CalibrationFunction::from_parts(
            vec![peaked()],
            SplineSurface::constant(spec, spec, -1.0e6),
            vec![1.0],
        )
        .unwrap();
        let calib_halved = CalibrationFunction::from_parts(
            vec![peaked()],
            SplineSurface::constant(spec, spec, -1.0e6),
            vec![2.0],
        )
        .unwrap();
        let config = SearchConfig {
            grid_size: 4,
            contraction: 2.0,
            iterations: 4,
        };
        let halved = Estimator::new(calib_halved).with_search(config);
        let unit = Estimator::new(calib_unit).with_search(config);
        // Counts of 10 at gain 2 must match counts of 5 at gain 1.
        let a = halved.estimate(&DetectorEvent::new(vec![10]));
        let b = unit.estimate(&DetectorEvent::new(vec![5]));
        assert!(a.log_like.is_finite());
        assert_eq!(a.log_like, b.log_like);
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
        assert!(a.valid && b.valid);
    }
}
