//! Calibration sample grids and the fitted calibration function.
//!
//! The calibration function is built once from sampled data and then shared
//! read-only across all event evaluations.

use crate::grid::SampleGrid;
use crate::spline::basis::BasisSpec;
use crate::spline::fit::{approximate_surface, uniform_sites};
use crate::spline::surface::SplineSurface;
use crate::trace::{trace_event, trace_span};
use crate::util::{ScintilocError, ScintilocResult};

/// Raw calibration input: per-channel mean-response grids (already
/// gain-normalized), one rejection-threshold grid, and a positive gain
/// scalar per channel.
#[derive(Clone, Debug)]
pub struct CalibrationSamples {
    mdrf: Vec<SampleGrid>,
    thresh: SampleGrid,
    gains: Vec<f64>,
}

impl CalibrationSamples {
    /// Validates shapes and assembles the calibration input.
    ///
    /// Every grid must be square with the same side length as the threshold
    /// grid, and there must be exactly one positive gain per channel.
    pub fn new(
        mdrf: Vec<SampleGrid>,
        thresh: SampleGrid,
        gains: Vec<f64>,
    ) -> ScintilocResult<Self> {
        if mdrf.is_empty() {
            return Err(ScintilocError::CalibrationShape("no response channels"));
        }
        if mdrf.len() != gains.len() {
            return Err(ScintilocError::CalibrationShape(
                "channel and gain counts differ",
            ));
        }
        let side = thresh.width();
        if thresh.height() != side {
            return Err(ScintilocError::CalibrationShape(
                "threshold grid is not square",
            ));
        }
        for grid in &mdrf {
            if grid.width() != side || grid.height() != side {
                return Err(ScintilocError::CalibrationShape(
                    "response grid shape differs from threshold grid",
                ));
            }
        }
        if gains.iter().any(|&gain| !(gain > 0.0)) {
            return Err(ScintilocError::CalibrationShape("gains must be positive"));
        }
        Ok(Self {
            mdrf,
            thresh,
            gains,
        })
    }

    /// Number of response channels.
    pub fn num_channels(&self) -> usize {
        self.mdrf.len()
    }

    /// Side length of the square sample grids.
    pub fn side(&self) -> usize {
        self.thresh.width()
    }

    /// Mean-response grid for one channel.
    pub fn mdrf(&self, channel: usize) -> &SampleGrid {
        &self.mdrf[channel]
    }

    /// Rejection-threshold grid.
    pub fn thresh(&self) -> &SampleGrid {
        &self.thresh
    }

    /// Per-channel gains.
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }
}

/// Fitted calibration: one mean-response surface per channel, the
/// rejection-threshold surface, and per-channel gains.
#[derive(Clone, Debug)]
pub struct CalibrationFunction {
    mdrf: Vec<SplineSurface>,
    thresh: SplineSurface,
    gains: Vec<f64>,
}

impl CalibrationFunction {
    /// Fits every channel surface and the threshold surface by least
    /// squares at uniform sites `i / (S - 1)`.
    pub fn fit(samples: &CalibrationSamples, spec: BasisSpec) -> ScintilocResult<Self> {
        let _span = trace_span!(
            "fit_calibration",
            channels = samples.num_channels(),
            side = samples.side()
        )
        .entered();
        let sites = uniform_sites(samples.side());
        let mut mdrf = Vec::with_capacity(samples.num_channels());
        for channel in 0..samples.num_channels() {
            mdrf.push(approximate_surface(
                spec,
                spec,
                &sites,
                &sites,
                samples.mdrf(channel),
            )?);
        }
        let thresh = approximate_surface(spec, spec, &sites, &sites, samples.thresh())?;
        trace_event!("calibration_fitted", channels = mdrf.len());
        Ok(Self {
            mdrf,
            thresh,
            gains: samples.gains().to_vec(),
        })
    }

    /// Assembles a calibration from already-built surfaces, for coefficient
    /// import paths and synthetic setups.
    pub fn from_parts(
        mdrf: Vec<SplineSurface>,
        thresh: SplineSurface,
        gains: Vec<f64>,
    ) -> ScintilocResult<Self> {
        if mdrf.is_empty() {
            return Err(ScintilocError::CalibrationShape("no response channels"));
        }
        if mdrf.len() != gains.len() {
            return Err(ScintilocError::CalibrationShape(
                "channel and gain counts differ",
            ));
        }
        if gains.iter().any(|&gain| !(gain > 0.0)) {
            return Err(ScintilocError::CalibrationShape("gains must be positive"));
        }
        Ok(Self {
            mdrf,
            thresh,
            gains,
        })
    }

    /// Number of response channels.
    pub fn num_channels(&self) -> usize {
        self.mdrf.len()
    }

    /// Mean-response surface for one channel.
    pub fn mdrf(&self, channel: usize) -> &SplineSurface {
        &self.mdrf[channel]
    }

    /// Rejection-threshold surface.
    pub fn thresh(&self) -> &SplineSurface {
        &self.thresh
    }

    /// Gain for one channel.
    pub fn gain(&self, channel: usize) -> f64 {
        self.gains[channel]
    }

    /// Per-channel gains.
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }
}
