//! ScintiLoc estimates scintillation-event positions on a gamma-camera
//! detector plane by maximum likelihood.
//!
//! Per-channel mean detector response functions are fitted once as
//! tensor-product B-spline surfaces from sampled calibration data; each
//! event is then localized by a contracting-grid search over the Poisson
//! log-likelihood and checked against a fitted rejection-threshold surface.
//! Batch estimation is optionally parallel via the `rayon` feature.

pub mod calib;
pub mod camera;
pub mod estimator;
pub mod event;
pub mod grid;
pub mod io;
pub mod spline;
mod trace;
pub mod util;

pub use calib::{CalibrationFunction, CalibrationSamples};
pub use camera::CameraGeometry;
pub use estimator::{Estimator, SearchConfig};
pub use event::{DetectorEvent, EstimatedEvent};
pub use grid::SampleGrid;
pub use spline::basis::BasisSpec;
pub use spline::fit::{approximate_surface, interpolate_surface, uniform_sites};
pub use spline::surface::SplineSurface;
pub use util::{ScintilocError, ScintilocResult};
