//! Detector geometry and the unit-square to physical mapping.

/// Physical layout of the camera: channel count, calibration sampling, and
/// detector pitch.
///
/// The estimator works on the unit square; positions are reported in
/// detector coordinates through the affine map derived from the sampled
/// extent, centered on the detector plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraGeometry {
    /// Number of readout channels (photomultiplier tubes).
    pub channels: usize,
    /// Side length of the square calibration sample grids.
    pub samples_per_axis: usize,
    /// Calibration sample pitch in millimeters.
    pub pitch_mm: f64,
}

impl CameraGeometry {
    /// Physical side length of the detector plane in millimeters.
    pub fn extent(&self) -> f64 {
        self.samples_per_axis as f64 * self.pitch_mm
    }

    /// Lowest physical coordinate on either axis.
    pub fn min_pos(&self) -> f64 {
        -self.extent() / 2.0
    }

    /// Highest physical coordinate on either axis.
    pub fn max_pos(&self) -> f64 {
        self.extent() / 2.0
    }

    /// Maps a unit-interval coordinate to physical detector coordinates.
    pub fn to_physical(&self, u: f64) -> f64 {
        self.min_pos() + u * (self.max_pos() - self.min_pos())
    }
}

impl Default for CameraGeometry {
    /// Nine-channel camera with 79x79 calibration samples at 1.5 mm pitch.
    fn default() -> Self {
        Self {
            channels: 9,
            samples_per_axis: 79,
            pitch_mm: 1.5,
        }
    }
}
