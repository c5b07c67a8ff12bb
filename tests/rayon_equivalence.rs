#![cfg(feature = "rayon")]

//! Parallel batch estimation must match the sequential path exactly.

use scintiloc::{
    BasisSpec, CalibrationFunction, CalibrationSamples, CameraGeometry, DetectorEvent, Estimator,
    SampleGrid,
};

fn sampled_grid(side: usize, f: impl Fn(f64, f64) -> f64) -> SampleGrid {
    let scale = (side - 1) as f64;
    SampleGrid::from_fn(side, side, |ix, iy| f(ix as f64 / scale, iy as f64 / scale)).unwrap()
}

fn make_estimator() -> Estimator {
    let side = 15;
    let spec = BasisSpec::new(3, 3).unwrap();
    let centers = [0.3, 0.7];
    let mut mdrf = Vec::new();
    for &cy in &centers {
        for &cx in &centers {
            mdrf.push(sampled_grid(side, |x, y| {
                4.0 + 60.0 * (-((x - cx).powi(2) + (y - cy).powi(2)) / 0.12).exp()
            }));
        }
    }
    let thresh = sampled_grid(side, |_, _| -200.0);
    let samples = CalibrationSamples::new(mdrf, thresh, vec![1.0, 1.1, 0.9, 1.05]).unwrap();
    let calib = CalibrationFunction::fit(&samples, spec).unwrap();
    Estimator::new(calib).with_geometry(CameraGeometry {
        channels: 4,
        samples_per_axis: side,
        pitch_mm: 1.5,
    })
}

fn make_events(count: usize) -> Vec<DetectorEvent> {
    (0..count)
        .map(|i| {
            let counts = (0..4)
                .map(|channel| (((i * 31 + channel * 17) ^ (i * 7)) % 80) as u16)
                .collect();
            DetectorEvent::new(counts)
        })
        .collect()
}

#[test]
fn parallel_batch_matches_sequential_batch() {
    let estimator = make_estimator();
    let events = make_events(64);
    let sequential = estimator.estimate_batch(&events);
    let parallel = estimator.estimate_batch_par(&events);
    assert_eq!(sequential.len(), parallel.len());
    for (index, (a, b)) in sequential.iter().zip(&parallel).enumerate() {
        assert_eq!(a, b, "event {index} diverged");
    }
}
