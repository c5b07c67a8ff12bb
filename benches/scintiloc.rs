use criterion::{criterion_group, criterion_main, Criterion};
use scintiloc::{
    BasisSpec, CalibrationFunction, CalibrationSamples, CameraGeometry, DetectorEvent, Estimator,
    SampleGrid,
};
use std::hint::black_box;

fn sampled_grid(side: usize, f: impl Fn(f64, f64) -> f64) -> SampleGrid {
    let scale = (side - 1) as f64;
    SampleGrid::from_fn(side, side, |ix, iy| f(ix as f64 / scale, iy as f64 / scale)).unwrap()
}

fn make_samples() -> CalibrationSamples {
    let side = 79;
    let centers = [0.25, 0.5, 0.75];
    let mut mdrf = Vec::new();
    for &cy in &centers {
        for &cx in &centers {
            mdrf.push(sampled_grid(side, |x, y| {
                5.0 + 120.0 * (-((x - cx).powi(2) + (y - cy).powi(2)) / 0.1).exp()
            }));
        }
    }
    let thresh = sampled_grid(side, |_, _| -60.0);
    CalibrationSamples::new(mdrf, thresh, vec![1.0; 9]).unwrap()
}

fn make_events(count: usize) -> Vec<DetectorEvent> {
    (0..count)
        .map(|i| {
            let counts = (0..9)
                .map(|channel| (((i * 29 + channel * 13) ^ (i * 5)) % 120) as u16)
                .collect();
            DetectorEvent::new(counts)
        })
        .collect()
}

fn bench_estimator(c: &mut Criterion) {
    let spec = BasisSpec::new(3, 10).unwrap();
    let samples = make_samples();

    c.bench_function("fit_calibration_9ch_79x79", |b| {
        b.iter(|| black_box(CalibrationFunction::fit(&samples, spec).unwrap()))
    });

    let calib = CalibrationFunction::fit(&samples, spec).unwrap();
    let estimator = Estimator::new(calib).with_geometry(CameraGeometry::default());
    let events = make_events(256);

    c.bench_function("estimate_single_event", |b| {
        b.iter(|| black_box(estimator.estimate(&events[0])))
    });

    c.bench_function("estimate_batch_256", |b| {
        b.iter(|| black_box(estimator.estimate_batch(&events)))
    });
}

criterion_group!(benches, bench_estimator);
criterion_main!(benches);
