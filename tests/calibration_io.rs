//! Round-trip tests for the binary file codecs.

use scintiloc::io::{
    load_calibration_samples, read_estimated_events, read_event_data, write_estimated_events,
};
use scintiloc::{CameraGeometry, EstimatedEvent};
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scintiloc_{}_{name}", std::process::id()))
}

#[test]
fn calibration_planes_are_gain_normalized_on_load() {
    let geometry = CameraGeometry {
        channels: 2,
        samples_per_axis: 3,
        pitch_mm: 1.0,
    };
    let mdrf_path = temp_path("mdrf.dat");
    let thresh_path = temp_path("thresh.dat");
    let gains_path = temp_path("gains.dat");

    let mut mdrf_bytes = Vec::new();
    for channel in 0..2 {
        for i in 0..9 {
            mdrf_bytes.extend_from_slice(&((channel * 100 + i) as f32).to_le_bytes());
        }
    }
    fs::write(&mdrf_path, &mdrf_bytes).unwrap();

    let mut thresh_bytes = Vec::new();
    for i in 0..9 {
        thresh_bytes.extend_from_slice(&(-(i as f32)).to_le_bytes());
    }
    fs::write(&thresh_path, &thresh_bytes).unwrap();

    let mut gains_bytes = Vec::new();
    gains_bytes.extend_from_slice(&2.0f32.to_le_bytes());
    gains_bytes.extend_from_slice(&4.0f32.to_le_bytes());
    fs::write(&gains_path, &gains_bytes).unwrap();

    let samples =
        load_calibration_samples(&mdrf_path, &thresh_path, &gains_path, &geometry).unwrap();
    assert_eq!(samples.num_channels(), 2);
    assert_eq!(samples.side(), 3);
    assert_eq!(samples.gains(), &[2.0, 4.0]);
    // Planes are stored row-major and divided by their channel gain.
    assert_eq!(samples.mdrf(0).get(2, 0), 1.0);
    assert_eq!(samples.mdrf(0).get(0, 1), 1.5);
    assert_eq!(samples.mdrf(1).get(0, 0), 25.0);
    assert_eq!(samples.thresh().get(1, 2), -7.0);

    for path in [&mdrf_path, &thresh_path, &gains_path] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn list_mode_events_are_counted_and_clamped() {
    let path = temp_path("listmode.dat");
    let mut bytes = Vec::new();
    // Header words 3 and 4 split the event count as thousands + remainder.
    let header: [i16; 9] = [1, 2, 3, 0, 3, 5, 6, 7, 8];
    for word in header {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    let readings: [[i16; 2]; 3] = [[12, -4], [0, 7], [-1, -2]];
    for event in readings {
        for value in event {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
    }
    fs::write(&path, &bytes).unwrap();

    let events = read_event_data(&path, 2).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].counts(), &[12, 0]);
    assert_eq!(events[1].counts(), &[0, 7]);
    assert_eq!(events[2].counts(), &[0, 0]);

    let _ = fs::remove_file(&path);
}

#[test]
fn estimated_events_round_trip() {
    let path = temp_path("estimates.dat");
    let events = vec![
        EstimatedEvent {
            x: 1.5,
            y: -2.25,
            log_like: -33.5,
            valid: true,
        },
        EstimatedEvent {
            x: -59.25,
            y: 59.25,
            log_like: f64::NEG_INFINITY,
            valid: false,
        },
    ];
    write_estimated_events(&path, &events).unwrap();
    let loaded = read_estimated_events(&path).unwrap();
    assert_eq!(loaded, events);

    let _ = fs::remove_file(&path);
}
