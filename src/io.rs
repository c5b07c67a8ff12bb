//! Binary codecs for calibration, list-mode event, and result files.
//!
//! Calibration planes, gains, and result records are little-endian `f32`;
//! list-mode event files carry big-endian `i16` words. All readers consume
//! the exact framing described on each function and surface anything else
//! as an error.

use crate::calib::CalibrationSamples;
use crate::camera::CameraGeometry;
use crate::event::{DetectorEvent, EstimatedEvent};
use crate::grid::SampleGrid;
use crate::util::{ScintilocError, ScintilocResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn read_f32_le<R: Read>(reader: &mut R) -> ScintilocResult<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_u32_le<R: Read>(reader: &mut R) -> ScintilocResult<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i16_be<R: Read>(reader: &mut R) -> ScintilocResult<i16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(i16::from_be_bytes(buf))
}

fn read_plane<R: Read>(reader: &mut R, side: usize) -> ScintilocResult<Vec<f64>> {
    let mut data = Vec::with_capacity(side * side);
    for _ in 0..side * side {
        data.push(f64::from(read_f32_le(reader)?));
    }
    Ok(data)
}

/// Loads the calibration input from its three binary files.
///
/// The response file holds one row-major `S`x`S` plane of `f32` per channel,
/// the threshold file one such plane, and the gain file one `f32` per
/// channel. Each response plane is normalized by its channel gain on load.
pub fn load_calibration_samples(
    mdrf_path: &Path,
    thresh_path: &Path,
    gains_path: &Path,
    geometry: &CameraGeometry,
) -> ScintilocResult<CalibrationSamples> {
    let side = geometry.samples_per_axis;

    let mut gains = Vec::with_capacity(geometry.channels);
    {
        let mut reader = BufReader::new(File::open(gains_path)?);
        for _ in 0..geometry.channels {
            gains.push(f64::from(read_f32_le(&mut reader)?));
        }
    }
    if gains.iter().any(|&gain| !(gain > 0.0)) {
        return Err(ScintilocError::MalformedFile("non-positive channel gain"));
    }

    let mut mdrf = Vec::with_capacity(geometry.channels);
    {
        let mut reader = BufReader::new(File::open(mdrf_path)?);
        for &gain in &gains {
            let mut plane = read_plane(&mut reader, side)?;
            for value in &mut plane {
                *value /= gain;
            }
            mdrf.push(SampleGrid::from_vec(plane, side, side)?);
        }
    }

    let thresh = {
        let mut reader = BufReader::new(File::open(thresh_path)?);
        SampleGrid::from_vec(read_plane(&mut reader, side)?, side, side)?
    };

    CalibrationSamples::new(mdrf, thresh, gains)
}

/// Reads a list-mode event file.
///
/// The file starts with 9 big-endian `i16` header words; words 3 and 4
/// carry the event count as `thousands * 1000 + remainder`. Each event is
/// `channels` big-endian `i16` charge readings, clamped to non-negative on
/// ingestion.
pub fn read_event_data(path: &Path, channels: usize) -> ScintilocResult<Vec<DetectorEvent>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = [0i16; 9];
    for word in &mut header {
        *word = read_i16_be(&mut reader)?;
    }
    if header[3] < 0 || header[4] < 0 {
        return Err(ScintilocError::MalformedFile(
            "negative event count in list-mode header",
        ));
    }
    let num_events = header[3] as usize * 1000 + header[4] as usize;

    let mut events = Vec::with_capacity(num_events);
    let mut raw = vec![0i16; channels];
    for _ in 0..num_events {
        for value in &mut raw {
            *value = read_i16_be(&mut reader)?;
        }
        events.push(DetectorEvent::from_raw(&raw));
    }
    Ok(events)
}

/// Writes estimated events: a little-endian `u32` record count, then per
/// event `valid` as `u32` followed by `x`, `y`, and `log_like` as `f32`.
pub fn write_estimated_events(path: &Path, events: &[EstimatedEvent]) -> ScintilocResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&(events.len() as u32).to_le_bytes())?;
    for event in events {
        writer.write_all(&u32::from(event.valid).to_le_bytes())?;
        writer.write_all(&(event.x as f32).to_le_bytes())?;
        writer.write_all(&(event.y as f32).to_le_bytes())?;
        writer.write_all(&(event.log_like as f32).to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads estimated events written by [`write_estimated_events`].
pub fn read_estimated_events(path: &Path) -> ScintilocResult<Vec<EstimatedEvent>> {
    let mut reader = BufReader::new(File::open(path)?);
    let num_events = read_u32_le(&mut reader)? as usize;
    let mut events = Vec::with_capacity(num_events);
    for _ in 0..num_events {
        let valid = read_u32_le(&mut reader)?;
        let x = f64::from(read_f32_le(&mut reader)?);
        let y = f64::from(read_f32_le(&mut reader)?);
        let log_like = f64::from(read_f32_le(&mut reader)?);
        events.push(EstimatedEvent {
            x,
            y,
            log_like,
            valid: valid != 0,
        });
    }
    Ok(events)
}
