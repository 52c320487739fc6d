//! Camera parameter setup.
//!
//! Features are addressed by their GenICam names. Every get/set failure here
//! is non-fatal: the feature is logged and skipped, and acquisition proceeds
//! with whatever the camera accepted.

use log::{info, warn};

use crate::cli::Args;
use crate::device::Camera;

pub const EXPOSURE_TIME: &str = "ExposureTimeAbs";
pub const GAIN: &str = "Gain";
pub const BLACK_LEVEL: &str = "BlackLevel";
pub const FRAME_RATE: &str = "AcquisitionFrameRateAbs";
pub const FRAME_RATE_LIMIT: &str = "AcquisitionFrameRateLimit";

/// Target values written during setup.
#[derive(Debug, Clone, Copy)]
pub struct CameraSettings {
    /// Exposure time in microseconds.
    pub exposure_us: f64,
    pub gain: f64,
    /// Acquisition frame rate in frames per second.
    pub frame_rate: f64,
}

impl From<&Args> for CameraSettings {
    fn from(args: &Args) -> Self {
        Self {
            exposure_us: args.exposure,
            gain: args.gain,
            frame_rate: args.fps,
        }
    }
}

/// Dealing with camera parameters: read each feature, log it, write the
/// target where one exists, and log the value the camera actually took.
pub fn apply_settings<C: Camera>(cam: &mut C, settings: &CameraSettings) {
    info!("Camera parameters before/after setup:");

    write_feature(cam, EXPOSURE_TIME, settings.exposure_us, "us");
    write_feature(cam, GAIN, settings.gain, "");
    read_feature(cam, BLACK_LEVEL, "");
    write_feature(cam, FRAME_RATE, settings.frame_rate, "fps");
    read_feature(cam, FRAME_RATE_LIMIT, "fps");
}

fn read_feature<C: Camera>(cam: &C, name: &str, unit: &str) -> Option<f64> {
    match cam.feature(name) {
        Ok(value) => {
            info!("  {name}: {value} {unit}");
            Some(value)
        }
        Err(err) => {
            warn!("  {name}: read failed ({err}), skipping");
            None
        }
    }
}

fn write_feature<C: Camera>(cam: &mut C, name: &str, target: f64, unit: &str) {
    match cam.feature(name) {
        Ok(before) => info!("  {name} (before): {before} {unit}"),
        Err(err) => warn!("  {name}: read failed ({err})"),
    }

    if let Err(err) = cam.set_feature(name, target) {
        warn!("  {name}: write of {target} failed ({err}), keeping camera value");
        return;
    }

    // Read back rather than echoing the request, so the "after" line reports
    // what the camera actually accepted.
    match cam.feature(name) {
        Ok(after) => info!("  {name} (after): {after} {unit}"),
        Err(err) => warn!("  {name}: read-back failed ({err})"),
    }
}
