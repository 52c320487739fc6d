//! Simulated camera for tests and hardware-free runs.
//!
//! `SimSystem` implements the [`crate::device`] traits against a scripted or
//! procedural frame source, so the whole acquisition path can run without a
//! camera attached.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use image::GrayImage;

use crate::device::{AccessMode, Camera, CameraInfo, CameraSystem, CapturedFrame, StreamInfo};
use crate::error::{CameraError, CaptureError, Result};
use crate::preview::FramePreview;

/// Frame interval of the endless source, matching the 200 fps bench target.
const ENDLESS_FRAME_INTERVAL_NS: u64 = 5_000_000;

/// One scripted capture outcome.
#[derive(Debug, Clone)]
pub enum SimCapture {
    Frame(SimFrame),
    Timeout,
    /// A capture failure other than a timeout, as a flaky transport reports.
    Fault,
}

/// A scripted frame. Fields can be marked missing to exercise the loop's
/// per-field extraction handling.
#[derive(Debug, Clone)]
pub struct SimFrame {
    pub width: u32,
    pub height: u32,
    pub timestamp_ns: u64,
    omit_image: bool,
    omit_timestamp: bool,
}

impl SimFrame {
    pub fn new(width: u32, height: u32, timestamp_ns: u64) -> Self {
        Self {
            width,
            height,
            timestamp_ns,
            omit_image: false,
            omit_timestamp: false,
        }
    }

    /// Simulate an image-data extraction failure.
    pub fn without_image(mut self) -> Self {
        self.omit_image = true;
        self
    }

    /// Simulate a timestamp extraction failure.
    pub fn without_timestamp(mut self) -> Self {
        self.omit_timestamp = true;
        self
    }
}

/// Simulated transport layer.
pub struct SimSystem {
    started: bool,
    fail_startup: bool,
    camera_count: usize,
    fail_streams: bool,
    script: Option<Vec<SimCapture>>,
    features: HashMap<String, f64>,
    read_only: Vec<String>,
}

impl SimSystem {
    /// One attached camera, endless gradient frames.
    pub fn new() -> Self {
        let mut features = HashMap::new();
        features.insert("ExposureTimeAbs".to_owned(), 20000.0);
        features.insert("Gain".to_owned(), 5.0);
        features.insert("BlackLevel".to_owned(), 2.0);
        features.insert("AcquisitionFrameRateAbs".to_owned(), 30.0);
        features.insert("AcquisitionFrameRateLimit".to_owned(), 211.5);

        Self {
            started: false,
            fail_startup: false,
            camera_count: 1,
            fail_streams: false,
            script: None,
            features,
            read_only: vec!["AcquisitionFrameRateLimit".to_owned()],
        }
    }

    /// Replace the endless source with a fixed capture script; once the
    /// script is exhausted every further capture times out.
    pub fn with_script(mut self, script: Vec<SimCapture>) -> Self {
        self.script = Some(script);
        self
    }

    /// Fail `startup` to exercise the fatal setup path.
    pub fn with_failing_startup(mut self) -> Self {
        self.fail_startup = true;
        self
    }

    /// Report `count` attached cameras.
    pub fn with_camera_count(mut self, count: usize) -> Self {
        self.camera_count = count;
        self
    }

    /// Fail stream resolution on the opened camera.
    pub fn with_failing_streams(mut self) -> Self {
        self.fail_streams = true;
        self
    }

    /// Override a feature's initial value.
    pub fn with_feature(mut self, name: &str, value: f64) -> Self {
        self.features.insert(name.to_owned(), value);
        self
    }

    /// Remove a feature entirely, as on a camera that does not expose it.
    pub fn without_feature(mut self, name: &str) -> Self {
        self.features.remove(name);
        self
    }
}

impl Default for SimSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSystem for SimSystem {
    type Camera = SimCamera;

    fn startup(&mut self) -> std::result::Result<(), CameraError> {
        if self.fail_startup {
            return Err(CameraError::startup("simulated startup failure"));
        }
        self.started = true;
        Ok(())
    }

    fn cameras(&mut self) -> std::result::Result<Vec<CameraInfo>, CameraError> {
        Ok((0..self.camera_count)
            .map(|i| CameraInfo {
                id: format!("SIM-{i:04}"),
                model: "Simulated GigE".to_owned(),
            })
            .collect())
    }

    fn open(
        &mut self,
        _info: &CameraInfo,
        _mode: AccessMode,
    ) -> std::result::Result<Self::Camera, CameraError> {
        Ok(SimCamera {
            features: self.features.clone(),
            read_only: self.read_only.clone(),
            fail_streams: self.fail_streams,
            script: self.script.take().map(VecDeque::from),
            buffer: Vec::new(),
            next_ts: 0,
            open: true,
        })
    }

    fn shutdown(&mut self) {
        self.started = false;
    }
}

/// Simulated open camera.
pub struct SimCamera {
    features: HashMap<String, f64>,
    read_only: Vec<String>,
    fail_streams: bool,
    script: Option<VecDeque<SimCapture>>,
    buffer: Vec<u8>,
    next_ts: u64,
    open: bool,
}

impl SimCamera {
    /// Whether [`Camera::close`] has been called yet.
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn fill_gradient(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.buffer.clear();
        self.buffer.reserve(size);
        for _row in 0..height {
            for x in 0..width {
                self.buffer.push(((x * 255) / width.max(1)) as u8);
            }
        }
    }
}

impl Camera for SimCamera {
    fn streams(&mut self) -> std::result::Result<Vec<StreamInfo>, CameraError> {
        if self.fail_streams {
            return Err(CameraError::stream_resolution("simulated stream failure"));
        }
        Ok(vec![StreamInfo { id: 0 }])
    }

    fn feature(&self, name: &str) -> std::result::Result<f64, CameraError> {
        self.features
            .get(name)
            .copied()
            .ok_or_else(|| CameraError::UnknownFeature(name.to_owned()))
    }

    fn set_feature(&mut self, name: &str, value: f64) -> std::result::Result<(), CameraError> {
        if self.read_only.iter().any(|f| f == name) {
            return Err(CameraError::ReadOnlyFeature(name.to_owned()));
        }
        match self.features.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(CameraError::UnknownFeature(name.to_owned())),
        }
    }

    fn acquire_frame(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<CapturedFrame<'_>, CaptureError> {
        let next = match self.script.as_mut() {
            Some(script) => script
                .pop_front()
                .unwrap_or(SimCapture::Timeout),
            None => {
                let ts = self.next_ts;
                self.next_ts += ENDLESS_FRAME_INTERVAL_NS;
                SimCapture::Frame(SimFrame::new(640, 480, ts))
            }
        };

        match next {
            SimCapture::Timeout => {
                Err(CaptureError::Timeout(timeout.as_millis() as u64))
            }
            SimCapture::Fault => Err(CaptureError::failed("simulated transport fault")),
            SimCapture::Frame(frame) => {
                self.fill_gradient(frame.width, frame.height);
                let image = if frame.omit_image {
                    None
                } else {
                    Some(self.buffer.as_slice())
                };
                let timestamp = if frame.omit_timestamp {
                    None
                } else {
                    Some(frame.timestamp_ns)
                };
                Ok(CapturedFrame::new(
                    Some(frame.height),
                    Some(frame.width),
                    image,
                    timestamp,
                ))
            }
        }
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Test preview that replays a fixed key sequence and records what it showed.
pub struct ScriptedPreview {
    keys: VecDeque<Option<u8>>,
    shown: Vec<(u32, u32)>,
}

impl ScriptedPreview {
    /// `keys` are returned in order, one per `poll_key` call; once exhausted
    /// every poll reports no key.
    pub fn new(keys: Vec<Option<u8>>) -> Self {
        Self {
            keys: VecDeque::from(keys),
            shown: Vec::new(),
        }
    }

    /// Dimensions of every frame shown so far.
    pub fn shown(&self) -> &[(u32, u32)] {
        &self.shown
    }
}

impl FramePreview for ScriptedPreview {
    fn show(&mut self, frame: &GrayImage) -> Result<()> {
        self.shown.push((frame.width(), frame.height()));
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Option<u8> {
        self.keys.pop_front().flatten()
    }
}
