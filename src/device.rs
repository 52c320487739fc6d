//! SDK-agnostic camera abstraction.
//!
//! The acquisition code only ever talks to these traits; a vendor SDK binding
//! implements them, and the simulated camera in [`crate::sim`] implements them
//! for tests and hardware-free runs.

use std::time::Duration;

use crate::error::{CameraError, CaptureError};

/// Access mode requested when opening a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Exclusive read/write control.
    Full,
    /// Shared read-only access.
    Read,
}

/// An enumerated, not-yet-opened camera.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Transport-layer identifier.
    pub id: String,
    /// Human-readable model name.
    pub model: String,
}

/// A data stream resolved from an open camera.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    /// Stream identifier within the owning camera.
    pub id: u32,
}

/// One captured frame.
///
/// Vendor frame objects expose each field through its own fallible accessor,
/// and any of them can fail independently of the others; that shape is kept
/// here so the capture loop can log each miss on its own. The pixel buffer is
/// borrowed from the camera and is only valid until the next capture call.
#[derive(Debug)]
pub struct CapturedFrame<'a> {
    height: Option<u32>,
    width: Option<u32>,
    image: Option<&'a [u8]>,
    timestamp_ns: Option<u64>,
}

impl<'a> CapturedFrame<'a> {
    /// Assemble a frame from whichever fields the device produced.
    pub fn new(
        height: Option<u32>,
        width: Option<u32>,
        image: Option<&'a [u8]>,
        timestamp_ns: Option<u64>,
    ) -> Self {
        Self {
            height,
            width,
            image,
            timestamp_ns,
        }
    }

    pub fn height(&self) -> Result<u32, CameraError> {
        self.height.ok_or(CameraError::FrameField("height"))
    }

    pub fn width(&self) -> Result<u32, CameraError> {
        self.width.ok_or(CameraError::FrameField("width"))
    }

    pub fn image(&self) -> Result<&'a [u8], CameraError> {
        self.image.ok_or(CameraError::FrameField("image"))
    }

    pub fn timestamp_ns(&self) -> Result<u64, CameraError> {
        self.timestamp_ns.ok_or(CameraError::FrameField("timestamp"))
    }
}

/// The camera transport layer: startup, discovery, open, shutdown.
pub trait CameraSystem {
    type Camera: Camera;

    /// Must succeed before any other call.
    fn startup(&mut self) -> Result<(), CameraError>;

    /// List attached cameras.
    fn cameras(&mut self) -> Result<Vec<CameraInfo>, CameraError>;

    /// Open a camera with the requested access mode.
    fn open(&mut self, info: &CameraInfo, mode: AccessMode) -> Result<Self::Camera, CameraError>;

    /// Release the transport layer. Safe to call after a failed startup.
    fn shutdown(&mut self);
}

/// An open camera.
pub trait Camera {
    /// Resolve the camera's data streams. The stream follows the camera's
    /// lifetime and needs no separate close.
    fn streams(&mut self) -> Result<Vec<StreamInfo>, CameraError>;

    /// Read a named numeric feature.
    fn feature(&self, name: &str) -> Result<f64, CameraError>;

    /// Write a named numeric feature.
    fn set_feature(&mut self, name: &str, value: f64) -> Result<(), CameraError>;

    /// Block for at most `timeout` waiting for one frame.
    ///
    /// The error type only has per-attempt failures, so an implementation
    /// cannot surface a setup-tier error from here; whatever goes wrong
    /// during a capture attempt, the loop logs it and retries.
    fn acquire_frame(&mut self, timeout: Duration) -> Result<CapturedFrame<'_>, CaptureError>;

    /// Close the device.
    fn close(&mut self);
}
