//! Single-camera frame acquisition with an xlsx timestamp ledger.
//!
//! This library provides functionality for:
//! - Opening the first attached camera through an SDK-agnostic trait seam
//! - Configuring exposure, gain and frame-rate features by name
//! - Capturing frames in a polling loop and saving each as PNG
//! - Recording every frame's hardware timestamp in a spreadsheet ledger

pub mod acquisition;
pub mod cli;
pub mod device;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod logging;
pub mod params;
pub mod preview;
pub mod sim;

pub use acquisition::{run_capture_loop, CAPTURE_TIMEOUT, KEY_POLL_TIMEOUT};
pub use device::{AccessMode, Camera, CameraInfo, CameraSystem, CapturedFrame, StreamInfo};
pub use error::{AppError, CameraError, CaptureError, Result};
pub use layout::OutputLayout;
pub use ledger::TimestampLedger;
pub use params::{apply_settings, CameraSettings};
pub use preview::{ConsolePreview, FramePreview, NullPreview, ENTER_KEY};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
