use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] rust_xlsxwriter::XlsxError),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to start camera system: {0}")]
    Startup(String),

    #[error("No cameras found")]
    NoCamerasFound,

    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Failed to resolve data streams: {0}")]
    StreamResolution(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Feature {0} is read-only")]
    ReadOnlyFeature(String),

    #[error("Frame field unavailable: {0}")]
    FrameField(&'static str),
}

/// Per-attempt capture failures. Every variant is soft: the capture loop
/// logs it and retries, so nothing a device reports from a single capture
/// attempt can stop acquisition.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Frame capture timed out after {0} ms")]
    Timeout(u64),

    #[error("Failed to capture frame: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn preview(msg: impl Into<String>) -> Self {
        AppError::Preview(msg.into())
    }
}

impl CameraError {
    pub fn startup(msg: impl Into<String>) -> Self {
        CameraError::Startup(msg.into())
    }

    pub fn open(msg: impl Into<String>) -> Self {
        CameraError::Open(msg.into())
    }

    pub fn stream_resolution(msg: impl Into<String>) -> Self {
        CameraError::StreamResolution(msg.into())
    }
}

impl CaptureError {
    pub fn failed(msg: impl Into<String>) -> Self {
        CaptureError::Failed(msg.into())
    }
}
