//! Live preview and keyboard collaborator.
//!
//! The capture loop shows each frame and polls for the terminate key through
//! this trait, so the loop itself never depends on a windowing toolkit.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use image::GrayImage;
use log::{debug, trace};

use crate::error::Result;

/// Key code that terminates acquisition (carriage return).
pub const ENTER_KEY: u8 = 13;

/// Display surface plus key polling.
pub trait FramePreview {
    /// Present the latest frame.
    fn show(&mut self, frame: &GrayImage) -> Result<()>;

    /// Wait up to `timeout` for a key press; `None` if none arrived.
    fn poll_key(&mut self, timeout: Duration) -> Option<u8>;
}

/// Preview that discards frames and never reports a key.
#[derive(Debug, Default)]
pub struct NullPreview;

impl FramePreview for NullPreview {
    fn show(&mut self, _frame: &GrayImage) -> Result<()> {
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Option<u8> {
        None
    }
}

/// Headless preview: logs frame geometry and maps an Enter press on stdin to
/// the terminate key.
///
/// A detached reader thread forwards one key code per stdin line through a
/// channel; `poll_key` drains it with a bounded wait, which keeps the capture
/// loop's 1 ms poll contract without a display server.
pub struct ConsolePreview {
    keys: Receiver<u8>,
}

impl ConsolePreview {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if line.is_err() || tx.send(ENTER_KEY).is_err() {
                    break;
                }
            }
        });
        Self { keys: rx }
    }
}

impl Default for ConsolePreview {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePreview for ConsolePreview {
    fn show(&mut self, frame: &GrayImage) -> Result<()> {
        trace!("Preview frame {}x{}", frame.width(), frame.height());
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<u8> {
        match self.keys.recv_timeout(timeout) {
            Ok(key) => {
                debug!("Key press: {}", key);
                Some(key)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_preview_never_reports_a_key() {
        let mut preview = NullPreview;
        assert_eq!(preview.poll_key(Duration::from_millis(1)), None);

        let frame = GrayImage::new(4, 4);
        preview.show(&frame).unwrap();
    }
}
