//! The acquisition loop: pull one frame, persist it, log its timestamp, poll
//! for the terminate key, repeat.
//!
//! Capture failures are soft: whether a timeout or a transport fault, a
//! failed attempt neither advances the frame counter nor touches the ledger,
//! and the loop retries immediately with no backoff and no cap on
//! consecutive failures. Only the Enter key ends the loop.

use std::time::Duration;

use image::GrayImage;
use log::{debug, error, info, warn};

use crate::device::Camera;
use crate::error::{CameraError, Result};
use crate::layout::OutputLayout;
use crate::ledger::TimestampLedger;
use crate::preview::{FramePreview, ENTER_KEY};

/// Bounded wait for one frame to be filled.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_millis(50);

/// Bounded wait for a key press per iteration.
pub const KEY_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Run the capture loop until the terminate key arrives. Returns the number
/// of successfully captured frames.
pub fn run_capture_loop<C: Camera, P: FramePreview>(
    camera: &mut C,
    preview: &mut P,
    layout: &OutputLayout,
    ledger: &mut TimestampLedger,
) -> Result<u32> {
    info!("Entering capture loop, press Enter to stop");

    let mut frame_count: u32 = 0;

    loop {
        match camera.acquire_frame(CAPTURE_TIMEOUT) {
            Ok(frame) => {
                // Each field extraction can fail on its own; a miss only
                // suppresses the outputs that need it.
                let height = log_field(frame.height(), "height");
                let width = log_field(frame.width(), "width");
                // The device buffer is only valid until the next capture, so
                // take a copy before the frame goes away.
                let pixels = log_field(frame.image().map(<[u8]>::to_vec), "image data");
                let timestamp = log_field(frame.timestamp_ns(), "timestamp");

                if let (Some(h), Some(w), Some(px)) = (height, width, pixels) {
                    persist_frame(preview, layout, frame_count, w, h, px);
                }

                if let Some(ts) = timestamp {
                    // Row index is the 1-based frame sequence number; row 0
                    // holds the header.
                    ledger.append_row(frame_count + 1, ts)?;
                }

                frame_count += 1;
            }
            Err(err) => {
                // Soft by definition; retry on the next iteration.
                debug!("No frame this attempt: {err}");
            }
        }

        if preview.poll_key(KEY_POLL_TIMEOUT) == Some(ENTER_KEY) {
            info!("Terminate key pressed, stopping after {frame_count} frames");
            break;
        }
    }

    Ok(frame_count)
}

fn persist_frame<P: FramePreview>(
    preview: &mut P,
    layout: &OutputLayout,
    index: u32,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
) {
    let Some(image) = GrayImage::from_raw(width, height, pixels) else {
        warn!("Frame buffer does not match {width}x{height}, skipping image");
        return;
    };

    let path = layout.frame_path(index);
    if let Err(err) = image.save(&path) {
        error!("Failed to save {}: {err}", path.display());
    }

    if let Err(err) = preview.show(&image) {
        error!("Failed to show frame {index}: {err}");
    }
}

fn log_field<T>(result: std::result::Result<T, CameraError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Failed to get frame {what}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{AccessMode, CameraSystem};
    use crate::sim::{ScriptedPreview, SimCapture, SimFrame, SimSystem};
    use tempfile::tempdir;

    fn session(
        script: Vec<SimCapture>,
    ) -> (crate::sim::SimCamera, OutputLayout, TimestampLedger, tempfile::TempDir) {
        let tmp = tempdir().unwrap();
        let layout = OutputLayout::new(
            tmp.path().join("images"),
            tmp.path().join("timestamps"),
            0.0,
            150.0,
            "move",
            "exp",
        );
        layout.ensure_dirs().unwrap();
        let ledger = TimestampLedger::create(layout.ledger_path()).unwrap();

        let mut system = SimSystem::new().with_script(script);
        system.startup().unwrap();
        let cameras = system.cameras().unwrap();
        let cam = system.open(&cameras[0], AccessMode::Full).unwrap();

        (cam, layout, ledger, tmp)
    }

    #[test]
    fn timeout_increments_nothing() {
        let (mut cam, layout, mut ledger, _tmp) =
            session(vec![SimCapture::Timeout, SimCapture::Timeout]);
        let mut preview = ScriptedPreview::new(vec![None, Some(ENTER_KEY)]);

        let frames = run_capture_loop(&mut cam, &mut preview, &layout, &mut ledger).unwrap();

        assert_eq!(frames, 0);
        assert_eq!(ledger.rows_written(), 0);
        assert!(preview.shown().is_empty());
    }

    #[test]
    fn transport_faults_are_swallowed_like_timeouts() {
        let (mut cam, layout, mut ledger, _tmp) = session(vec![
            SimCapture::Fault,
            SimCapture::Fault,
            SimCapture::Frame(SimFrame::new(8, 8, 10)),
        ]);
        let mut preview = ScriptedPreview::new(vec![None, None, None, Some(ENTER_KEY)]);

        let frames = run_capture_loop(&mut cam, &mut preview, &layout, &mut ledger).unwrap();

        // Faulted attempts leave no trace; the loop survives to the frame
        // that follows them.
        assert_eq!(frames, 1);
        assert_eq!(ledger.rows_written(), 1);
        assert!(layout.frame_path(0).exists());
    }

    #[test]
    fn non_terminate_keys_keep_the_loop_running() {
        let (mut cam, layout, mut ledger, _tmp) = session(vec![
            SimCapture::Frame(SimFrame::new(8, 8, 10)),
            SimCapture::Frame(SimFrame::new(8, 8, 20)),
            SimCapture::Frame(SimFrame::new(8, 8, 30)),
        ]);
        // 'q' and space must not stop the loop; only Enter does.
        let mut preview =
            ScriptedPreview::new(vec![Some(b'q'), Some(b' '), Some(ENTER_KEY)]);

        let frames = run_capture_loop(&mut cam, &mut preview, &layout, &mut ledger).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(preview.shown().len(), 3);
    }

    #[test]
    fn missing_timestamp_skips_the_ledger_row_only() {
        let (mut cam, layout, mut ledger, _tmp) = session(vec![SimCapture::Frame(
            SimFrame::new(8, 4, 99).without_timestamp(),
        )]);
        let mut preview = ScriptedPreview::new(vec![Some(ENTER_KEY)]);

        let frames = run_capture_loop(&mut cam, &mut preview, &layout, &mut ledger).unwrap();

        // The frame itself still counts and its image is still written.
        assert_eq!(frames, 1);
        assert_eq!(ledger.rows_written(), 0);
        assert!(layout.frame_path(0).exists());
    }

    #[test]
    fn missing_image_data_skips_the_file_but_keeps_the_timestamp() {
        let (mut cam, layout, mut ledger, _tmp) = session(vec![SimCapture::Frame(
            SimFrame::new(8, 4, 99).without_image(),
        )]);
        let mut preview = ScriptedPreview::new(vec![Some(ENTER_KEY)]);

        let frames = run_capture_loop(&mut cam, &mut preview, &layout, &mut ledger).unwrap();

        assert_eq!(frames, 1);
        assert_eq!(ledger.rows_written(), 1);
        assert!(!layout.frame_path(0).exists());
        assert!(preview.shown().is_empty());
    }
}
