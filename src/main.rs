use gige_capture::{
    acquisition::run_capture_loop,
    cli::Args,
    device::{AccessMode, Camera, CameraSystem},
    layout::OutputLayout,
    ledger::TimestampLedger,
    logging,
    params::{apply_settings, CameraSettings},
    preview::ConsolePreview,
    sim::SimSystem,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Setup logging
    logging::setup_logging(args.debug)?;
    logging::log_app_start(env!("CARGO_PKG_VERSION"));
    logging::log_capture_config(&args);

    // The simulated transport stands in for a vendor SDK binding; anything
    // implementing the CameraSystem trait slots in here unchanged.
    let mut system = SimSystem::new();
    system
        .startup()
        .context("Could not start the camera system")?;

    let cameras = match system.cameras() {
        Ok(cameras) if !cameras.is_empty() => cameras,
        Ok(_) => {
            system.shutdown();
            anyhow::bail!("No cameras found");
        }
        Err(err) => {
            system.shutdown();
            return Err(err).context("Camera enumeration failed");
        }
    };
    info!("Found {} camera(s), opening {}", cameras.len(), cameras[0].id);

    // Only ever open the first camera, with exclusive access.
    let mut camera = match system.open(&cameras[0], AccessMode::Full) {
        Ok(camera) => camera,
        Err(err) => {
            system.shutdown();
            return Err(err).context("Cannot access the camera");
        }
    };

    // Everything past open runs under one release pair: the camera is closed
    // and the system shut down on every exit path from here on.
    let result = capture_session(&mut camera, &args);
    camera.close();
    system.shutdown();

    let frames = result?;
    info!("Capture finished, {frames} frames saved");
    Ok(())
}

fn capture_session<C: Camera>(camera: &mut C, args: &Args) -> Result<u32> {
    let streams = camera
        .streams()
        .context("Not able to resolve data streams")?;
    info!("Resolved {} data stream(s)", streams.len());

    apply_settings(camera, &CameraSettings::from(args));

    // Paths embed the requested targets, as the bench layout always has.
    let layout = OutputLayout::new(
        &args.image_root,
        &args.timestamp_root,
        args.gain,
        args.exposure,
        &args.movement_label,
        &args.experiment_label,
    );
    layout
        .ensure_dirs()
        .context("Could not create output directories")?;

    let mut ledger = TimestampLedger::create(layout.ledger_path())
        .context("Could not create the timestamp ledger")?;
    ledger.write_header()?;

    let mut preview = ConsolePreview::new();
    let frames = run_capture_loop(camera, &mut preview, &layout, &mut ledger)?;

    // Normal exit only; an abnormal exit above loses the unsaved ledger.
    ledger
        .close()
        .context("Failed to finalize the timestamp ledger")?;

    Ok(frames)
}
