use anyhow::Result;
use log::{info, LevelFilter};
use std::io::Write;

use crate::cli::Args;

pub fn setup_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format(|out, record| {
            writeln!(
                out,
                "[{}][{}] {}",
                record.target(),
                record.level(),
                record.args()
            )
        })
        .try_init()?;

    Ok(())
}

pub fn log_app_start(version: &str) {
    info!("Starting gige-capture v{}", version);
}

pub fn log_capture_config(args: &Args) {
    info!("Capture configured with:");
    info!("  Exposure target: {} us", args.exposure);
    info!("  Gain target: {}", args.gain);
    info!("  Frame rate target: {} fps", args.fps);
    info!("  Movement label: {}", args.movement_label);
    info!("  Experiment label: {}", args.experiment_label);
    info!("  Image root: {}", args.image_root);
    info!("  Timestamp root: {}", args.timestamp_root);
}
