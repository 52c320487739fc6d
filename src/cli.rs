// External crate imports, alphabetized
use clap::Parser;

/// Defaults reproduce the fixed values the capture bench has always used, so
/// running with no flags gives the original behavior.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Exposure time target in microseconds
    #[arg(long, default_value_t = 150.0)]
    pub exposure: f64,

    /// Gain target
    #[arg(long, default_value_t = 0.0)]
    pub gain: f64,

    /// Frame rate target in frames per second
    #[arg(long, default_value_t = 200.0)]
    pub fps: f64,

    /// Stage-position label embedded in the output paths
    #[arg(long, default_value_t = String::from("X03_Y03_TopRight"))]
    pub movement_label: String,

    /// Experiment label embedded in the output paths
    #[arg(long, default_value_t = String::from("LaserDia_9mm"))]
    pub experiment_label: String,

    /// Root directory for captured images
    #[arg(long, default_value_t = String::from("../images"))]
    pub image_root: String,

    /// Root directory for the timestamp ledger
    #[arg(long, default_value_t = String::from("../timestamps"))]
    pub timestamp_root: String,

    /// Increase log verbosity (-d for debug, -dd for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,
}
