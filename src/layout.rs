//! Output directory layout.
//!
//! Both output trees share the same suffix under their own root:
//! `<root>/Gain_<g>_ExposureTime_<e>/<movement>/<experiment>`, where the gain
//! and exposure values are truncated toward zero.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;

/// The two derived output directories for one capture session.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    image_dir: PathBuf,
    timestamp_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(
        image_root: impl AsRef<Path>,
        timestamp_root: impl AsRef<Path>,
        gain: f64,
        exposure_us: f64,
        movement_label: &str,
        experiment_label: &str,
    ) -> Self {
        let param_dir = format!(
            "Gain_{}_ExposureTime_{}",
            gain as i64, exposure_us as i64
        );

        let suffix = |root: &Path| {
            root.join(&param_dir)
                .join(movement_label)
                .join(experiment_label)
        };

        Self {
            image_dir: suffix(image_root.as_ref()),
            timestamp_dir: suffix(timestamp_root.as_ref()),
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn timestamp_dir(&self) -> &Path {
        &self.timestamp_dir
    }

    /// Path for the n-th captured image, starting at `frame_0.png`.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.image_dir.join(format!("frame_{index}.png"))
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.timestamp_dir.join("timestamps.xlsx")
    }

    /// Create both output directories on disk.
    pub fn ensure_dirs(&self) -> Result<()> {
        ensure_dir(&self.image_dir)?;
        ensure_dir(&self.timestamp_dir)
    }
}

/// Create `path` and any missing parents. An already existing path is logged
/// and left untouched; only a real filesystem failure is an error.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        info!("Folder exists at {}", path.display());
        return Ok(());
    }

    info!("Creating folder at {}", path.display());
    fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_use_truncated_parameter_values() {
        let layout = OutputLayout::new(
            "../images",
            "../timestamps",
            0.0,
            150.0,
            "X03_Y03_TopRight",
            "LaserDia_9mm",
        );

        assert_eq!(
            layout.image_dir(),
            Path::new("../images/Gain_0_ExposureTime_150/X03_Y03_TopRight/LaserDia_9mm")
        );
        assert_eq!(
            layout.timestamp_dir(),
            Path::new("../timestamps/Gain_0_ExposureTime_150/X03_Y03_TopRight/LaserDia_9mm")
        );
    }

    #[test]
    fn truncation_is_toward_zero() {
        let layout = OutputLayout::new("i", "t", 2.9, 149.7, "m", "e");
        assert!(layout
            .image_dir()
            .to_string_lossy()
            .contains("Gain_2_ExposureTime_149"));
    }

    #[test]
    fn frame_and_ledger_paths() {
        let layout = OutputLayout::new("i", "t", 0.0, 150.0, "m", "e");
        assert!(layout.frame_path(0).ends_with("frame_0.png"));
        assert!(layout.frame_path(12).ends_with("frame_12.png"));
        assert!(layout.ledger_path().ends_with("timestamps.xlsx"));
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a/b/c");

        ensure_dir(&target).unwrap();
        assert!(target.is_dir());

        // Second call is a no-op, never an error.
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }
}
