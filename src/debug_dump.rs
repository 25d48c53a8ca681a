//! Persistence of intermediate pipeline images
//!
//! When a dump directory is configured, every named stage of the localizer
//! plus the cropped regions and the annotated result are written out as
//! sequentially numbered PNGs, one subdirectory per frame. Purely diagnostic:
//! a dump failure is logged and never affects the frame outcome.

use std::path::PathBuf;

use image::{GrayImage, RgbImage};
use tracing::warn;

/// Writes stage images under `dir/frame_NNNN/SS_stage.png`.
///
/// A dump constructed with [`DebugDump::disabled`] ignores every call.
#[derive(Debug, Default)]
pub struct DebugDump {
    dir: Option<PathBuf>,
    frame: u64,
    seq: u32,
}

impl DebugDump {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir: Some(dir),
            frame: 0,
            seq: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Advance to the next frame and restart stage numbering.
    pub fn next_frame(&mut self) {
        self.frame += 1;
        self.seq = 0;
    }

    pub fn gray(&mut self, stage: &str, img: &GrayImage) {
        if let Some(path) = self.stage_path(stage) {
            if let Err(err) = img.save(&path) {
                warn!("failed to write debug image {:?}: {err}", path);
            }
        }
    }

    pub fn rgb(&mut self, stage: &str, img: &RgbImage) {
        if let Some(path) = self.stage_path(stage) {
            if let Err(err) = img.save(&path) {
                warn!("failed to write debug image {:?}: {err}", path);
            }
        }
    }

    fn stage_path(&mut self, stage: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?.join(format!("frame_{:04}", self.frame));
        if let Err(err) = std::fs::create_dir_all(&dir) {
            warn!("failed to create debug dump directory {:?}: {err}", dir);
            return None;
        }
        let path = dir.join(format!("{:02}_{stage}.png", self.seq));
        self.seq += 1;
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_dump_writes_nothing() {
        let mut dump = DebugDump::disabled();
        assert!(!dump.enabled());
        dump.gray("grayscale", &GrayImage::new(4, 4));
    }

    #[test]
    fn stages_are_numbered_sequentially_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut dump = DebugDump::new(dir.path().to_path_buf());
        dump.gray("start", &GrayImage::new(4, 4));
        dump.gray("grayscale", &GrayImage::new(4, 4));
        dump.next_frame();
        dump.gray("start", &GrayImage::new(4, 4));

        assert!(dir.path().join("frame_0000/00_start.png").exists());
        assert!(dir.path().join("frame_0000/01_grayscale.png").exists());
        assert!(dir.path().join("frame_0001/00_start.png").exists());
    }
}
