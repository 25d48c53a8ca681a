//! Per-frame pipeline orchestration
//!
//! Runs the five stages in order for one frame: locate, filter, crop+OCR,
//! normalize, classify, then annotate. Frames are processed one at a time;
//! all working buffers are frame-local and only the roster and the running
//! statistics outlive a frame.

use std::time::{Duration, Instant};

use image::{imageops, DynamicImage, GrayImage};
use imageproc::rect::Rect;
use tracing::debug;

use crate::annotate::Annotator;
use crate::debug_dump::DebugDump;
use crate::locate::locate;
use crate::matching::{classify, AuthorizedPlates, PlateMatch};
use crate::normalize::normalize;
use crate::ocr::PlateReader;
use crate::regions::filter_rectangles;

/// Counters reported at shutdown. Never influences control flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    /// Frames fully processed.
    pub frames: u64,
    /// Frames where at least one candidate produced a valid plate code.
    pub frames_with_id: u64,
}

/// Everything produced for one frame.
#[derive(Debug)]
pub struct FrameReport {
    pub matches: Vec<PlateMatch>,
    pub elapsed: Duration,
}

/// The recognition pipeline. Owns the OCR engine and the read-only roster;
/// holds no per-frame state between calls.
pub struct Pipeline {
    roster: AuthorizedPlates,
    reader: Box<dyn PlateReader>,
    annotator: Annotator,
    dump: DebugDump,
    stats: RunStats,
}

impl Pipeline {
    pub fn new(
        roster: AuthorizedPlates,
        reader: Box<dyn PlateReader>,
        annotator: Annotator,
        dump: DebugDump,
    ) -> Self {
        Self {
            roster,
            reader,
            annotator,
            dump,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Process one frame in place: the returned report carries the match
    /// set, and the frame itself comes back annotated.
    ///
    /// Any per-candidate failure (degenerate crop geometry, a recognition
    /// error on one region) drops that candidate only; the frame as a whole
    /// never fails.
    pub fn process_frame(&mut self, frame: &mut DynamicImage) -> FrameReport {
        let started = Instant::now();

        let localization = locate(frame, &mut self.dump);
        let rectangles = filter_rectangles(&localization.candidates);

        let gray = frame.to_luma8();
        let mut matches = Vec::with_capacity(rectangles.len());
        for rect in rectangles {
            let source_rect = localization.scale.to_source(rect);
            let Some(crop) = crop_gray(&gray, source_rect) else {
                debug!("skipping candidate with degenerate crop at {source_rect:?}");
                continue;
            };
            if self.dump.enabled() {
                self.dump.gray("crop", &crop);
            }
            let raw = match self.reader.recognize(&crop) {
                Ok(text) => text,
                Err(err) => {
                    debug!("OCR failed for candidate at {source_rect:?}: {err}");
                    continue;
                }
            };
            let code = normalize(&raw);
            matches.push(classify(rect, code, &self.roster));
        }

        let mut annotated = frame.to_rgb8();
        self.annotator.annotate(
            &mut annotated,
            &matches,
            &localization.candidates,
            &localization.scale,
        );
        if self.dump.enabled() {
            self.dump.rgb("done", &annotated);
        }
        *frame = DynamicImage::ImageRgb8(annotated);

        self.stats.frames += 1;
        if matches.iter().any(|m| m.id_valid) {
            self.stats.frames_with_id += 1;
        }
        self.dump.next_frame();

        let elapsed = started.elapsed();
        debug!(
            "frame processed in {elapsed:?}: {} candidates, {} matches",
            localization.candidates.len(),
            matches.len()
        );

        FrameReport { matches, elapsed }
    }
}

/// Clamp a rectangle to the image bounds and crop it out, or `None` when
/// nothing of it remains inside the frame.
fn crop_gray(gray: &GrayImage, rect: Rect) -> Option<GrayImage> {
    let x = rect.left().max(0) as u32;
    let y = rect.top().max(0) as u32;
    if x >= gray.width() || y >= gray.height() {
        return None;
    }
    let right = (rect.left() + rect.width() as i32).clamp(0, gray.width() as i32) as u32;
    let bottom = (rect.top() + rect.height() as i32).clamp(0, gray.height() as i32) as u32;
    let width = right.checked_sub(x)?;
    let height = bottom.checked_sub(y)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(imageops::crop_imm(gray, x, y, width, height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn crop_clamps_to_frame_bounds() {
        let gray = GrayImage::from_pixel(100, 100, Luma([50u8]));
        let crop = crop_gray(&gray, Rect::at(90, 90).of_size(40, 40)).unwrap();
        assert_eq!(crop.dimensions(), (10, 10));
    }

    #[test]
    fn crop_outside_frame_is_none() {
        let gray = GrayImage::from_pixel(100, 100, Luma([50u8]));
        assert!(crop_gray(&gray, Rect::at(200, 200).of_size(10, 10)).is_none());
        assert!(crop_gray(&gray, Rect::at(-50, -50).of_size(20, 20)).is_none());
    }

    #[test]
    fn crop_partially_negative_is_clamped() {
        let gray = GrayImage::from_pixel(100, 100, Luma([50u8]));
        let crop = crop_gray(&gray, Rect::at(-10, -10).of_size(30, 30)).unwrap();
        assert_eq!(crop.dimensions(), (20, 20));
    }
}
