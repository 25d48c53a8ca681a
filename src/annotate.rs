//! Frame annotation
//!
//! Renders match results and raw candidate contours onto the source frame
//! for human inspection. Pure output side effect: nothing here feeds back
//! into the gate decision, and empty input draws nothing.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::warn;

use crate::locate::FrameScale;
use crate::matching::PlateMatch;
use crate::regions::Candidate;

/// No valid code extracted.
const NO_ID: Rgb<u8> = Rgb([255, 255, 255]);
/// Valid code, not on the roster.
const UNAUTHORIZED: Rgb<u8> = Rgb([220, 40, 40]);
/// Code is on the roster.
const AUTHORIZED: Rgb<u8> = Rgb([40, 200, 60]);

/// Marker colors cycled per candidate index, diagnostic only.
const MARKER_PALETTE: [Rgb<u8>; 6] = [
    Rgb([66, 135, 245]),
    Rgb([245, 188, 66]),
    Rgb([188, 66, 245]),
    Rgb([66, 245, 224]),
    Rgb([245, 66, 149]),
    Rgb([163, 245, 66]),
];

const RECT_THICKNESS: i32 = 3;
const LABEL_SCALE: f32 = 24.0;

/// Well-known locations tried when no font is configured.
const FONT_FALLBACKS: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Draws match rectangles, plate-code labels and candidate markers.
///
/// Label rendering needs a TTF font; when neither the configured path nor
/// any fallback can be loaded, annotation degrades to geometry only.
pub struct Annotator {
    font: Option<FontVec>,
}

impl Annotator {
    pub fn new(font_path: Option<&Path>) -> Self {
        let font = load_font(font_path);
        if font.is_none() {
            warn!("no annotation font available, plate labels will not be drawn");
        }
        Self { font }
    }

    /// An annotator that draws geometry only, no text labels.
    pub fn without_font() -> Self {
        Self { font: None }
    }

    /// Draw all matches and candidate markers onto `frame` in place.
    /// Rectangles arrive in working-frame coordinates and are mapped back
    /// through `scale` before drawing.
    pub fn annotate(
        &self,
        frame: &mut RgbImage,
        matches: &[PlateMatch],
        candidates: &[Candidate],
        scale: &FrameScale,
    ) {
        for m in matches {
            let color = if m.authorized {
                AUTHORIZED
            } else if m.id_valid {
                UNAUTHORIZED
            } else {
                NO_ID
            };
            let rect = scale.to_source(m.rect);
            draw_thick_rect(frame, rect, color);

            if m.id_valid {
                if let Some(font) = &self.font {
                    let label = if m.authorized {
                        format!("OK {}", m.code)
                    } else {
                        m.code.clone()
                    };
                    let x = rect.left().max(0);
                    let y = (rect.top() - LABEL_SCALE as i32 - 2).max(0);
                    draw_text_mut(frame, color, x, y, PxScale::from(LABEL_SCALE), font, &label);
                }
            }
        }

        for (index, candidate) in candidates.iter().enumerate() {
            let color = MARKER_PALETTE[index % MARKER_PALETTE.len()];
            for point in candidate.points() {
                let (x, y) = scale.point_to_source(point.x, point.y);
                draw_filled_circle_mut(frame, (x, y), 1, color);
            }
        }
    }
}

fn load_font(configured: Option<&Path>) -> Option<FontVec> {
    let candidates: Vec<PathBuf> = configured
        .map(|p| vec![p.to_path_buf()])
        .unwrap_or_else(|| FONT_FALLBACKS.iter().map(PathBuf::from).collect());
    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => return Some(font),
                Err(err) => warn!("invalid font file {:?}: {err}", path),
            },
            Err(_) => continue,
        }
    }
    None
}

fn draw_thick_rect(frame: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    for i in 0..RECT_THICKNESS {
        let grown = Rect::at(rect.left() - i, rect.top() - i)
            .of_size(rect.width() + 2 * i as u32, rect.height() + 2 * i as u32);
        draw_hollow_rect_mut(frame, grown, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_at(rect: Rect, authorized: bool) -> PlateMatch {
        PlateMatch {
            rect,
            code: "YAH088".into(),
            id_valid: true,
            authorized,
        }
    }

    #[test]
    fn empty_input_draws_nothing() {
        let mut frame = RgbImage::from_pixel(64, 64, Rgb([10, 10, 10]));
        let before = frame.clone();
        let scale = FrameScale::for_frame(64, 64);
        Annotator::without_font().annotate(&mut frame, &[], &[], &scale);
        assert_eq!(frame, before);
    }

    #[test]
    fn authorized_match_draws_a_green_rectangle() {
        let mut frame = RgbImage::from_pixel(512, 512, Rgb([10, 10, 10]));
        let scale = FrameScale::for_frame(512, 512);
        let m = match_at(Rect::at(100, 100).of_size(120, 40), true);
        Annotator::without_font().annotate(&mut frame, &[m], &[], &scale);
        assert_eq!(*frame.get_pixel(100, 100), AUTHORIZED);
    }

    #[test]
    fn rectangles_near_the_border_are_clipped_not_panicking() {
        let mut frame = RgbImage::from_pixel(512, 512, Rgb([10, 10, 10]));
        let scale = FrameScale::for_frame(512, 512);
        let m = match_at(Rect::at(-5, -5).of_size(30, 30), false);
        Annotator::without_font().annotate(&mut frame, &[m], &[], &scale);
    }
}
