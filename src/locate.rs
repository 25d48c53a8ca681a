//! Plate-region localization
//!
//! One frame in, at most five candidate contours out, ranked by enclosed
//! area. The stage order is fixed: the gradient-texture mask and the
//! light-background mask are built independently and combined with a
//! bitwise AND, because a plate is both textured (it has characters) and
//! photometrically distinct (a light, bordered background). Requiring both
//! cues jointly suppresses false positives from either one alone.
//!
//! No detections is a valid, non-error outcome.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::horizontal_sobel;
use imageproc::map::map_colors2;
use imageproc::morphology::{dilate, erode, grayscale_close, grayscale_open, Mask};
use imageproc::rect::Rect;

use crate::debug_dump::DebugDump;
use crate::regions::Candidate;

/// Side length of the square working resolution every frame is downscaled to.
pub const PROC_SIZE: u32 = 512;

/// Maximum number of candidates returned per frame.
pub const KEEP: usize = 5;

/// Blur sigma equivalent to a 5x5 Gaussian kernel.
const GAUSSIAN_SIGMA: f32 = 1.1;

/// Per-frame ratios mapping working-frame coordinates back to the source
/// frame. Recomputed for every frame; never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScale {
    pub x: f32,
    pub y: f32,
}

impl FrameScale {
    pub fn for_frame(width: u32, height: u32) -> Self {
        Self {
            x: width as f32 / PROC_SIZE as f32,
            y: height as f32 / PROC_SIZE as f32,
        }
    }

    /// Map a working-frame rectangle into source-frame coordinates.
    pub fn to_source(&self, rect: Rect) -> Rect {
        let x = (rect.left() as f32 * self.x).round() as i32;
        let y = (rect.top() as f32 * self.y).round() as i32;
        let width = ((rect.width() as f32 * self.x).round() as u32).max(1);
        let height = ((rect.height() as f32 * self.y).round() as u32).max(1);
        Rect::at(x, y).of_size(width, height)
    }

    /// Map a working-frame point into source-frame coordinates.
    pub fn point_to_source(&self, x: i32, y: i32) -> (i32, i32) {
        (
            (x as f32 * self.x).round() as i32,
            (y as f32 * self.y).round() as i32,
        )
    }
}

/// Result of localization: ranked candidates plus the scale needed to map
/// them back onto the source frame.
#[derive(Debug)]
pub struct Localization {
    pub candidates: Vec<Candidate>,
    pub scale: FrameScale,
}

/// Locate plate-like regions in a frame.
///
/// The frame is downscaled to a fixed 512x512 working resolution regardless
/// of its aspect ratio; the distortion is undone by [`FrameScale`] when
/// rectangles are mapped back for cropping and drawing.
pub fn locate(frame: &DynamicImage, dump: &mut DebugDump) -> Localization {
    let scale = FrameScale::for_frame(frame.width(), frame.height());

    if dump.enabled() {
        dump.rgb("start", &frame.to_rgb8());
    }

    let working = frame.resize_exact(PROC_SIZE, PROC_SIZE, FilterType::Triangle);
    let gray = working.to_luma8();
    dump.gray("grayscale", &gray);

    // Erase small bright islands (diacritics, country-band glyphs) that
    // would otherwise break the plate's rectangular footprint.
    let opened = grayscale_open(&gray, &rect_mask(4, 4));
    dump.gray("removed_island", &opened);

    // Blackhat highlights dark character strokes against the lighter plate.
    let plate_kernel = rect_mask(13, 5);
    let blackhat_img = blackhat(&opened, &plate_kernel);
    dump.gray("morphological_opt", &blackhat_img);

    // Globally light regions, the photometric cue for plate backgrounds.
    let light = otsu_binary(&grayscale_close(&opened, &rect_mask(3, 3)));
    dump.gray("white_regions", &light);

    // Horizontal gradient energy, the texture cue for character strokes.
    let grad = normalized_gradient(&blackhat_img);
    dump.gray("sobel", &grad);

    let blurred = gaussian_blur_f32(&grad, GAUSSIAN_SIGMA);
    dump.gray("blur", &blurred);

    let closed = grayscale_close(&blurred, &plate_kernel);
    dump.gray("morph", &closed);

    let mut mask = otsu_binary(&closed);
    dump.gray("thres", &mask);

    // Despeckle while keeping large blobs intact.
    mask = erode(&mask, Norm::LInf, 2);
    mask = dilate(&mask, Norm::LInf, 2);
    dump.gray("erode_dilate", &mask);

    // Keep only textured regions that also sit on a light background.
    mask = map_colors2(&mask, &light, |m, l| Luma([m.0[0] & l.0[0]]));
    dump.gray("bitwise_AND", &mask);

    // Reconnect the characters of one plate into a single blob without
    // overgrowing into neighboring regions.
    mask = dilate(&mask, Norm::LInf, 2);
    mask = erode(&mask, Norm::LInf, 1);

    let contours = find_contours::<i32>(&mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Candidate::new(c.points))
        .collect();

    Localization {
        candidates: keep_largest(contours),
        scale,
    }
}

/// Keep the largest `KEEP` candidates by true polygon area, descending.
/// Fewer candidates than the cap is not an error; all of them are returned.
pub fn keep_largest(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| a.polygon_area().total_cmp(&b.polygon_area()));
    let cut = candidates.len().saturating_sub(KEEP);
    let mut top = candidates.split_off(cut);
    top.reverse();
    top
}

/// Rectangular structuring element with its anchor at the center.
fn rect_mask(width: u32, height: u32) -> Mask {
    let element = GrayImage::from_pixel(width, height, Luma([255u8]));
    Mask::from_image(&element, (width / 2) as u8, (height / 2) as u8)
}

/// Morphological blackhat: closing minus the input image.
fn blackhat(img: &GrayImage, mask: &Mask) -> GrayImage {
    let closed = grayscale_close(img, mask);
    map_colors2(&closed, img, |c, p| Luma([c.0[0].saturating_sub(p.0[0])]))
}

/// Otsu-derived global binarization.
fn otsu_binary(img: &GrayImage) -> GrayImage {
    let level = otsu_level(img);
    threshold(img, level, ThresholdType::Binary)
}

/// Absolute horizontal Sobel response, min-max normalized to the full 8-bit
/// range. A flat input (no gradient anywhere) yields an all-zero image.
fn normalized_gradient(img: &GrayImage) -> GrayImage {
    let grad = horizontal_sobel(img);
    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for p in grad.pixels() {
        let v = (p.0[0] as i32).abs();
        min = min.min(v);
        max = max.max(v);
    }
    let mut out = GrayImage::new(img.width(), img.height());
    if max <= min {
        return out;
    }
    let range = (max - min) as f32;
    for (x, y, p) in grad.enumerate_pixels() {
        let v = (p.0[0] as i32).abs();
        let scaled = 255.0 * (v - min) as f32 / range;
        out.put_pixel(x, y, Luma([scaled.round() as u8]));
    }
    out
}
