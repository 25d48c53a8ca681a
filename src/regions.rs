//! Candidate regions and the rectangle filter
//!
//! A candidate is the outer contour of a connected blob found by the
//! localizer. Before cropping, candidates are reduced to axis-aligned
//! bounding rectangles and anything that is not plausibly a plate-shaped
//! rectangle is discarded.

use imageproc::point::Point;
use imageproc::rect::Rect;

/// Maximum allowed gap between a candidate's bounding-rectangle area and its
/// true polygon area, in the 512x512 working space. A large gap means the
/// blob is irregular or sparse rather than rectangular.
pub const RECT_DIFF: f64 = 2000.0;

/// Minimum width/height aspect ratio for a plate rectangle.
pub const MIN_AR: f32 = 1.0;

/// Maximum width/height aspect ratio for a plate rectangle.
pub const MAX_AR: f32 = 6.0;

/// Outer contour of a connected foreground blob, in working-frame
/// coordinates. Produced and consumed within a single frame.
#[derive(Debug, Clone)]
pub struct Candidate {
    points: Vec<Point<i32>>,
}

impl Candidate {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Contour points in boundary order.
    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Absolute polygon area enclosed by the contour (shoelace formula).
    pub fn polygon_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut twice_area = 0i64;
        for (i, p) in self.points.iter().enumerate() {
            let q = &self.points[(i + 1) % self.points.len()];
            twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }
        (twice_area.abs() as f64) / 2.0
    }

    /// Axis-aligned bounding rectangle, or `None` for an empty contour.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let width = (max_x - min_x + 1) as u32;
        let height = (max_y - min_y + 1) as u32;
        Some(Rect::at(min_x, min_y).of_size(width, height))
    }
}

/// Reduce candidates to bounding rectangles and keep only the plate-shaped
/// ones: near-rectangular blobs (`RECT_DIFF`) with an aspect ratio inside
/// `[MIN_AR, MAX_AR]`. Coordinates stay in the working frame.
pub fn filter_rectangles(candidates: &[Candidate]) -> Vec<Rect> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let rect = candidate.bounding_rect()?;
            let rect_area = rect.width() as f64 * rect.height() as f64;
            let difference = rect_area - candidate.polygon_area();
            if difference < RECT_DIFF {
                Some(rect)
            } else {
                None
            }
        })
        .filter(|rect| {
            let aspect_ratio = rect.width() as f32 / rect.height() as f32;
            (MIN_AR..=MAX_AR).contains(&aspect_ratio)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_contour(x: i32, y: i32, w: i32, h: i32) -> Candidate {
        Candidate::new(vec![
            Point::new(x, y),
            Point::new(x + w - 1, y),
            Point::new(x + w - 1, y + h - 1),
            Point::new(x, y + h - 1),
        ])
    }

    #[test]
    fn rectangular_plate_shaped_candidate_survives() {
        let candidate = rect_contour(10, 20, 100, 50);
        let rects = filter_rectangles(&[candidate]);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0], Rect::at(10, 20).of_size(100, 50));
    }

    #[test]
    fn sparse_candidate_is_rejected() {
        // A triangle fills only half of its bounding box; the difference is
        // far above RECT_DIFF.
        let triangle = Candidate::new(vec![
            Point::new(0, 0),
            Point::new(199, 0),
            Point::new(199, 99),
        ]);
        assert!(filter_rectangles(&[triangle]).is_empty());
    }

    #[test]
    fn aspect_ratio_outside_bounds_is_rejected() {
        // Too wide.
        let strip = rect_contour(0, 0, 300, 10);
        assert!(filter_rectangles(&[strip]).is_empty());
        // Taller than wide.
        let portrait = rect_contour(0, 0, 50, 100);
        assert!(filter_rectangles(&[portrait]).is_empty());
    }

    #[test]
    fn shoelace_area_matches_hand_computation() {
        let candidate = rect_contour(0, 0, 100, 50);
        assert_eq!(candidate.polygon_area(), 99.0 * 49.0);
    }

    #[test]
    fn empty_candidate_yields_no_rectangle() {
        let empty = Candidate::new(vec![]);
        assert!(empty.bounding_rect().is_none());
        assert!(filter_rectangles(&[empty]).is_empty());
    }
}
