use egui::{Pos2, Vec2};
use thiserror::Error;

/// One edge of a hit outline, between two adjacent world points.
pub type Segment = (Pos2, Pos2);

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("an outline needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// Translates every point by `origin`, preserving order and length.
/// The input is never mutated; world geometry is always derived fresh from
/// the shape-local points, so repeated calls accumulate no drift.
pub fn offset_points(points: &[Pos2], origin: Vec2) -> Vec<Pos2> {
    points.iter().map(|p| *p + origin).collect()
}

/// Turns an ordered point list into the segments of its outline.
///
/// The outline is treated as a closed polygon: the last point connects back
/// to the first, unless the list already repeats the first point at the end.
pub fn segments_from_points(points: &[Pos2]) -> Result<Vec<Segment>, GeometryError> {
    if points.len() < 2 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }

    let mut segments: Vec<Segment> = points.windows(2).map(|w| (w[0], w[1])).collect();

    if points.first() != points.last() {
        segments.push((points[points.len() - 1], points[0]));
    }

    Ok(segments)
}

/// Intersection point of two segments, or `None` when they are parallel or
/// do not cross within both segments' extents.
pub fn segment_intersection(a: Segment, b: Segment) -> Option<Pos2> {
    let r = a.1 - a.0;
    let s = b.1 - b.0;

    let denom = cross(r, s);
    if denom == 0.0 {
        // Parallel (collinear overlap counts as no crossing)
        return None;
    }

    let qp = b.0 - a.0;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a.0 + t * r)
    } else {
        None
    }
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn square() -> Vec<Pos2> {
        vec![pos2(0., 0.), pos2(10., 0.), pos2(10., 10.), pos2(0., 10.)]
    }

    #[test]
    fn test_offset_points() {
        let points = square();
        let offset = offset_points(&points, vec2(3., -2.));

        assert_eq!(offset.len(), points.len());
        for (p, o) in points.iter().zip(&offset) {
            assert_eq!(*o, pos2(p.x + 3., p.y - 2.));
        }
        // input untouched
        assert_eq!(points, square());
    }

    #[test]
    fn test_segments_close_the_outline() {
        let segments = segments_from_points(&square()).unwrap();

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], (pos2(0., 0.), pos2(10., 0.)));
        assert_eq!(segments[3], (pos2(0., 10.), pos2(0., 0.)));
    }

    #[test]
    fn test_segments_skip_redundant_closing_point() {
        let mut points = square();
        points.push(points[0]);

        let segments = segments_from_points(&points).unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3], (pos2(0., 10.), pos2(0., 0.)));
    }

    #[test]
    fn test_segments_reject_degenerate_outlines() {
        assert_eq!(segments_from_points(&[]), Err(GeometryError::TooFewPoints(0)));
        assert_eq!(
            segments_from_points(&[pos2(1., 1.)]),
            Err(GeometryError::TooFewPoints(1))
        );
    }

    #[test]
    fn test_segments_are_deterministic() {
        let points = square();
        assert_eq!(
            segments_from_points(&points).unwrap(),
            segments_from_points(&points).unwrap()
        );
    }

    #[test]
    fn test_segment_intersection_crossing() {
        let a = (pos2(0., 0.), pos2(10., 10.));
        let b = (pos2(0., 10.), pos2(10., 0.));

        assert_eq!(segment_intersection(a, b), Some(pos2(5., 5.)));
    }

    #[test]
    fn test_segment_intersection_touching_endpoint() {
        let a = (pos2(0., 0.), pos2(5., 5.));
        let b = (pos2(5., 5.), pos2(10., 0.));

        assert_eq!(segment_intersection(a, b), Some(pos2(5., 5.)));
    }

    #[test]
    fn test_segment_intersection_parallel() {
        let a = (pos2(0., 0.), pos2(10., 0.));
        let b = (pos2(0., 1.), pos2(10., 1.));

        assert_eq!(segment_intersection(a, b), None);
    }

    #[test]
    fn test_segment_intersection_disjoint() {
        let a = (pos2(0., 0.), pos2(1., 1.));
        let b = (pos2(5., 0.), pos2(5., 10.));

        assert_eq!(segment_intersection(a, b), None);
    }
}
