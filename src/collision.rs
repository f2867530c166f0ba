use egui::{Pos2, Vec2};

use crate::geometry::{segment_intersection, Segment};

/// Where a moving outline crossed an obstacle outline, and the obstacle's
/// surface normal at that point (oriented towards the mover).
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub point: Pos2,
    pub normal: Vec2,
}

/// Tests every mover segment against every obstacle segment and returns the
/// intersection nearest `from` (the mover's pre-step position). Works purely
/// on segment lists, so arbitrary polygonal hit shapes are supported
/// uniformly; no bounding-box shortcut.
pub fn nearest_contact(mover: &[Segment], obstacle: &[Segment], from: Pos2) -> Option<Contact> {
    let mut best: Option<(f32, Contact)> = None;

    for &m in mover {
        for &o in obstacle {
            let Some(point) = segment_intersection(m, o) else {
                continue;
            };

            let dist = (point - from).length();
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((
                    dist,
                    Contact {
                        point,
                        normal: facing_normal(o, from),
                    },
                ));
            }
        }
    }

    best.map(|(_, contact)| contact)
}

/// Elastic reflection of a velocity about a unit surface normal.
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Unit perpendicular of `segment`, flipped if needed so it points towards
/// `towards` (the side the mover came from).
fn facing_normal(segment: Segment, towards: Pos2) -> Vec2 {
    let dir = segment.1 - segment.0;
    let mut normal = egui::vec2(-dir.y, dir.x).normalized();

    if normal.dot(towards - segment.0) < 0.0 {
        normal = -normal;
    }

    normal
}
