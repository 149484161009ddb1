//! Point/segment queries used for picking.

use ggez::glam::Vec2;

/// Distance from `p` to the closed segment `[a, b]`.
///
/// A zero-length segment degrades to the distance from `p` to `a`.
pub fn distance_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let r = b - a;
    let rr = r.dot(r);
    if rr == 0.0 {
        return p.distance(a);
    }
    let displ = p - a;
    let t = displ.dot(r) / rr;
    if t < 0.0 {
        p.distance(a)
    } else if t > 1.0 {
        p.distance(b)
    } else {
        (displ - r * t).length()
    }
}

/// Strict `|p - center| < r`, compared on squared lengths.
#[inline]
pub fn within_radius(p: Vec2, center: Vec2, r: f32) -> bool {
    p.distance_squared(center) < r * r
}
