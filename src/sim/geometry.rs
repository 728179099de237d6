//! Collision geometry for circles and blade segments
//!
//! Every body in the arena is a circle. The only non-circle is the melee
//! blade, a line segment tested against the opponent's circle each frame.

use glam::Vec2;

/// True if two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Segment vs circle intersection
///
/// The segment is `P(t) = start + t * (end - start)` for `t` in [0, 1].
/// Substituting into `|P - center|² = radius²` gives `a t² + b t + c = 0`;
/// the segment touches the circle iff the discriminant is non-negative and a
/// root lies in [0, 1].
pub fn segment_intersects_circle(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let d = end - start;
    let f = start - center;

    let a = d.dot(d);
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    if a <= f32::EPSILON {
        // Degenerate segment: a single point
        return c <= 0.0;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
}

/// Outcome of keeping a circle inside the arena rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Reflect a circle off the walls of `[0, width] x [0, height]`
///
/// A velocity component is flipped so it points back inside, and the
/// position is clamped so the circle stays fully in bounds.
pub fn bounce_inside(pos: Vec2, vel: Vec2, radius: f32, width: f32, height: f32) -> WallContact {
    let mut pos = pos;
    let mut vel = vel;
    let mut hit = false;

    if pos.x - radius <= 0.0 {
        vel.x = vel.x.abs();
        hit = true;
    } else if pos.x + radius >= width {
        vel.x = -vel.x.abs();
        hit = true;
    }
    if pos.y - radius <= 0.0 {
        vel.y = vel.y.abs();
        hit = true;
    } else if pos.y + radius >= height {
        vel.y = -vel.y.abs();
        hit = true;
    }

    if hit {
        pos.x = pos.x.clamp(radius, (width - radius).max(radius));
        pos.y = pos.y.clamp(radius, (height - radius).max(radius));
    }

    WallContact { pos, vel }
}

/// True once any part of a circle touches or leaves the arena rectangle
#[inline]
pub fn touches_bounds(pos: Vec2, radius: f32, width: f32, height: f32) -> bool {
    pos.x - radius <= 0.0
        || pos.x + radius >= width
        || pos.y - radius <= 0.0
        || pos.y + radius >= height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_through_circle() {
        assert!(segment_intersects_circle(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn test_segment_misses_offset_circle() {
        assert!(!segment_intersects_circle(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 20.0),
            5.0
        ));
    }

    #[test]
    fn test_segment_ending_inside_circle() {
        // Blade tip pokes into the circle but never exits
        assert!(segment_intersects_circle(
            Vec2::ZERO,
            Vec2::new(45.0, 0.0),
            Vec2::new(50.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn test_segment_short_of_circle() {
        assert!(!segment_intersects_circle(
            Vec2::ZERO,
            Vec2::new(30.0, 0.0),
            Vec2::new(50.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vec2::new(3.0, 4.0);
        assert!(segment_intersects_circle(p, p, Vec2::ZERO, 5.0));
        assert!(!segment_intersects_circle(p, p, Vec2::ZERO, 4.0));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_bounce_off_right_wall() {
        let contact = bounce_inside(Vec2::new(98.0, 50.0), Vec2::new(3.0, 1.0), 5.0, 100.0, 100.0);
        assert_eq!(contact.vel, Vec2::new(-3.0, 1.0));
        assert_eq!(contact.pos.x, 95.0);
    }

    #[test]
    fn test_bounce_keeps_inward_velocity() {
        // Already heading back inside: do not flip it outward again
        let contact = bounce_inside(Vec2::new(2.0, 50.0), Vec2::new(4.0, 0.0), 5.0, 100.0, 100.0);
        assert_eq!(contact.vel.x, 4.0);
        assert_eq!(contact.pos.x, 5.0);
    }

    #[test]
    fn test_touches_bounds() {
        assert!(!touches_bounds(Vec2::new(50.0, 50.0), 8.0, 100.0, 100.0));
        assert!(touches_bounds(Vec2::new(93.0, 50.0), 8.0, 100.0, 100.0));
        assert!(touches_bounds(Vec2::new(-20.0, 50.0), 8.0, 100.0, 100.0));
    }
}
