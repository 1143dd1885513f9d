//! Collision detection
//!
//! Bullets are circles, tanks are axis-aligned squares (rotation is ignored
//! for hit tests). A cheap bounding-box rejection runs before the exact
//! circle-vs-rectangle test.

use glam::Vec2;

use super::state::{Bullet, Tank};

/// Bounding box of the circle overlaps the rectangle
#[inline]
pub fn aabb_overlap(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    !(center.x + radius < rect_center.x - half.x
        || center.x - radius > rect_center.x + half.x
        || center.y + radius < rect_center.y - half.y
        || center.y - radius > rect_center.y + half.y)
}

/// Exact circle vs axis-aligned rectangle intersection
pub fn circle_rect_intersect(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    let dist = (center - rect_center).abs();

    if dist.x > half.x + radius || dist.y > half.y + radius {
        return false;
    }
    // Center is within the rect's band on one axis: edge contact
    if dist.x <= half.x || dist.y <= half.y {
        return true;
    }

    // Corner region
    let corner = dist - half;
    corner.length_squared() <= radius * radius
}

/// Whether a bullet hits a tank. Bullets never hit their own side.
pub fn bullet_hits_tank(bullet: &Bullet, tank: &Tank) -> bool {
    if bullet.owner == tank.role {
        return false;
    }

    let half = tank.half_extents();
    let radius = bullet.radius();
    if !aabb_overlap(bullet.pos, radius, tank.pos, half) {
        return false;
    }

    circle_rect_intersect(bullet.pos, radius, tank.pos, half)
}

/// Euclidean distance test used by area effects (inclusive)
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) <= radius
}
