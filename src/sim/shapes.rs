//! Integer bounding shapes for the ball and paddles
//!
//! Collision queries run on whole pixels: the ball's float position is truncated
//! into a `Circle` before every check, and paddles are plain `Rect`s.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (paddle footprint), origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Half of the height, as used by the bounce angle
    #[inline]
    pub fn half_height(&self) -> f64 {
        f64::from(self.h) / 2.0
    }

    /// Vertical centre line
    #[inline]
    pub fn center_y(&self) -> f64 {
        f64::from(self.y) + self.half_height()
    }

    /// Same rectangle moved horizontally by `dx`
    #[inline]
    pub fn shifted_x(&self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }
}

/// Circle (ball footprint), origin at the centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

impl Circle {
    pub const fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }

    /// Overlap test against a rectangle (touching counts)
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest_x = self.x.clamp(rect.x, rect.x + rect.w.max(0));
        let closest_y = self.y.clamp(rect.y, rect.y + rect.h.max(0));
        distance(self.x, self.y, closest_x, closest_y) <= self.radius
    }

    /// Overlap test with the circle moved by `(dx, dy)`
    pub fn would_intersect_rect(&self, rect: &Rect, dx: i32, dy: i32) -> bool {
        Circle::new(self.x + dx, self.y + dy, self.radius).intersects_rect(rect)
    }
}

/// Truncated euclidean distance between two pixel positions
fn distance(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    let dx = i64::from(x1) - i64::from(x2);
    let dy = i64::from(y1) - i64::from(y2);
    ((dx * dx + dy * dy) as f64).sqrt() as i32
}

/// Outcome of moving a circle toward a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Largest movement along the requested direction that does not overlap
    pub resolve_x: i32,
    pub resolve_y: i32,
    colliding: bool,
    teleporting: bool,
}

impl Resolution {
    /// Whether the requested movement would have overlapped the rectangle
    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// Whether clearing the overlap needed a movement opposite to the request,
    /// i.e. the circle already overlapped before moving
    pub fn is_teleporting(&self) -> bool {
        self.teleporting
    }
}

/// Try to move `circle` by `(dx, dy)` against `rect`
///
/// Backs the movement off one pixel at a time along the dominant axis (the
/// other axis follows the slope) until the circle no longer overlaps. Backing
/// off continues past zero when the circle starts inside the rectangle. A zero
/// movement never collides.
pub fn resolve(circle: &Circle, rect: &Rect, dx: i32, dy: i32) -> Resolution {
    let mut out = Resolution {
        resolve_x: dx,
        resolve_y: dy,
        colliding: false,
        teleporting: false,
    };
    if dx == 0 && dy == 0 {
        return out;
    }

    let x_dominant = dx.abs() >= dy.abs();
    let slope = match (dx, dy) {
        (0, _) | (_, 0) => 0.0,
        _ if x_dominant => dy as f32 / dx as f32,
        _ => dx as f32 / dy as f32,
    };

    while circle.would_intersect_rect(rect, out.resolve_x, out.resolve_y) {
        out.colliding = true;
        if x_dominant {
            out.resolve_x -= dx.signum();
            if slope != 0.0 {
                out.resolve_y = (slope * out.resolve_x as f32) as i32;
            }
        } else {
            out.resolve_y -= dy.signum();
            if slope != 0.0 {
                out.resolve_x = (slope * out.resolve_y as f32) as i32;
            }
        }
    }

    out.teleporting =
        (dx - out.resolve_x).abs() > dx.abs() || (dy - out.resolve_y).abs() > dy.abs();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(100, 100, 20, 80);

        // Left of the rect, touching the edge exactly
        assert!(Circle::new(90, 140, 10).intersects_rect(&rect));
        // One pixel further away
        assert!(!Circle::new(89, 140, 10).intersects_rect(&rect));
        // Centre inside the rect
        assert!(Circle::new(110, 120, 2).intersects_rect(&rect));
        // Near a corner but outside the radius
        assert!(!Circle::new(92, 92, 10).intersects_rect(&rect));
    }

    #[test]
    fn test_resolve_zero_delta_never_collides() {
        let rect = Rect::new(0, 0, 50, 50);
        let overlapping = Circle::new(25, 25, 10);

        let result = resolve(&overlapping, &rect, 0, 0);
        assert!(!result.is_colliding());
        assert_eq!((result.resolve_x, result.resolve_y), (0, 0));
    }

    #[test]
    fn test_resolve_backs_off_until_clear() {
        let rect = Rect::new(100, 0, 20, 200);
        let circle = Circle::new(80, 100, 5);

        // Moving 20 px right would put the circle inside the rect
        let result = resolve(&circle, &rect, 20, 0);
        assert!(result.is_colliding());
        assert_eq!(result.resolve_y, 0);
        assert!(!circle.would_intersect_rect(&rect, result.resolve_x, result.resolve_y));
        // Largest clear step: centre at 94 leaves a 6 px gap to x = 100
        assert_eq!(result.resolve_x, 14);
        assert!(!result.is_teleporting());
    }

    #[test]
    fn test_resolve_from_inside_backs_past_origin() {
        let rect = Rect::new(100, 0, 20, 200);
        let circle = Circle::new(105, 100, 5);

        let result = resolve(&circle, &rect, 10, 0);
        assert!(result.is_colliding());
        assert!(result.is_teleporting());
        // Centre at 94 is the first position more than 5 px from x = 100
        assert_eq!((result.resolve_x, result.resolve_y), (-11, 0));
        assert!(!circle.would_intersect_rect(&rect, result.resolve_x, result.resolve_y));
    }

    #[test]
    fn test_resolve_follows_slope() {
        let rect = Rect::new(100, 0, 20, 400);
        let circle = Circle::new(80, 100, 5);

        let result = resolve(&circle, &rect, 20, 10);
        assert!(result.is_colliding());
        assert_eq!(result.resolve_y, result.resolve_x / 2);
    }

    #[test]
    fn test_resolve_clear_path() {
        let rect = Rect::new(100, 0, 20, 200);
        let circle = Circle::new(20, 100, 5);

        let result = resolve(&circle, &rect, 10, -10);
        assert!(!result.is_colliding());
        assert_eq!((result.resolve_x, result.resolve_y), (10, -10));
    }
}
