//! Ball motion trail
//!
//! Purely cosmetic: a fixed-length history of ball samples, newest first, whose
//! radii shrink every tick. Nothing in the simulation reads it back.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TRAIL_DECAY, TRAIL_LENGTH};

/// One recorded sample of the ball
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailElement {
    pub radius: f64,
    pub coord: DVec2,
    /// Sprite rotation (radians)
    pub angle: f64,
    /// Ball speed when recorded; stretches the sprite along its length
    pub speed: f64,
}

impl TrailElement {
    /// Sprite scale: width is the radius, length grows with speed
    pub fn scale(&self) -> DVec2 {
        DVec2::new(self.radius, self.radius + self.speed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    elements: Vec<TrailElement>,
    current_angle: f64,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

impl Trail {
    pub fn new() -> Self {
        Self::with_len(TRAIL_LENGTH)
    }

    /// Trail with a custom number of samples (at least one)
    pub fn with_len(len: usize) -> Self {
        Self {
            elements: vec![TrailElement::default(); len.max(1)],
            current_angle: 0.0,
        }
    }

    /// Samples, newest first
    pub fn elements(&self) -> &[TrailElement] {
        &self.elements
    }

    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    /// Re-orient new samples along the ball's direction of travel.
    /// Only called when the velocity changes direction (bounces, reset).
    pub fn update_angle(&mut self, velocity: DVec2) {
        self.current_angle = velocity.y.atan2(velocity.x) - 3.0 * std::f64::consts::PI / 2.0;
    }

    /// Record a ball sample at the front and drop the oldest one
    pub fn add(&mut self, ball_radius: i32, ball_coord: DVec2, velocity: DVec2) {
        let radius = f64::from(ball_radius) * 0.5;
        let mut coord = ball_coord;
        coord.y += radius / 2.0;
        if velocity.x < 0.0 {
            coord.y += radius;
        }

        self.elements.pop();
        self.elements.insert(
            0,
            TrailElement {
                radius,
                coord,
                angle: self.current_angle,
                speed: velocity.length(),
            },
        );

        for element in &mut self.elements {
            element.radius *= TRAIL_DECAY;
        }
    }
}
