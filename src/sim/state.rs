//! Game state and core simulation types
//!
//! The whole aggregate is owned by `Game`; entities are reinitialised in place
//! by `Game::reset` rather than created and destroyed.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, Rect};
use super::trail::Trail;
use crate::consts::*;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Idle, showing the start prompt
    #[default]
    Wait,
    /// Active simulation
    Play,
    /// Frozen; drawn like Play with the start prompt on top
    Pause,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Wait, GameMode::Play, GameMode::Pause];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Wait => "Wait",
            GameMode::Play => "Play",
            GameMode::Pause => "Pause",
        }
    }
}

/// Which side of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Points tallied per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn add_point(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.left, self.right)
    }
}

/// Something the host may want to react to (sound cues, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball bounced off a paddle
    PaddleHit(Side),
    /// Ball bounced off the top or bottom wall
    WallHit,
    /// Ball left the field through the given side's wall
    Scored(Side),
    /// Play started from Wait (geometry was reset)
    Started,
    Paused,
    Resumed,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub radius: i32,
    pub coord: DVec2,
    pub velocity: DVec2,
    /// x = minimum horizontal speed, y = maximum speed
    pub velocity_bounds: DVec2,
    pub base_speed: f64,
    #[serde(skip)]
    pub trail: Trail,
}

impl Ball {
    /// Stationary ball with no speed bounds
    pub fn new(radius: i32, coord: DVec2) -> Self {
        Self {
            radius,
            coord,
            velocity: DVec2::ZERO,
            velocity_bounds: DVec2::ZERO,
            base_speed: 0.0,
            trail: Trail::new(),
        }
    }

    /// Pixel bounding circle at the current position
    pub fn bounding_circle(&self) -> Circle {
        Circle::new(self.coord.x as i32, self.coord.y as i32, self.radius)
    }

    /// Record current state to the trail (call each tick in play)
    pub fn record_trail(&mut self) {
        self.trail.add(self.radius, self.coord, self.velocity);
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub mode: GameMode,
    pub score: Score,
    pub left_paddle: Rect,
    pub right_paddle: Rect,
    pub ball: Ball,
    pub window_width: i32,
    pub window_height: i32,
    /// Pixels a paddle moves per tick
    pub paddle_speed: i32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Fresh game waiting for a start input. Geometry stays degenerate until
    /// the host reports a window size through `layout`.
    pub fn new() -> Self {
        let mut game = Self {
            mode: GameMode::Wait,
            score: Score::default(),
            left_paddle: Rect::new(1, 8, 2, 4),
            right_paddle: Rect::new(15, 8, 2, 4),
            ball: Ball::new(3, DVec2::new(8.0, 4.0)),
            window_width: 0,
            window_height: 0,
            paddle_speed: 0,
        };
        game.reset();
        game
    }

    /// Game already laid out for a window
    pub fn with_window(width: i32, height: i32) -> Self {
        let mut game = Self::new();
        game.layout(width, height);
        game.reset();
        game
    }

    /// Recompute ball and paddle geometry from the window size.
    /// Score and mode are untouched.
    pub fn reset(&mut self) {
        let width = self.window_width;
        let height = self.window_height;
        let w = f64::from(width);
        let h = f64::from(height);

        let base_speed = w / BALL_SPEED_DIVISOR;
        let mut ball = Ball::new((w / BALL_RADIUS_DIVISOR) as i32, DVec2::new(w / 2.0, h / 2.0));
        ball.base_speed = base_speed;
        ball.velocity = DVec2::new(base_speed, base_speed);
        ball.velocity_bounds = DVec2::new(base_speed, base_speed * BALL_MAX_SPEED_FACTOR);
        ball.trail.update_angle(ball.velocity);
        self.ball = ball;

        let paddle_w = (w / PADDLE_WIDTH_DIVISOR) as i32;
        let paddle_h = (h / PADDLE_HEIGHT_DIVISOR) as i32;
        let inset = width / PADDLE_INSET_DIVISOR;
        self.left_paddle = Rect::new(inset, height / 2, paddle_w, paddle_h);
        self.right_paddle = Rect::new(width - inset, height / 2, paddle_w, paddle_h);
        self.paddle_speed = (h / PADDLE_SPEED_DIVISOR) as i32;
    }

    /// Window-size provider hook. A size change sends the game back to Wait so
    /// that geometry is recomputed before play resumes. Returns the logical size.
    pub fn layout(&mut self, outside_width: i32, outside_height: i32) -> (i32, i32) {
        if self.window_width != outside_width || self.window_height != outside_height {
            log::info!(
                "Window resized {}x{} -> {}x{}",
                self.window_width,
                self.window_height,
                outside_width,
                outside_height
            );
            self.window_width = outside_width;
            self.window_height = outside_height;
            self.mode = GameMode::Wait;
        }
        (outside_width, outside_height)
    }

    /// Enter Play with freshly reset geometry
    pub fn start(&mut self) {
        self.reset();
        self.mode = GameMode::Play;
    }

    pub fn paddle(&self, side: Side) -> &Rect {
        match side {
            Side::Left => &self.left_paddle,
            Side::Right => &self.right_paddle,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Rect {
        match side {
            Side::Left => &mut self.left_paddle,
            Side::Right => &mut self.right_paddle,
        }
    }
}
