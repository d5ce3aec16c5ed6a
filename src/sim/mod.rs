//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per `tick`, driven by an input snapshot
//! - No rendering, audio or platform dependencies
//! - Side effects (sound cues) are reported as `GameEvent`s for the host

pub mod collision;
pub mod shapes;
pub mod state;
pub mod tick;
pub mod trail;

pub use collision::{bounce_angle, bounce_velocity, handle_ball_paddle_collision};
pub use shapes::{Circle, Rect, Resolution, resolve};
pub use state::{Ball, Game, GameEvent, GameMode, Score, Side};
pub use tick::{Key, TickInput, tick};
pub use trail::{Trail, TrailElement};
