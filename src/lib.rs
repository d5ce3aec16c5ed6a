//! Pong - two paddles, one ball, one keyboard
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddles, ball, collisions, scoring, game mode)
//! - `renderer`: Draw commands, vertex tessellation and the WebGPU pipeline
//! - `audio`: Procedural sound cues
//! - `text`: Font measurement for centred HUD text
//! - `assets`: Fonts and colours built once at startup
//! - `settings`: Cosmetic and audio preferences

pub mod assets;
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod text;

pub use assets::Assets;
pub use settings::Settings;

/// Game configuration constants
///
/// Geometry is proportional to the window and is recomputed on every reset.
pub mod consts {
    /// Ball radius is window width / this
    pub const BALL_RADIUS_DIVISOR: f64 = 60.0;
    /// Ball base speed (pixels per tick) is window width / this
    pub const BALL_SPEED_DIVISOR: f64 = 100.0;
    /// Maximum ball speed as a multiple of the base speed
    pub const BALL_MAX_SPEED_FACTOR: f64 = 3.0;

    /// Paddle x inset from its wall is window width / this
    pub const PADDLE_INSET_DIVISOR: i32 = 16;
    /// Paddle width is window width / this
    pub const PADDLE_WIDTH_DIVISOR: f64 = 60.0;
    /// Paddle height is window height / this
    pub const PADDLE_HEIGHT_DIVISOR: f64 = 5.0;
    /// Paddle speed (pixels per tick) is window height / this
    pub const PADDLE_SPEED_DIVISOR: f64 = 60.0;

    /// Maximum deflection off a paddle (radians, 45 degrees)
    pub const MAX_BOUNCE_ANGLE: f64 = std::f64::consts::FRAC_PI_4;

    /// Number of samples kept in the ball trail
    pub const TRAIL_LENGTH: usize = 1000;
    /// Per-tick radius decay applied to every trail sample
    pub const TRAIL_DECAY: f64 = 0.9;

    /// HUD font sizes (pixels)
    pub const FONT_SIZE: f64 = 32.0;
    pub const SMALL_FONT_SIZE: f64 = FONT_SIZE / 2.0;
    /// Start message sits this far below the window centre
    pub const START_MESSAGE_OFFSET: f64 = 20.0;

    /// Ticks per second the host aims for
    pub const TICKS_PER_SECOND: f64 = 60.0;
}
