//! Render assets built once at startup and handed to the renderer
//!
//! The simulation never touches these.

use crate::consts::{FONT_SIZE, SMALL_FONT_SIZE};
use crate::text::{ArcadeFace, CachedFace};

/// Colours for game elements
pub mod colors {
    pub const PADDLE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const TRAIL: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const TEXT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const DEBUG_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Background gradient, top then bottom
    pub const BACKGROUND_TOP: [f32; 4] = [0.36, 0.62, 0.84, 1.0];
    pub const BACKGROUND_BOTTOM: [f32; 4] = [0.93, 0.72, 0.46, 1.0];
    pub const HIGH_CONTRAST_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const HIGH_CONTRAST_TEXT: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
}

/// Everything the renderer needs besides the game state
#[derive(Debug)]
pub struct Assets {
    /// Score font
    pub font: CachedFace<ArcadeFace>,
    /// Start prompt font
    pub small_font: CachedFace<ArcadeFace>,
    pub background_top: [f32; 4],
    pub background_bottom: [f32; 4],
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}

impl Assets {
    pub fn new() -> Self {
        Self {
            font: CachedFace::new(ArcadeFace::new(FONT_SIZE)),
            small_font: CachedFace::new(ArcadeFace::new(SMALL_FONT_SIZE)),
            background_top: colors::BACKGROUND_TOP,
            background_bottom: colors::BACKGROUND_BOTTOM,
        }
    }
}
