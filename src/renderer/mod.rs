//! Rendering
//!
//! `draw` turns game state into a handful of draw calls on a `Surface`. The
//! `VertexSurface` tessellates them into triangles for the WebGPU pipeline and
//! keeps text aside for the DOM HUD.

pub mod pipeline;
pub mod shapes;
pub mod tessellate;
pub mod vertex;

pub use pipeline::RenderState;
pub use tessellate::{TextItem, VertexSurface};
pub use vertex::Vertex;

use glam::{IVec2, Vec2};

use crate::assets::{Assets, colors};
use crate::consts::START_MESSAGE_OFFSET;
use crate::settings::Settings;
use crate::sim::{Game, GameMode};
use crate::text::{ArcadeFace, CachedFace, FontFace, center_text};

pub const START_MESSAGE: &str = "Press to Start";

/// Measured frame and tick rates, shown on the debug line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameRate {
    pub fps: f64,
    pub tps: f64,
}

/// Something the game can be drawn onto. Coordinates are window pixels,
/// y down.
pub trait Surface {
    /// Solid axis-aligned rectangle, top-left at `min`
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]);

    /// Unit quad scaled, rotated about its origin, then translated
    fn draw_sprite(&mut self, scale: Vec2, rotation: f32, translation: Vec2, color: [f32; 4]);

    /// Fill the whole window
    fn draw_background(&mut self, top: [f32; 4], bottom: [f32; 4]);

    /// `position` is the left end of the baseline
    fn draw_text(&mut self, text: &str, position: IVec2, size: f64, color: [f32; 4]);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        min: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Sprite {
        scale: Vec2,
        rotation: f32,
        translation: Vec2,
        color: [f32; 4],
    },
    Background {
        top: [f32; 4],
        bottom: [f32; 4],
    },
    Text {
        text: String,
        position: IVec2,
        size: f64,
        color: [f32; 4],
    },
}

/// Records calls instead of drawing them
impl Surface for Vec<DrawCommand> {
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
        self.push(DrawCommand::Rect { min, size, color });
    }

    fn draw_sprite(&mut self, scale: Vec2, rotation: f32, translation: Vec2, color: [f32; 4]) {
        self.push(DrawCommand::Sprite {
            scale,
            rotation,
            translation,
            color,
        });
    }

    fn draw_background(&mut self, top: [f32; 4], bottom: [f32; 4]) {
        self.push(DrawCommand::Background { top, bottom });
    }

    fn draw_text(&mut self, text: &str, position: IVec2, size: f64, color: [f32; 4]) {
        self.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            size,
            color,
        });
    }
}

/// Issue the draw calls for one frame
pub fn draw(
    game: &Game,
    assets: &Assets,
    settings: &Settings,
    fps: FrameRate,
    surface: &mut impl Surface,
) {
    let text_color = if settings.high_contrast {
        surface.draw_background(colors::HIGH_CONTRAST_BACKGROUND, colors::HIGH_CONTRAST_BACKGROUND);
        colors::HIGH_CONTRAST_TEXT
    } else {
        surface.draw_background(assets.background_top, assets.background_bottom);
        colors::TEXT
    };

    if settings.show_fps {
        let line = format!("FPS: {:.2}, TPS: {:.2}", fps.fps, fps.tps);
        let size = assets.small_font.height();
        surface.draw_text(&line, IVec2::new(0, size as i32), size, colors::DEBUG_TEXT);
    }

    let score = game.score.to_string();
    draw_centered(game, &score, &assets.font, 0, text_color, surface);

    match game.mode {
        GameMode::Wait => draw_start(game, assets, text_color, surface),
        GameMode::Play => {
            draw_paddles(game, surface);
            draw_ball(game, settings, surface);
        }
        GameMode::Pause => {
            draw_start(game, assets, text_color, surface);
            draw_paddles(game, surface);
            draw_ball(game, settings, surface);
        }
    }
}

fn draw_centered(
    game: &Game,
    text: &str,
    font: &CachedFace<ArcadeFace>,
    y_offset: i32,
    color: [f32; 4],
    surface: &mut impl Surface,
) {
    let pos = center_text(text, font, game.window_width, game.window_height);
    surface.draw_text(text, pos + IVec2::new(0, y_offset), font.height(), color);
}

fn draw_start(game: &Game, assets: &Assets, color: [f32; 4], surface: &mut impl Surface) {
    draw_centered(
        game,
        START_MESSAGE,
        &assets.small_font,
        START_MESSAGE_OFFSET as i32,
        color,
        surface,
    );
}

fn draw_paddles(game: &Game, surface: &mut impl Surface) {
    for paddle in [&game.left_paddle, &game.right_paddle] {
        surface.fill_rect(
            Vec2::new(paddle.x as f32, paddle.y as f32),
            Vec2::new(paddle.w as f32, paddle.h as f32),
            colors::PADDLE,
        );
    }
}

/// Ball as a radius-sized square at its coordinate, then the trail
fn draw_ball(game: &Game, settings: &Settings, surface: &mut impl Surface) {
    let ball = &game.ball;
    let r = ball.radius as f32;
    surface.draw_sprite(Vec2::splat(r), 0.0, ball.coord.as_vec2(), colors::BALL);

    let elements = ball.trail.elements();
    let samples = settings.trail_samples(elements.len());
    for element in elements[..samples].iter().filter(|e| e.radius > 0.0) {
        surface.draw_sprite(
            element.scale().as_vec2(),
            element.angle as f32,
            element.coord.as_vec2(),
            colors::TRAIL,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Side, TickInput, tick};

    fn render(game: &Game, settings: &Settings) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        draw(
            game,
            &Assets::new(),
            settings,
            FrameRate { fps: 60.0, tps: 60.0 },
            &mut commands,
        );
        commands
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count_rects(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count()
    }

    fn count_sprites(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }

    #[test]
    fn test_every_mode_draws_background_score_and_fps() {
        let settings = Settings::default();
        for mode in GameMode::ALL {
            let mut game = Game::with_window(1600, 900);
            game.mode = mode;
            let commands = render(&game, &settings);

            assert!(
                matches!(commands[0], DrawCommand::Background { .. }),
                "{} should start with the background",
                mode.as_str()
            );
            let texts = texts(&commands);
            assert_eq!(texts[0], "FPS: 60.00, TPS: 60.00");
            assert_eq!(texts[1], "0 - 0");

            let shows_prompt = texts.contains(&START_MESSAGE);
            let shows_field = count_rects(&commands) == 2;
            match mode {
                GameMode::Wait => assert!(shows_prompt && !shows_field),
                GameMode::Play => assert!(!shows_prompt && shows_field),
                GameMode::Pause => assert!(shows_prompt && shows_field),
            }
        }
    }

    #[test]
    fn test_score_is_centred() {
        let mut game = Game::with_window(1600, 900);
        game.score.add_point(Side::Left);
        let commands = render(&game, &Settings::default());

        let score = commands.iter().find_map(|c| match c {
            DrawCommand::Text { text, position, size, .. } if text == "1 - 0" => {
                Some((*position, *size))
            }
            _ => None,
        });
        // 5 glyphs of 32px, 36px tall with descent
        assert_eq!(score, Some((IVec2::new(720, 432), 32.0)));
    }

    #[test]
    fn test_start_message_sits_below_centre() {
        let game = Game::with_window(1600, 900);
        let commands = render(&game, &Settings::default());

        let prompt = commands.iter().find_map(|c| match c {
            DrawCommand::Text { text, position, .. } if text == START_MESSAGE => Some(*position),
            _ => None,
        });
        // 14 glyphs of 16px, 18px tall
        assert_eq!(prompt, Some(IVec2::new(800 - 112, 450 - 9 + 20)));
    }

    #[test]
    fn test_debug_line_can_be_hidden() {
        let settings = Settings {
            show_fps: false,
            ..Settings::default()
        };
        let game = Game::with_window(800, 600);
        let commands = render(&game, &settings);
        assert!(!texts(&commands).iter().any(|t| t.starts_with("FPS")));
    }

    #[test]
    fn test_trail_follows_settings() {
        let mut game = Game::with_window(1600, 900);
        let mut input = TickInput::default();
        input.mouse_just_pressed = true;
        tick(&mut game, &input);
        input.clear_edges();
        for _ in 0..5 {
            tick(&mut game, &input);
        }
        assert_eq!(game.mode, GameMode::Play);

        // Ball only
        let off = Settings {
            trails: false,
            ..Settings::default()
        };
        assert_eq!(count_sprites(&render(&game, &off)), 1);

        // Ball plus one sprite per recorded sample
        let on = Settings::from_preset(crate::settings::QualityPreset::High);
        assert_eq!(count_sprites(&render(&game, &on)), 1 + 5);
    }

    #[test]
    fn test_paddles_drawn_from_rects() {
        let mut game = Game::with_window(1600, 900);
        game.mode = GameMode::Play;
        let commands = render(&game, &Settings::default());
        let first = commands.iter().find_map(|c| match c {
            DrawCommand::Rect { min, size, .. } => Some((*min, *size)),
            _ => None,
        });
        assert_eq!(
            first,
            Some((Vec2::new(100.0, 450.0), Vec2::new(26.0, 180.0)))
        );
    }

    #[test]
    fn test_high_contrast_swaps_colours() {
        let settings = Settings {
            high_contrast: true,
            show_fps: false,
            ..Settings::default()
        };
        let game = Game::with_window(800, 600);
        let commands = render(&game, &settings);
        assert_eq!(
            commands[0],
            DrawCommand::Background {
                top: colors::HIGH_CONTRAST_BACKGROUND,
                bottom: colors::HIGH_CONTRAST_BACKGROUND,
            }
        );
        // Yellow text on black
        assert_eq!(colors::HIGH_CONTRAST_TEXT, [1.0, 1.0, 0.0, 1.0]);
        for command in &commands {
            if let DrawCommand::Text { color, .. } = command {
                assert_eq!(*color, colors::HIGH_CONTRAST_TEXT);
            }
        }
    }
}
