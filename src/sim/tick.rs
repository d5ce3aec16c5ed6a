//! Per-frame simulation tick
//!
//! Core game loop: reads one input snapshot and advances the game by exactly
//! one step. Integration is a single Euler step with no sub-stepping, so a ball
//! faster than a paddle is wide can pass straight through it.

use glam::DVec2;

use super::collision::handle_ball_paddle_collision;
use super::state::{Game, GameEvent, GameMode, Side};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    Up,
    Down,
    Space,
    Enter,
    Escape,
}

impl Key {
    /// Keys that start (or resume) a game when just pressed
    pub const START_KEYS: [Key; 6] = [Key::Space, Key::W, Key::S, Key::Up, Key::Down, Key::Enter];

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" => Some(Key::W),
            "s" | "S" => Some(Key::S),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            " " => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Input device state for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys currently held down
    pub held: Vec<Key>,
    /// Keys that went down since the previous tick
    pub just_pressed: Vec<Key>,
    /// Left mouse button went down since the previous tick
    pub mouse_just_pressed: bool,
    /// Active touch points (window coordinates)
    pub touches: Vec<DVec2>,
    /// A new touch began since the previous tick
    pub touch_just_started: bool,
}

impl TickInput {
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Any input that starts or resumes play
    pub fn start_pressed(&self) -> bool {
        Key::START_KEYS.iter().any(|&key| self.is_just_pressed(key))
            || self.mouse_just_pressed
            || self.touch_just_started
    }

    /// Forget edge-triggered input once it has been consumed by a tick
    pub fn clear_edges(&mut self) {
        self.just_pressed.clear();
        self.mouse_just_pressed = false;
        self.touch_just_started = false;
    }
}

/// Vertical paddle movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Whether `side`'s paddle should move in `direction` this tick.
///
/// Keyboard first, then touch: a touch on the paddle's half of the window
/// pulls the paddle toward the touch's height.
fn paddle_intent(game: &Game, input: &TickInput, side: Side, direction: Direction) -> bool {
    let paddle = game.paddle(side);
    let in_bounds = match direction {
        Direction::Up => paddle.y >= 0,
        Direction::Down => paddle.y + paddle.h <= game.window_height,
    };
    if !in_bounds {
        return false;
    }

    let key = match (side, direction) {
        (Side::Left, Direction::Up) => Key::W,
        (Side::Left, Direction::Down) => Key::S,
        (Side::Right, Direction::Up) => Key::Up,
        (Side::Right, Direction::Down) => Key::Down,
    };
    if input.is_held(key) {
        return true;
    }

    let mid_x = f64::from(game.window_width / 2);
    let paddle_mid_y = f64::from(paddle.y + paddle.h / 2);
    input.touches.iter().any(|touch| {
        let on_side = match side {
            Side::Left => touch.x < mid_x,
            Side::Right => touch.x > mid_x,
        };
        on_side
            && match direction {
                Direction::Up => touch.y < paddle_mid_y,
                Direction::Down => touch.y > paddle_mid_y,
            }
    })
}

/// Up is applied before Down is checked, so Down sees the moved paddle. A touch
/// near the paddle's middle therefore nets zero movement instead of jittering.
fn move_paddles(game: &mut Game, input: &TickInput) {
    let speed = game.paddle_speed;
    for side in [Side::Left, Side::Right] {
        if paddle_intent(game, input, side, Direction::Up) {
            game.paddle_mut(side).y -= speed;
        }
        if paddle_intent(game, input, side, Direction::Down) {
            game.paddle_mut(side).y += speed;
        }
    }
}

/// Score a point if the ball has left the field while moving outward
fn check_scoring(game: &mut Game, events: &mut Vec<GameEvent>) {
    let ball = &game.ball;
    let exited = if ball.coord.x as i32 + ball.radius > game.window_width && ball.velocity.x > 0.0
    {
        Some(Side::Right)
    } else if ball.coord.x < 0.0 && ball.velocity.x < 0.0 {
        Some(Side::Left)
    } else {
        None
    };

    if let Some(side) = exited {
        game.score.add_point(side);
        game.mode = GameMode::Wait;
        log::info!("Point ({:?} wall), score {}", side, game.score);
        events.push(GameEvent::Scored(side));
    }
}

/// Reflect off the top and bottom walls when moving into them
fn reflect_off_walls(game: &mut Game, events: &mut Vec<GameEvent>) {
    let ball = &mut game.ball;
    let into_top = ball.coord.y < 0.0 && ball.velocity.y < 0.0;
    let into_bottom =
        ball.coord.y as i32 + ball.radius > game.window_height && ball.velocity.y > 0.0;
    if into_top || into_bottom {
        ball.velocity.y = -ball.velocity.y;
        ball.trail.update_angle(ball.velocity);
        events.push(GameEvent::WallHit);
    }
}

/// Advance the game by one tick, returning what happened
pub fn tick(game: &mut Game, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match game.mode {
        GameMode::Pause => {
            if input.start_pressed() {
                game.mode = GameMode::Play;
                log::debug!("Resumed");
                events.push(GameEvent::Resumed);
            }
        }
        GameMode::Wait => {
            if input.start_pressed() {
                game.start();
                log::debug!("Started {}x{}", game.window_width, game.window_height);
                events.push(GameEvent::Started);
            }
        }
        GameMode::Play => {
            if input.is_held(Key::Escape) {
                game.mode = GameMode::Pause;
                log::debug!("Paused");
                events.push(GameEvent::Paused);
                return events;
            }
            step(game, input, &mut events);
        }
    }

    events
}

/// One step of active play
fn step(game: &mut Game, input: &TickInput, events: &mut Vec<GameEvent>) {
    move_paddles(game, input);
    check_scoring(game, events);
    handle_ball_paddle_collision(game, events);
    reflect_off_walls(game, events);

    let velocity = game.ball.velocity;
    game.ball.coord += velocity;
    game.ball.record_trail();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn press(key: Key) -> TickInput {
        TickInput {
            just_pressed: vec![key],
            ..Default::default()
        }
    }

    fn hold(keys: &[Key]) -> TickInput {
        TickInput {
            held: keys.to_vec(),
            ..Default::default()
        }
    }

    fn started(width: i32, height: i32) -> Game {
        let mut game = Game::with_window(width, height);
        let events = tick(&mut game, &press(Key::Space));
        assert_eq!(events, vec![GameEvent::Started]);
        game
    }

    #[test]
    fn test_wait_to_play_on_start_inputs() {
        for input in [
            press(Key::Enter),
            press(Key::Down),
            TickInput {
                mouse_just_pressed: true,
                ..Default::default()
            },
            TickInput {
                touch_just_started: true,
                ..Default::default()
            },
        ] {
            let mut game = Game::with_window(800, 600);
            tick(&mut game, &input);
            assert_eq!(game.mode, GameMode::Play);
        }

        // Escape is not a start key, and holding is not pressing
        let mut game = Game::with_window(800, 600);
        tick(&mut game, &press(Key::Escape));
        tick(&mut game, &hold(&[Key::Space]));
        assert_eq!(game.mode, GameMode::Wait);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut game = started(800, 600);
        let before = game.ball.coord;

        let events = tick(&mut game, &hold(&[Key::Escape]));
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(game.mode, GameMode::Pause);
        assert_eq!(game.ball.coord, before, "pausing tick does not move the ball");

        // Frozen while paused
        tick(&mut game, &TickInput::default());
        assert_eq!(game.ball.coord, before);

        tick(&mut game, &press(Key::Enter));
        assert_eq!(game.mode, GameMode::Play);
        // Resume keeps the rally going rather than resetting it
        assert_eq!(game.ball.coord, before);
    }

    #[test]
    fn test_ball_integrates_velocity() {
        let mut game = started(1600, 900);
        let start = game.ball.coord;
        tick(&mut game, &TickInput::default());
        assert_eq!(game.ball.coord, start + DVec2::new(16.0, 16.0));
        assert!(game.ball.trail.elements()[0].radius > 0.0);
    }

    #[test]
    fn test_left_exit_scores_left() {
        let mut game = started(1600, 900);
        game.ball.coord = DVec2::new(-1.0, 450.0);
        game.ball.velocity = DVec2::new(-16.0, 0.0);

        let events = tick(&mut game, &TickInput::default());
        assert!(events.contains(&GameEvent::Scored(Side::Left)));
        assert_eq!(game.score.left, 1);
        assert_eq!(game.score.right, 0);
        assert_eq!(game.mode, GameMode::Wait);
    }

    #[test]
    fn test_right_exit_scores_right() {
        let mut game = started(1600, 900);
        game.ball.coord = DVec2::new(1590.0, 100.0);
        game.ball.velocity = DVec2::new(16.0, 0.0);

        tick(&mut game, &TickInput::default());
        assert_eq!(game.score.right, 1);
        assert_eq!(game.score.left, 0);
        assert_eq!(game.mode, GameMode::Wait);

        // Ball stays where it was until the next start resets it
        let parked = game.ball.coord;
        tick(&mut game, &TickInput::default());
        assert_eq!(game.ball.coord, parked);
        tick(&mut game, &press(Key::Space));
        assert_eq!(game.ball.coord, DVec2::new(800.0, 450.0));
        assert_eq!(game.score.right, 1, "score survives a new serve");
    }

    #[test]
    fn test_outside_but_moving_inward_does_not_score() {
        let mut game = started(1600, 900);
        game.ball.coord = DVec2::new(-5.0, 450.0);
        game.ball.velocity = DVec2::new(16.0, 0.0);
        tick(&mut game, &TickInput::default());
        assert_eq!(game.score, Default::default());
        assert_eq!(game.mode, GameMode::Play);
    }

    #[test]
    fn test_right_paddle_return_does_not_score() {
        let mut game = started(1600, 900);
        let paddle = game.right_paddle;
        game.ball.coord = DVec2::new(
            f64::from(paddle.x + paddle.w - game.ball.radius - 5),
            paddle.center_y() - 30.0,
        );
        game.ball.velocity = DVec2::new(16.0, 16.0);

        let events = tick(&mut game, &TickInput::default());
        assert!(events.contains(&GameEvent::PaddleHit(Side::Right)));
        assert!(game.ball.velocity.x < 0.0);
        assert_eq!(game.score, Default::default());
        assert_eq!(game.mode, GameMode::Play);
    }

    #[test]
    fn test_wall_reflection() {
        let mut game = started(1600, 900);
        game.ball.coord = DVec2::new(800.0, -2.0);
        game.ball.velocity = DVec2::new(16.0, -10.0);
        let angle_before = game.ball.trail.current_angle();

        let events = tick(&mut game, &TickInput::default());
        assert!(events.contains(&GameEvent::WallHit));
        assert_eq!(game.ball.velocity.y, 10.0);
        assert_eq!(game.ball.coord.y, 8.0);
        assert_ne!(game.ball.trail.current_angle(), angle_before);

        game.ball.coord = DVec2::new(800.0, 880.0);
        game.ball.velocity = DVec2::new(16.0, 10.0);
        tick(&mut game, &TickInput::default());
        assert_eq!(game.ball.velocity.y, -10.0);
    }

    #[test]
    fn test_keyboard_paddle_movement() {
        let mut game = started(1600, 900);
        let left_y = game.left_paddle.y;
        let right_y = game.right_paddle.y;

        tick(&mut game, &hold(&[Key::W, Key::Down]));
        assert_eq!(game.left_paddle.y, left_y - game.paddle_speed);
        assert_eq!(game.right_paddle.y, right_y + game.paddle_speed);
    }

    #[test]
    fn test_paddle_stops_at_window_edge() {
        let mut game = started(1600, 900);
        game.left_paddle.y = -1;
        tick(&mut game, &hold(&[Key::W]));
        assert_eq!(game.left_paddle.y, -1);

        game.right_paddle.y = 900 - game.right_paddle.h + 1;
        let y = game.right_paddle.y;
        tick(&mut game, &hold(&[Key::Down]));
        assert_eq!(game.right_paddle.y, y);
    }

    #[test]
    fn test_touch_moves_paddle_on_its_half() {
        let mut game = started(1600, 900);
        let left_y = game.left_paddle.y;
        let right_y = game.right_paddle.y;

        // Touch in the left half, above the left paddle's middle
        let input = TickInput {
            touches: vec![DVec2::new(200.0, 100.0)],
            ..Default::default()
        };
        tick(&mut game, &input);
        assert_eq!(game.left_paddle.y, left_y - game.paddle_speed);
        assert_eq!(game.right_paddle.y, right_y);

        // Touch in the right half, below the right paddle's middle
        let input = TickInput {
            touches: vec![DVec2::new(1400.0, 880.0)],
            ..Default::default()
        };
        tick(&mut game, &input);
        assert_eq!(game.right_paddle.y, right_y + game.paddle_speed);
    }

    #[test]
    fn test_touch_near_paddle_middle_holds_still() {
        let mut game = started(1600, 900);
        let paddle = game.left_paddle;
        let mid = paddle.y + paddle.h / 2;

        // Just above the middle: up one step, then the moved middle is above the touch
        let input = TickInput {
            touches: vec![DVec2::new(200.0, f64::from(mid - 1))],
            ..Default::default()
        };
        for _ in 0..3 {
            tick(&mut game, &input);
            assert_eq!(game.left_paddle.y, paddle.y);
        }
    }

    #[test]
    fn test_both_keys_check_down_after_moving_up() {
        let mut game = started(1600, 900);
        // One pixel past the floor: Down alone would be refused
        game.right_paddle.y = 900 - game.right_paddle.h + 1;
        let y = game.right_paddle.y;

        tick(&mut game, &hold(&[Key::Up, Key::Down]));
        assert_eq!(game.right_paddle.y, y);

        tick(&mut game, &hold(&[Key::Down]));
        assert_eq!(game.right_paddle.y, y);
    }

    #[test]
    fn test_resize_mid_play_recomputes_geometry() {
        let mut game = started(1600, 900);
        tick(&mut game, &TickInput::default());

        game.layout(800, 450);
        assert_eq!(game.mode, GameMode::Wait);

        tick(&mut game, &press(Key::Space));
        assert_eq!(game.mode, GameMode::Play);
        assert_eq!(game.ball.radius, 13);
        assert_eq!(game.ball.coord, DVec2::new(400.0, 225.0));
        assert_eq!(game.left_paddle.h, 90);
        assert_eq!(game.right_paddle.x, 750);
        assert_eq!(game.paddle_speed, 7);
    }

    #[test]
    fn test_every_mode_is_ticked() {
        for mode in GameMode::ALL {
            let mut game = Game::with_window(640, 480);
            game.mode = mode;
            let events = tick(&mut game, &TickInput::default());
            // Only Play moves anything without input
            match mode {
                GameMode::Play => {
                    let expected = DVec2::new(320.0, 240.0) + game.ball.velocity;
                    assert!((game.ball.coord - expected).length() < 1e-9);
                }
                GameMode::Wait | GameMode::Pause => {
                    assert!(events.is_empty());
                    assert_eq!(game.ball.coord, DVec2::new(320.0, 240.0));
                }
            }
        }
    }

    #[test]
    fn test_scoring_is_exclusive() {
        let mut game = started(1600, 900);
        game.ball.coord = DVec2::new(-3.0, 450.0);
        game.ball.velocity = DVec2::new(-16.0, 4.0);
        let events = tick(&mut game, &TickInput::default());

        let scored = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Scored(_)))
            .count();
        assert_eq!(scored, 1);
        assert_eq!(game.score.left + game.score.right, 1);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_between_walls(
            vy in -20.0f64..20.0,
            start_y in 50.0f64..850.0,
            ticks in 1usize..300,
        ) {
            let mut game = started(1600, 900);
            game.ball.coord = DVec2::new(800.0, start_y);
            // Slow horizontal speed keeps the ball in the middle of the field
            game.ball.velocity = DVec2::new(0.0, vy);
            game.ball.velocity_bounds.x = 0.0;

            for _ in 0..ticks {
                tick(&mut game, &TickInput::default());
                prop_assert_eq!(game.mode, GameMode::Play);
                // At most one step of overshoot before the reflection applies
                let y = game.ball.coord.y;
                prop_assert!((-20.0..=920.0).contains(&y));
            }
        }
    }
}
