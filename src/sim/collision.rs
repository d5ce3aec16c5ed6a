//! Ball-paddle collision and bounce response
//!
//! The bounce is non-linear: the outgoing speed scales with the
//! magnitude of the deflection angle, so centre hits come back slow and edge
//! hits come back fast and steep.

use glam::DVec2;

use super::shapes::{Circle, Rect, resolve};
use super::state::{Game, GameEvent, Side};
use crate::consts::MAX_BOUNCE_ANGLE;

/// Deflection angle for a ball striking `paddle`, in `[-PI/4, PI/4]` while the
/// ball centre is within the paddle's vertical extent. Positive above centre.
pub fn bounce_angle(paddle: &Rect, ball: &Circle) -> f64 {
    let half_height = paddle.half_height();
    debug_assert!(half_height > 0.0, "paddle has no height");
    if half_height <= 0.0 {
        return 0.0;
    }

    let relative_intersect =
        paddle.center_y() - (f64::from(ball.y) + f64::from(ball.radius) / 2.0);
    let normalized = relative_intersect / half_height;
    normalized * MAX_BOUNCE_ANGLE
}

/// Outgoing velocity after a paddle hit, pointing right (`x >= 0`).
/// The caller flips `x` for the right paddle.
pub fn bounce_velocity(paddle: &Rect, ball: &Circle, max_speed: f64) -> DVec2 {
    let angle = bounce_angle(paddle, ball);
    DVec2::new(
        angle.cos().abs() * max_speed * angle.abs(),
        -angle.sin() * max_speed * angle.abs(),
    )
}

/// Whether the ball's next step overlaps the paddle's collision footprint.
/// The footprint is the paddle shifted toward its own wall by one paddle width.
fn hits_paddle(game: &Game, side: Side) -> bool {
    let paddle = game.paddle(side);
    let footprint = match side {
        Side::Left => paddle.shifted_x(-paddle.w),
        Side::Right => paddle.shifted_x(paddle.w),
    };
    let velocity = game.ball.velocity;
    resolve(
        &game.ball.bounding_circle(),
        &footprint,
        velocity.x as i32,
        velocity.y as i32,
    )
    .is_colliding()
}

/// Bounce the ball off whichever paddle it is about to hit, then enforce the
/// minimum horizontal speed so the ball never stalls.
pub fn handle_ball_paddle_collision(game: &mut Game, events: &mut Vec<GameEvent>) {
    if hits_paddle(game, Side::Left) && game.ball.velocity.x < 0.0 {
        let velocity = bounce_velocity(
            &game.left_paddle,
            &game.ball.bounding_circle(),
            game.ball.velocity_bounds.y,
        );
        game.ball.velocity = velocity;
        game.ball.trail.update_angle(velocity);
        events.push(GameEvent::PaddleHit(Side::Left));
    }

    if hits_paddle(game, Side::Right) && game.ball.velocity.x > 0.0 {
        let velocity = bounce_velocity(
            &game.right_paddle,
            &game.ball.bounding_circle(),
            game.ball.velocity_bounds.y,
        );
        game.ball.velocity = DVec2::new(-velocity.x, velocity.y);
        game.ball.trail.update_angle(game.ball.velocity);
        events.push(GameEvent::PaddleHit(Side::Right));
    }

    // Sign bit, not comparison: a dead-centre right hit leaves -0.0, which must
    // still head left.
    let min_speed = game.ball.velocity_bounds.x;
    if game.ball.velocity.x.abs() < min_speed {
        game.ball.velocity.x = min_speed.copysign(game.ball.velocity.x);
    }
}
