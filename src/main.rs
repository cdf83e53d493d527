//! Ember - a headless demo game for the Ember engine
//!
//! A pong-style simulation exercising the full engine lifecycle without a
//! real window: a frame-limited platform resource stands in for the event
//! loop, update systems move a ball between two tracking paddles, and the
//! final score is reported at shutdown.

use anyhow::{Context, Result};
use glam::Vec2;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use ember_core::{EngineConfig, Time};
use ember_ecs::{App, EcsError, Phase, Platform, World};

/// How many simulated frames to run before quitting.
const FRAME_BUDGET: u32 = 600;
const BALL_SPEED: f32 = 320.0;
const PADDLE_SPEED: f32 = 260.0;
const PADDLE_HEIGHT: f32 = 80.0;
const PADDLE_MARGIN: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(Vec2);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity(Vec2);

/// Marker for the ball entity.
#[derive(Debug, Clone, Copy)]
struct Ball;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Paddle {
    side: Side,
}

/// Court bounds, derived from the configured window size.
#[derive(Debug, Clone, Copy)]
struct Court {
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Score {
    left: u32,
    right: u32,
}

/// Headless stand-in for the platform collaborator: pretends to pump an
/// event queue and asks to quit once the frame budget is spent.
struct Headless {
    frames: u32,
    budget: u32,
}

impl Headless {
    fn new(budget: u32) -> Self {
        Self { frames: 0, budget }
    }
}

impl Platform for Headless {
    fn poll(&mut self) {
        self.frames += 1;
    }

    fn should_quit(&self) -> bool {
        self.frames > self.budget
    }
}

fn spawn_court(world: &mut World) -> Result<(), EcsError> {
    let court = *world.resource::<Court>()?;

    let ball = world.create();
    world.insert(ball, Ball);
    world.insert(
        ball,
        Position(Vec2::new(court.width / 2.0, court.height / 2.0)),
    );
    world.insert(ball, Velocity(Vec2::new(BALL_SPEED, BALL_SPEED * 0.5)));

    for side in [Side::Left, Side::Right] {
        let x = match side {
            Side::Left => PADDLE_MARGIN,
            Side::Right => court.width - PADDLE_MARGIN,
        };
        let paddle = world.create();
        world.insert(paddle, Paddle { side });
        world.insert(paddle, Position(Vec2::new(x, court.height / 2.0)));
    }

    info!(
        width = court.width,
        height = court.height,
        "court ready, serving"
    );
    Ok(())
}

/// Paddles chase the ball's height, limited by paddle speed.
fn track_paddles(world: &mut World) -> Result<(), EcsError> {
    let dt = world.resource::<Time>()?.delta_time;
    let court = *world.resource::<Court>()?;

    let Some(ball_y) = world
        .view::<(&Position, &Ball)>()
        .map(|(_, (pos, _))| pos.0.y)
        .next()
    else {
        return Ok(());
    };

    for (_, (pos, _)) in world.view::<(&mut Position, &Paddle)>() {
        let step = (ball_y - pos.0.y).clamp(-PADDLE_SPEED * dt, PADDLE_SPEED * dt);
        let half = PADDLE_HEIGHT / 2.0;
        pos.0.y = (pos.0.y + step).clamp(half, court.height - half);
    }
    Ok(())
}

fn move_ball(world: &mut World) -> Result<(), EcsError> {
    let dt = world.resource::<Time>()?.delta_time;
    for (_, (pos, vel, _)) in world.view::<(&mut Position, &Velocity, &Ball)>() {
        pos.0 += vel.0 * dt;
    }
    Ok(())
}

/// Bounce off the court edges and the paddles; a ball leaving the court
/// scores for the opposite side and is re-served toward the loser.
fn bounce_and_score(world: &mut World) -> Result<(), EcsError> {
    let court = *world.resource::<Court>()?;
    let paddles: Vec<(Side, f32)> = world
        .view::<(&Position, &Paddle)>()
        .map(|(_, (pos, paddle))| (paddle.side, pos.0.y))
        .collect();

    let mut point_for: Option<Side> = None;
    for (_, (pos, vel, _)) in world.view::<(&mut Position, &mut Velocity, &Ball)>() {
        if pos.0.y <= 0.0 || pos.0.y >= court.height {
            vel.0.y = -vel.0.y;
            pos.0.y = pos.0.y.clamp(0.0, court.height);
        }

        for &(side, paddle_y) in &paddles {
            let outbound = match side {
                Side::Left => vel.0.x < 0.0 && pos.0.x <= PADDLE_MARGIN,
                Side::Right => vel.0.x > 0.0 && pos.0.x >= court.width - PADDLE_MARGIN,
            };
            if outbound && (pos.0.y - paddle_y).abs() <= PADDLE_HEIGHT / 2.0 {
                vel.0.x = -vel.0.x;
            }
        }

        if pos.0.x < 0.0 {
            point_for = Some(Side::Right);
        } else if pos.0.x > court.width {
            point_for = Some(Side::Left);
        }

        if let Some(side) = point_for {
            pos.0 = Vec2::new(court.width / 2.0, court.height / 2.0);
            let serve_x = match side {
                Side::Right => -BALL_SPEED,
                Side::Left => BALL_SPEED,
            };
            vel.0 = Vec2::new(serve_x, BALL_SPEED * 0.5);
        }
    }

    if let Some(side) = point_for {
        let score = world.resource_mut::<Score>()?;
        match side {
            Side::Left => score.left += 1,
            Side::Right => score.right += 1,
        }
        debug!(left = score.left, right = score.right, "point scored");
    }
    Ok(())
}

fn report_score(world: &mut World) -> Result<(), EcsError> {
    let score = world.resource::<Score>()?;
    let time = world.resource::<Time>()?;
    info!(
        left = score.left,
        right = score.right,
        frames = time.frame_count,
        "final score"
    );
    Ok(())
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Ember demo...");

    let config = EngineConfig::load();
    let court = Court {
        width: config.window.width as f32,
        height: config.window.height as f32,
    };
    let frame_delta = config.time.fixed_timestep;

    let mut app = App::new();
    app.insert_resource(Time::new(config.time.clone()))
        .insert_resource(court)
        .insert_resource(Score::default())
        .insert_resource(Headless::new(FRAME_BUDGET))
        .add_system(Phase::Startup, spawn_court)
        .add_system(Phase::Update, move |world: &mut World| {
            world.resource_mut::<Time>()?.update(frame_delta);
            Ok(())
        })
        .add_system(Phase::Update, track_paddles)
        .add_system(Phase::Update, move_ball)
        .add_system(Phase::Update, bounce_and_score)
        .add_system(Phase::Shutdown, report_score);

    app.run::<Headless>().context("Demo run failed")?;
    Ok(())
}
