use egui::{pos2, vec2, Color32, Pos2};
use ringbuffer::{AllocRingBuffer, RingBuffer};
use thiserror::Error;

use crate::{
    assets::{Asset, AssetError, AssetLibrary},
    canvas::Canvas,
    collision::{self, Contact},
    config::Playfield,
    drawable::Drawable,
    entity::Entity,
    geometry::GeometryError,
};

const BRICK_ROWS: usize = 3;
const BRICK_PADDING: f32 = 8.0;
const BRICK_TOP_OFFSET: f32 = 60.0;
const PADDLE_STEP: f32 = 16.0;

/// One tick's update plus the draw pass, over everything the scene owns.
/// Scenes are replaced wholesale on state transitions, never mutated
/// entity-by-entity from outside.
pub trait Scene: Drawable {
    fn update(&mut self);

    /// Extra markers/text drawn on top of the scene while the debug flag is
    /// set.
    fn draw_debug(&self, _canvas: &Canvas<'_>) {}
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub struct Brick {
    pub body: Entity,
    pub alive: bool,
}

/// The playfield: one ball, one paddle, a wall of bricks.
pub struct MainScene {
    field: Playfield,
    pub ball: Entity,
    pub paddle: Entity,
    pub bricks: Vec<Brick>,
    pub score: u32,
    ball_asset: Asset,
    paddle_asset: Asset,
    brick_asset: Asset,
    recent_contacts: AllocRingBuffer<Contact>,
}

impl MainScene {
    pub fn new(assets: &AssetLibrary, field: Playfield) -> Result<Self, SceneError> {
        let ball_asset = assets.get("ball")?.clone();
        let paddle_asset = assets.get("paddle")?.clone();
        let brick_asset = assets.get("brick")?.clone();

        let ball = Entity::new(
            "ball",
            pos2((field.w - ball_asset.size.x) / 2.0, field.h - 100.0),
            vec2(10.0, -10.0),
            ball_asset.size,
            ball_asset.points.clone(),
        )?;

        let paddle = Entity::new(
            "paddle",
            pos2(
                (field.w - paddle_asset.size.x) / 2.0,
                field.h - 2.0 * paddle_asset.size.y,
            ),
            vec2(0.0, 0.0),
            paddle_asset.size,
            paddle_asset.points.clone(),
        )?;

        let bricks = Self::brick_wall(&brick_asset, field)?;

        Ok(Self {
            field,
            ball,
            paddle,
            bricks,
            score: 0,
            ball_asset,
            paddle_asset,
            brick_asset,
            recent_contacts: AllocRingBuffer::new(64),
        })
    }

    fn brick_wall(asset: &Asset, field: Playfield) -> Result<Vec<Brick>, SceneError> {
        let step_x = asset.size.x + BRICK_PADDING;
        let step_y = asset.size.y + BRICK_PADDING;
        let cols = ((field.w - BRICK_PADDING) / step_x).floor() as usize;

        let mut bricks = Vec::with_capacity(BRICK_ROWS * cols);
        for row in 0..BRICK_ROWS {
            for col in 0..cols {
                let body = Entity::new(
                    "brick",
                    pos2(
                        BRICK_PADDING + col as f32 * step_x,
                        BRICK_TOP_OFFSET + row as f32 * step_y,
                    ),
                    vec2(0.0, 0.0),
                    asset.size,
                    asset.points.clone(),
                )?;
                bricks.push(Brick { body, alive: true });
            }
        }

        Ok(bricks)
    }

    /// Launches the ball. One-way; repeated calls are harmless.
    pub fn fire(&mut self) {
        self.ball.fire();
    }

    pub fn nudge_left(&mut self) {
        self.nudge_paddle(-PADDLE_STEP);
    }

    pub fn nudge_right(&mut self) {
        self.nudge_paddle(PADDLE_STEP);
    }

    fn nudge_paddle(&mut self, dx: f32) {
        let max_x = self.field.w - self.paddle.size.x;
        self.paddle.pos.x = (self.paddle.pos.x + dx).clamp(0.0, max_x);
        self.paddle.refresh_geometry();
    }

    pub fn cleared(&self) -> bool {
        self.bricks.iter().all(|brick| !brick.alive)
    }

    pub fn recent_contacts(&self) -> impl Iterator<Item = &Contact> {
        self.recent_contacts.iter()
    }

    /// At most one collision is resolved per tick: of all candidate
    /// obstacles (paddle + live bricks) the contact nearest the ball's
    /// pre-step position wins, which avoids double-reflection when the ball
    /// clips two obstacles at once.
    fn resolve_collisions(&mut self, before: Pos2) {
        let mut best: Option<(f32, Contact, Option<usize>)> = None;

        if let Some(contact) =
            collision::nearest_contact(&self.ball.segments, &self.paddle.segments, before)
        {
            best = Some(((contact.point - before).length(), contact, None));
        }

        for (i, brick) in self.bricks.iter().enumerate() {
            if !brick.alive {
                continue;
            }
            if let Some(contact) =
                collision::nearest_contact(&self.ball.segments, &brick.body.segments, before)
            {
                let dist = (contact.point - before).length();
                if best.as_ref().map_or(true, |(d, _, _)| dist < *d) {
                    best = Some((dist, contact, Some(i)));
                }
            }
        }

        let Some((_, contact, hit_brick)) = best else {
            return;
        };

        self.ball.vel = collision::reflect(self.ball.vel, contact.normal);

        if let Some(i) = hit_brick {
            self.bricks[i].alive = false;
            self.score += 1;
            log::debug!("brick {i} destroyed, score {}", self.score);
        } else {
            log::debug!("paddle bounce at {:?}", contact.point);
        }

        self.recent_contacts.push(contact);
    }
}

impl Scene for MainScene {
    fn update(&mut self) {
        let before = self.ball.advance(self.field);
        self.resolve_collisions(before);
    }

    fn draw_debug(&self, canvas: &Canvas<'_>) {
        canvas.draw_points(&self.ball.world_points);
        canvas.draw_points(&self.paddle.world_points);

        let contacts: Vec<Pos2> = self.recent_contacts.iter().map(|c| c.point).collect();
        canvas.draw_points(&contacts);
    }
}

impl Drawable for MainScene {
    fn draw(&self, canvas: &Canvas<'_>) {
        for brick in self.bricks.iter().filter(|b| b.alive) {
            canvas.draw_image(&self.brick_asset, brick.body.pos);
        }
        canvas.draw_image(&self.paddle_asset, self.paddle.pos);
        canvas.draw_image(&self.ball_asset, self.ball.pos);

        canvas.draw_text(
            &format!("score: {}", self.score),
            pos2(self.field.w / 2.0, 24.0),
            20.0,
            Color32::RED,
        );
    }
}
