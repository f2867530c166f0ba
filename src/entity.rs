use egui::{Pos2, Vec2};

use crate::config::Playfield;
use crate::geometry::{self, GeometryError, Segment};

/// A moving or static game object: ball, paddle and bricks all share this
/// shape. The hit outline is authored in shape-local coordinates and fixed
/// for the entity's lifetime; world points and segments are derived from it
/// every tick.
#[derive(Clone, Debug)]
pub struct Entity {
    pub sprite: String,
    pub pos: Pos2,
    pub vel: Vec2,
    pub size: Vec2,
    /// `false` until fired: position fixed, no motion. The transition to
    /// moving is one-way.
    pub fired: bool,
    local_points: Vec<Pos2>,
    pub world_points: Vec<Pos2>,
    pub segments: Vec<Segment>,
}

impl Entity {
    /// The outline is validated here so a malformed point set fails at
    /// construction instead of mid-game.
    pub fn new(
        sprite: impl Into<String>,
        pos: Pos2,
        vel: Vec2,
        size: Vec2,
        local_points: Vec<Pos2>,
    ) -> Result<Self, GeometryError> {
        geometry::segments_from_points(&local_points)?;

        let mut entity = Self {
            sprite: sprite.into(),
            pos,
            vel,
            size,
            fired: false,
            local_points,
            world_points: Vec::new(),
            segments: Vec::new(),
        };
        entity.refresh_geometry();

        Ok(entity)
    }

    pub fn local_points(&self) -> &[Pos2] {
        &self.local_points
    }

    pub fn fire(&mut self) {
        self.fired = true;
    }

    /// Recomputes world points and segments from the current position. Must
    /// follow any position mutation before the next collision check or draw.
    pub fn refresh_geometry(&mut self) {
        self.world_points = geometry::offset_points(&self.local_points, self.pos.to_vec2());
        self.segments = geometry::segments_from_points(&self.world_points)
            .expect("outline validated at construction");
    }

    /// Advances one tick and returns the pre-step position (used by the
    /// collision resolver as the tie-break reference).
    ///
    /// When fired: each axis whose pending step would carry the leading edge
    /// outside `[0, bound]` has its velocity sign flipped first, then the
    /// step is applied with the flipped velocity (reflect-then-step; the
    /// speed magnitude is conserved). Idle entities never move, but the
    /// world geometry is refreshed regardless so it always matches `pos`.
    pub fn advance(&mut self, field: Playfield) -> Pos2 {
        let before = self.pos;

        if self.fired {
            let next = self.pos + self.vel;
            if next.x < 0.0 || next.x + self.size.x > field.w {
                self.vel.x = -self.vel.x;
            }
            if next.y < 0.0 || next.y + self.size.y > field.h {
                self.vel.y = -self.vel.y;
            }
            self.pos += self.vel;
        }

        self.refresh_geometry();
        before
    }
}
