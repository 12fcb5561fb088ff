/// Tile types and their properties.
/// Properties are queried via exhaustive matches on the kind tag,
/// not stored as flags, so tile semantics are centralized here.
/// Oscillation state lives only in the variant that needs it.

use super::rect::Rect;

/// World-space size of one grid cell, in pixels.
pub const TILE: f32 = 32.0;

/// Per-instance state of a horizontally oscillating tile.
///
/// Closed-form oscillation, not a spring: velocity magnitude is
/// constant, only its sign flips when a bound is reached.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Oscillator {
    /// Current world X of the tile's left edge.
    pub px: f32,
    /// Horizontal velocity (sign flips at the bounds).
    pub vx: f32,
    /// Leftmost allowed px.
    pub min_x: f32,
    /// Rightmost allowed right edge (tested against px + TILE).
    pub max_x: f32,
}

impl Oscillator {
    /// Centered on the spawn column: bounds = spawn X ± range/2.
    pub fn new(spawn_px: f32, speed: f32, range_px: f32) -> Self {
        Oscillator {
            px: spawn_px,
            vx: speed,
            min_x: spawn_px - range_px * 0.5,
            max_x: spawn_px + range_px * 0.5,
        }
    }

    /// Integrate position, reflecting (sign flip + clamp) at either bound.
    pub fn advance(&mut self, dt: f32) {
        self.px += self.vx * dt;
        if self.px < self.min_x {
            self.px = self.min_x;
            self.vx = self.vx.abs();
        }
        if self.px + TILE > self.max_x {
            self.px = self.max_x - TILE;
            self.vx = -self.vx.abs();
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TileKind {
    Solid,
    Breakable,
    Goal,
    Slippery,
    Hazard,
    HazardMoving(Oscillator),
    /// Solid oscillating platform; carries the actor standing on it.
    Platform(Oscillator),
}

/// A grid-addressed cell. Grid coordinates are immutable after
/// creation; the world-space bounding box is derived.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tile {
    pub gx: i32,
    pub gy: i32,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(gx: i32, gy: i32, kind: TileKind) -> Self {
        Tile { gx, gy, kind }
    }

    /// An oscillating hazard spawned at its grid cell, ranging
    /// `range_px` centered on that cell.
    pub fn hazard_moving(gx: i32, gy: i32, speed: f32, range_px: f32) -> Self {
        let osc = Oscillator::new(gx as f32 * TILE, speed, range_px);
        Tile { gx, gy, kind: TileKind::HazardMoving(osc) }
    }

    /// A solid oscillating platform, same travel rule as moving hazards.
    pub fn platform(gx: i32, gy: i32, speed: f32, range_px: f32) -> Self {
        let osc = Oscillator::new(gx as f32 * TILE, speed, range_px);
        Tile { gx, gy, kind: TileKind::Platform(osc) }
    }

    /// Current world-space bounding box. Oscillating tiles report
    /// their live horizontal position; the row Y is fixed.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            TileKind::Solid
            | TileKind::Breakable
            | TileKind::Goal
            | TileKind::Slippery
            | TileKind::Hazard => {
                Rect::new(self.gx as f32 * TILE, self.gy as f32 * TILE, TILE, TILE)
            }
            TileKind::HazardMoving(osc) | TileKind::Platform(osc) => {
                Rect::new(osc.px, self.gy as f32 * TILE, TILE, TILE)
            }
        }
    }

    /// Advance per-frame state. No-op for static kinds.
    pub fn advance(&mut self, dt: f32) {
        match &mut self.kind {
            TileKind::Solid
            | TileKind::Breakable
            | TileKind::Goal
            | TileKind::Slippery
            | TileKind::Hazard => {}
            TileKind::HazardMoving(osc) | TileKind::Platform(osc) => osc.advance(dt),
        }
    }

    /// Does this tile fire a handler on overlap instead of blocking?
    pub fn is_trigger(&self) -> bool {
        matches!(
            self.kind,
            TileKind::Goal | TileKind::Hazard | TileKind::HazardMoving(_)
        )
    }

    /// Does this tile block movement during collision resolution?
    /// Triggers are excluded entirely — they are evaluated by overlap
    /// test, never by collision response.
    pub fn is_solid(&self) -> bool {
        matches!(
            self.kind,
            TileKind::Solid | TileKind::Breakable | TileKind::Slippery | TileKind::Platform(_)
        )
    }

    /// Is this a one-shot breakable?
    pub fn is_breakable(&self) -> bool {
        matches!(self.kind, TileKind::Breakable)
    }

    /// Is landing on this tile slippery footing?
    pub fn is_slippery(&self) -> bool {
        matches!(self.kind, TileKind::Slippery)
    }

    /// Horizontal velocity imparted to an actor standing on this tile
    /// (conveyor carry). Zero for everything stationary.
    pub fn surface_velocity_x(&self) -> f32 {
        match self.kind {
            TileKind::HazardMoving(osc) | TileKind::Platform(osc) => osc.vx,
            _ => 0.0,
        }
    }
}
