/// World: the root of the simulation. Owns the tile list and the
/// actor, runs the per-frame step, and carries cross-stage state.
///
/// ## Ownership
///
/// Tiles and actor are owned exclusively here and mutated only inside
/// `step()` or the explicit load/restart entry points, all called from
/// the owning frame loop. No locking, no internal parallelism.
///
/// ## Flags
///
/// `fell_this_frame`, `on_slippery`, and `on_wall` are per-frame
/// outputs for the presentation layer (shake-then-restart sequencing,
/// HUD, traction-aware input). The core never performs the delayed
/// restart itself — it only flags the event.

use glam::Vec2;

use crate::config::GameConfig;
use crate::domain::actor::Actor;
use crate::domain::tile::{Tile, TILE};

use super::event::GameEvent;
use super::{level, step};

/// Cross-stage state record. Transitions are total over this record;
/// tile-set changes accompany them in the level module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageState {
    /// 1-based stage index, clamped to the valid range on load.
    pub stage: usize,
    /// Accumulated points; spent on dashes, awarded for breaks.
    pub point: i32,
    /// Once true, `step()` is a no-op until an explicit (re)load.
    pub cleared: bool,
}

impl StageState {
    pub fn new() -> Self {
        StageState { stage: 1, point: 0, cleared: false }
    }

    /// Stage advance zeroes the point balance.
    pub fn advance(&mut self) {
        self.stage += 1;
        self.point = 0;
    }

    pub fn restart(&mut self, reset_point: bool) {
        if reset_point {
            self.point = 0;
        }
    }

    /// Terminal state: game finished on the last stage.
    pub fn complete(&mut self) {
        self.cleared = true;
        self.point = 0;
    }
}

impl Default for StageState {
    fn default() -> Self {
        StageState::new()
    }
}

pub struct World {
    pub config: GameConfig,

    // ── Owned simulation state ──
    pub tiles: Vec<Tile>,
    pub actor: Actor,
    pub stage: StageState,

    // ── Per-frame output flags ──
    pub fell_this_frame: bool,
    pub on_slippery: bool,
    pub on_wall: bool,
}

impl World {
    /// Build a world and load stage 1.
    pub fn new(config: GameConfig) -> Self {
        let spawn = spawn_pos(&config);
        let max_jumps = config.physics.max_jumps;
        let mut world = World {
            config,
            tiles: vec![],
            actor: Actor::new(spawn.x, spawn.y, max_jumps),
            stage: StageState::new(),
            fell_this_frame: false,
            on_slippery: false,
            on_wall: false,
        };
        level::load_level(&mut world, 1);
        world
    }

    /// Advance the simulation by one frame.
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        step::step(self, dt)
    }

    // ── Input entry points (called before each step) ──

    /// Horizontal intent in [-1, 1]. Ignored while dashing — dash
    /// velocity stays pinned.
    pub fn set_move_axis(&mut self, axis: f32) {
        if self.actor.dashing {
            return;
        }
        self.actor.vel.x = axis.clamp(-1.0, 1.0) * self.config.physics.move_speed;
    }

    /// Edge-triggered jump request. Returns whether a jump fired.
    pub fn try_jump(&mut self) -> bool {
        self.actor.try_jump(self.config.physics.jump_velocity)
    }

    /// Edge-triggered dash request. Affordability is checked here,
    /// not in the Actor; an unaffordable or redundant request is
    /// silently refused (no state change, no error).
    pub fn try_dash(&mut self, direction: i32) -> bool {
        if self.actor.dashing {
            return false;
        }
        if self.stage.point < self.config.dash.dash_cost {
            log::debug!(
                "dash refused: point {} < cost {}",
                self.stage.point,
                self.config.dash.dash_cost
            );
            return false;
        }
        self.stage.point -= self.config.dash.dash_cost;
        self.actor.start_dash(
            direction,
            self.config.dash.dash_distance(),
            self.config.dash.dash_speed,
        );
        true
    }

    // ── Stage management ──

    pub fn load_level(&mut self, n: usize) {
        level::load_level(self, n);
    }

    pub fn next_level(&mut self) {
        level::next_level(self);
    }

    /// Reload the current stage. Hazard-triggered restarts pass
    /// `reset_point = true`; manual restarts may choose either.
    pub fn restart_level(&mut self, reset_point: bool) {
        level::restart_level(self, reset_point);
    }

    // ── Read access for the presentation layer ──

    pub fn point(&self) -> i32 {
        self.stage.point
    }

    pub fn stage_index(&self) -> usize {
        self.stage.stage
    }

    pub fn cleared(&self) -> bool {
        self.stage.cleared
    }
}

/// Spawn position in world units (the layout text carries no spawn
/// glyph; spawn is a fixed, configurable position).
pub fn spawn_pos(config: &GameConfig) -> Vec2 {
    Vec2::new(
        config.rules.spawn_x_tiles * TILE,
        config.rules.spawn_y_tiles * TILE,
    )
}
