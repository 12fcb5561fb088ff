/// The step function: advances the world by one frame.
///
/// Processing order (fixed, single-threaded):
///   1. Cleared check (simulation frozen)
///   2. Oscillating tile advance
///   3. Gravity
///   4. X-axis resolution (dash breaking, wall snap, dash budget)
///   5. Y-axis resolution (head-bump breaking, landing, carry)
///   6. Commit position + authoritative grounded probe
///   7. Trigger evaluation (hazard, goal)
///   8. Fall-out-of-bounds check
///
/// Resolution is axis-separated: X is fully resolved before Y is
/// computed from the X-resolved position ("wall-slide before
/// floor-snap"). Do not swap the passes.
///
/// Multiple solids overlapping one predicted rectangle are resolved
/// in tile-list order with repeated mutation of the working rect;
/// the last applied tile wins. Level layouts never produce that
/// case, and it is deliberately left order-dependent.

use crate::domain::actor::{ACTOR_H, ACTOR_W};
use crate::domain::rect::Rect;
use crate::domain::tile::TileKind;

use super::event::GameEvent;
use super::level;
use super::world::World;

pub fn step(world: &mut World, dt: f32) -> Vec<GameEvent> {
    if world.stage.cleared {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();

    world.fell_this_frame = false;
    world.on_slippery = false;
    world.on_wall = false;

    // ── 1. Advance oscillating tiles ──
    for tile in world.tiles.iter_mut() {
        tile.advance(dt);
    }

    // ── 2. Gravity ──
    let gravity = world.config.physics.gravity;
    let terminal = world.config.physics.terminal_velocity;
    world.actor.apply_gravity(gravity, terminal, dt);

    // ── 3. X-axis resolution ──
    let old_x = world.actor.pos.x;
    let new_x = resolve_x(world, old_x, dt, &mut events);

    if world.actor.dashing {
        let travelled = (new_x - old_x).abs();
        if world
            .actor
            .consume_dash(travelled, world.config.dash.dash_speed)
        {
            events.push(GameEvent::DashEnded);
        }
    }

    // ── 4. Y-axis resolution (from the X-resolved position) ──
    let (new_x, new_y) = resolve_y(world, new_x, dt, &mut events);

    // ── 5. Commit ──
    world.actor.pos.x = new_x;
    world.actor.pos.y = new_y;

    // ── 6. Authoritative grounded: non-trigger tile within the probe
    // depth directly beneath. Independent of the per-pass snap flags;
    // grounded refills the jump counter.
    let probe_depth = world.config.physics.ground_probe;
    let probe = Rect::new(new_x, new_y - probe_depth, ACTOR_W, probe_depth);
    let grounded = world
        .tiles
        .iter()
        .any(|t| !t.is_trigger() && probe.overlaps(&t.bounds()));
    if grounded {
        world.actor.land(world.config.physics.max_jumps);
    } else {
        world.actor.grounded = false;
    }

    // ── 7. Triggers ──
    let rect = world.actor.bounds();
    let mut goal_hit = false;
    for (i, tile) in world.tiles.iter().enumerate() {
        if !tile.is_trigger() || !rect.overlaps(&tile.bounds()) {
            continue;
        }
        match tile.kind {
            TileKind::Hazard | TileKind::HazardMoving(_) => {
                // Hazard semantics piggyback on the fall-restart path.
                world.fell_this_frame = true;
                events.push(GameEvent::HazardTouched { index: i });
            }
            TileKind::Goal => goal_hit = true,
            _ => {}
        }
    }
    if goal_hit {
        if world.stage.stage >= level::stage_count() {
            level::complete_game(world);
            events.push(GameEvent::GameCompleted);
        } else {
            level::next_level(world);
            events.push(GameEvent::StageAdvanced { stage: world.stage.stage });
        }
        // Tile set was rebuilt; nothing below applies to the new stage.
        return events;
    }

    // ── 8. Fell out of bounds ──
    if world.actor.pos.y < world.config.rules.fall_limit {
        world.fell_this_frame = true;
        events.push(GameEvent::FellOut);
    }

    events
}

/// Resolve horizontal displacement against every non-trigger tile.
/// Dashing through a Breakable destroys it (the dash is not
/// interrupted); anything else snaps the actor to the tile's near
/// edge and zeroes vx.
fn resolve_x(world: &mut World, old_x: f32, dt: f32, events: &mut Vec<GameEvent>) -> f32 {
    let mut dx = world.actor.vel.x * dt;
    if world.actor.dashing {
        // Never travel past the dash budget; the sum of per-frame
        // displacements then equals the dash distance exactly.
        dx = dx.clamp(-world.actor.dash_remaining, world.actor.dash_remaining);
    }
    let mut new_x = old_x + dx;

    if world.actor.vel.x == 0.0 {
        return new_x;
    }

    let mut rect = Rect::new(new_x, world.actor.pos.y, ACTOR_W, ACTOR_H);
    let mut broken: Vec<usize> = vec![];

    for (i, tile) in world.tiles.iter().enumerate() {
        if tile.is_trigger() {
            continue;
        }
        let b = tile.bounds();
        if !rect.overlaps(&b) {
            continue;
        }
        if world.actor.dashing && tile.is_breakable() {
            broken.push(i);
            continue;
        }
        if world.actor.vel.x > 0.0 {
            new_x = b.x - ACTOR_W;
        } else {
            new_x = b.right();
        }
        world.actor.vel.x = 0.0;
        world.on_wall = true;
        rect.x = new_x;
    }

    destroy_tiles(world, &broken, events);
    new_x
}

/// Resolve vertical displacement from the X-resolved position.
/// Returns (x, y): landing on a moving tile nudges X by the carry
/// fraction of the tile's velocity.
fn resolve_y(
    world: &mut World,
    resolved_x: f32,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> (f32, f32) {
    let old_y = world.actor.pos.y;
    let mut new_x = resolved_x;
    let mut new_y = old_y + world.actor.vel.y * dt;
    let mut rect = Rect::new(new_x, new_y, ACTOR_W, ACTOR_H);
    let mut broken: Vec<usize> = vec![];
    let carry_ratio = world.config.physics.carry_ratio;
    let vy = world.actor.vel.y;

    if vy > 0.0 {
        // Rising: head-bump. A Breakable whose bottom is crossed from
        // below this frame is destroyed; landing on one from above
        // never is.
        for (i, tile) in world.tiles.iter().enumerate() {
            if tile.is_trigger() {
                continue;
            }
            let b = tile.bounds();
            if !rect.overlaps(&b) {
                continue;
            }
            let crossed_from_below = old_y + ACTOR_H <= b.y && new_y + ACTOR_H >= b.y;
            if crossed_from_below && tile.is_breakable() {
                broken.push(i);
            }
            new_y = b.y - ACTOR_H;
            world.actor.vel.y = 0.0;
            rect.y = new_y;
        }
    } else if vy < 0.0 {
        // Falling: land on the tile top.
        for tile in world.tiles.iter() {
            if tile.is_trigger() {
                continue;
            }
            let b = tile.bounds();
            if !rect.overlaps(&b) {
                continue;
            }
            new_y = b.top();
            world.actor.vel.y = 0.0;
            if tile.is_slippery() {
                world.on_slippery = true;
            }
            let surface_vx = tile.surface_velocity_x();
            if surface_vx != 0.0 {
                // Conveyor carry from a moving tile underfoot.
                new_x += surface_vx * carry_ratio * dt;
                rect.x = new_x;
            }
            rect.y = new_y;
        }
    } else {
        // Not moving vertically but still overlapping: boundary
        // straddling safety net — snap to the tile top.
        for tile in world.tiles.iter() {
            if tile.is_trigger() {
                continue;
            }
            let b = tile.bounds();
            if rect.overlaps(&b) {
                new_y = b.top();
                rect.y = new_y;
            }
        }
    }

    destroy_tiles(world, &broken, events);
    (new_x, new_y)
}

/// Remove broken tiles (descending index keeps earlier indices valid
/// and preserves tile-list order) and award break points.
fn destroy_tiles(world: &mut World, broken: &[usize], events: &mut Vec<GameEvent>) {
    for &i in broken.iter().rev() {
        let tile = world.tiles.remove(i);
        world.stage.point += world.config.rules.break_score;
        events.push(GameEvent::TileBroken { index: i, gx: tile.gx, gy: tile.gy });
    }
}
