/// Stage layouts and loading.
///
/// Each stage is a fixed-height array of equal-length rows. Row 0 of
/// the array is the topmost world row (gy = height − 1 − row); column
/// index maps directly to grid X. Rows of unequal length are an
/// authoring error this loader does not validate.
///
/// ## Tile legend:
///   '#' = Solid                  'B' = Breakable (one-shot)
///   'W' = Goal                   'S' = Slippery
///   'P' = Hazard (stationary)    'R' = Hazard (oscillating)
///   'M' = Platform (oscillating, solid, carries the actor)
///   '.' = empty

use glam::Vec2;

use crate::config::GameConfig;
use crate::domain::actor::{ACTOR_H, ACTOR_W};
use crate::domain::rect::Rect;
use crate::domain::tile::{Tile, TileKind, TILE};

use super::world::{spawn_pos, World};

/// Candidate grid offsets probed when the spawn rectangle overlaps a
/// trigger tile, in search order.
const SPAWN_PROBE_RING: [(i32, i32); 10] = [
    (1, 0), (-1, 0), (0, 1), (1, 1), (-1, 1),
    (2, 0), (-2, 0), (0, 2), (2, 1), (-2, 1),
];

pub struct StageDef {
    pub name: &'static str,
    pub rows: &'static [&'static str],
}

pub fn stage_count() -> usize {
    STAGES.len()
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load stage `n` (1-based, clamped to the valid range): rebuild the
/// tile set from the layout and reset the actor to spawn defaults.
/// Point balance is untouched — zeroing is the caller's decision
/// (advance and hazard restarts zero it, manual restarts may not).
pub fn load_level(world: &mut World, n: usize) {
    let n = n.clamp(1, STAGES.len());
    let def = &STAGES[n - 1];

    world.stage.stage = n;
    world.stage.cleared = false;
    world.tiles = decode_rows(def.rows, &world.config);
    reset_actor_to_spawn(world);

    log::info!("stage {n} loaded: {}", def.name);
}

/// Load an arbitrary layout into the current stage slot. The stage
/// index is left as-is; tiles and actor reset as in `load_level`.
pub fn load_stage_rows(world: &mut World, rows: &[&str]) {
    world.stage.cleared = false;
    world.tiles = decode_rows(rows, &world.config);
    reset_actor_to_spawn(world);
}

/// Goal reached: advance to the next stage, or finish the game when
/// already on the last one.
pub fn next_level(world: &mut World) {
    if world.stage.stage >= STAGES.len() {
        complete_game(world);
        return;
    }
    world.stage.advance();
    load_level(world, world.stage.stage);
}

/// Reload the current stage. `reset_point` zeroes the balance
/// (hazard-triggered restarts always do).
pub fn restart_level(world: &mut World, reset_point: bool) {
    world.stage.restart(reset_point);
    load_level(world, world.stage.stage);
}

/// Terminal state: freeze the simulation, drop all tiles, park the
/// actor in a neutral idle pose.
pub fn complete_game(world: &mut World) {
    world.stage.complete();
    world.tiles.clear();
    let spawn = spawn_pos(&world.config);
    world.actor.reset(spawn.x, spawn.y, world.config.physics.max_jumps);
    world.fell_this_frame = false;
    world.on_slippery = false;
    world.on_wall = false;
    log::info!("game complete");
}

// ══════════════════════════════════════════════════════════════
// Decoding
// ══════════════════════════════════════════════════════════════

/// Decode layout rows into tiles. Row 0 is the topmost world row.
/// Unknown glyphs are ignored.
pub fn decode_rows(rows: &[&str], config: &GameConfig) -> Vec<Tile> {
    let height = rows.len() as i32;
    let speed = config.rules.hazard_speed;
    let range = config.rules.hazard_range_tiles * TILE;

    let mut tiles = vec![];
    for (row, line) in rows.iter().enumerate() {
        let gy = height - 1 - row as i32;
        for (col, ch) in line.chars().enumerate() {
            let gx = col as i32;
            match ch {
                '#' => tiles.push(Tile::new(gx, gy, TileKind::Solid)),
                'B' => tiles.push(Tile::new(gx, gy, TileKind::Breakable)),
                'W' => tiles.push(Tile::new(gx, gy, TileKind::Goal)),
                'S' => tiles.push(Tile::new(gx, gy, TileKind::Slippery)),
                'P' => tiles.push(Tile::new(gx, gy, TileKind::Hazard)),
                'R' => tiles.push(Tile::hazard_moving(gx, gy, speed, range)),
                'M' => tiles.push(Tile::platform(gx, gy, speed, range)),
                _ => {}
            }
        }
    }
    tiles
}

// ══════════════════════════════════════════════════════════════
// Spawn safety
// ══════════════════════════════════════════════════════════════

fn reset_actor_to_spawn(world: &mut World) {
    let want = spawn_pos(&world.config);
    let spawn = safe_spawn(&world.tiles, want);
    world.actor.reset(spawn.x, spawn.y, world.config.physics.max_jumps);
    world.fell_this_frame = false;
    world.on_slippery = false;
    world.on_wall = false;
}

/// If the spawn rectangle overlaps any trigger tile, probe a fixed
/// ring of nearby grid offsets and take the first clear candidate.
/// Fallback: nudge one tile backward — best effort, not a guarantee.
fn safe_spawn(tiles: &[Tile], want: Vec2) -> Vec2 {
    if !overlaps_trigger(tiles, want) {
        return want;
    }
    for (dx, dy) in SPAWN_PROBE_RING {
        let cand = want + Vec2::new(dx as f32 * TILE, dy as f32 * TILE);
        if !overlaps_trigger(tiles, cand) {
            log::warn!(
                "spawn overlapped a trigger; relocated by ({dx},{dy}) tiles"
            );
            return cand;
        }
    }
    log::warn!("spawn probe ring exhausted; nudging one tile backward");
    want - Vec2::new(TILE, 0.0)
}

fn overlaps_trigger(tiles: &[Tile], pos: Vec2) -> bool {
    let rect = Rect::new(pos.x, pos.y, ACTOR_W, ACTOR_H);
    tiles
        .iter()
        .any(|t| t.is_trigger() && rect.overlaps(&t.bounds()))
}

// ══════════════════════════════════════════════════════════════
// Embedded stages
// ══════════════════════════════════════════════════════════════

pub const STAGES: [StageDef; 3] = [
    StageDef {
        name: "First Steps",
        rows: &[
            "..........................",
            "..........................",
            "..........................",
            ".......................W..",
            "......................###.",
            "..........................",
            "..........B...............",
            "..........B......##.......",
            "..........B...............",
            "..........B...............",
            "..........B.....P.........",
            "##########################",
        ],
    },
    StageDef {
        name: "Thin Ice",
        rows: &[
            "..........................",
            "..W.......................",
            ".###......................",
            "..........................",
            "......SSSS................",
            "..........................",
            "............BB............",
            "..........................",
            "................SSSS......",
            "......R...................",
            "..................B.......",
            "##########################",
        ],
    },
    StageDef {
        name: "The Gauntlet",
        rows: &[
            "..........................",
            "......................W...",
            ".....................###..",
            "..........................",
            "..............SS..........",
            ".....#####................",
            "..........................",
            "....P...........R.........",
            "...BB.....................",
            "..........................",
            ".........M................",
            "#####............#########",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::World;

    fn world() -> World {
        World::new(GameConfig::default())
    }

    #[test]
    fn three_stages_each_have_a_goal_and_ground() {
        let cfg = GameConfig::default();
        assert_eq!(stage_count(), 3);
        for def in &STAGES {
            let tiles = decode_rows(def.rows, &cfg);
            let goals = tiles
                .iter()
                .filter(|t| t.kind == TileKind::Goal)
                .count();
            assert_eq!(goals, 1, "{} must have exactly one goal", def.name);
            assert!(
                tiles.iter().any(|t| t.kind == TileKind::Solid && t.gy == 0),
                "{} must have ground",
                def.name
            );
        }
    }

    #[test]
    fn rows_decode_with_inverted_y() {
        let cfg = GameConfig::default();
        let tiles = decode_rows(&["W..", "...", "##B"], &cfg);
        // Top row maps to the highest gy.
        let goal = tiles.iter().find(|t| t.kind == TileKind::Goal).unwrap();
        assert_eq!((goal.gx, goal.gy), (0, 2));
        let brk = tiles.iter().find(|t| t.kind == TileKind::Breakable).unwrap();
        assert_eq!((brk.gx, brk.gy), (2, 0));
        assert_eq!(tiles.len(), 4);
    }

    #[test]
    fn glyph_table_is_complete() {
        let cfg = GameConfig::default();
        let tiles = decode_rows(&["#BWSPRM?x "], &cfg);
        assert_eq!(tiles.len(), 7);
        assert_eq!(tiles[0].kind, TileKind::Solid);
        assert_eq!(tiles[1].kind, TileKind::Breakable);
        assert_eq!(tiles[2].kind, TileKind::Goal);
        assert_eq!(tiles[3].kind, TileKind::Slippery);
        assert_eq!(tiles[4].kind, TileKind::Hazard);
        assert!(matches!(tiles[5].kind, TileKind::HazardMoving(_)));
        assert!(matches!(tiles[6].kind, TileKind::Platform(_)));
    }

    #[test]
    fn load_level_clamps_stage_index() {
        let mut w = world();
        w.load_level(99);
        assert_eq!(w.stage_index(), 3);
        w.load_level(0);
        assert_eq!(w.stage_index(), 1);
    }

    #[test]
    fn load_level_resets_actor_but_keeps_point() {
        let mut w = world();
        w.stage.point = 4;
        w.actor.pos.x = 999.0;
        w.load_level(2);
        assert_eq!(w.point(), 4);
        assert_eq!(w.actor.pos, spawn_pos(&w.config));
        assert_eq!(w.actor.jumps_left, w.config.physics.max_jumps);
        assert!(!w.actor.dashing);
    }

    #[test]
    fn restart_zeroes_point_only_on_request() {
        let mut w = world();
        w.stage.point = 6;
        w.restart_level(false);
        assert_eq!(w.point(), 6);
        w.restart_level(true);
        assert_eq!(w.point(), 0);
        assert_eq!(w.stage_index(), 1);
    }

    #[test]
    fn next_level_advances_and_zeroes_point() {
        let mut w = world();
        w.stage.point = 5;
        w.next_level();
        assert_eq!(w.stage_index(), 2);
        assert_eq!(w.point(), 0);
        assert!(!w.cleared());
    }

    #[test]
    fn next_level_on_final_stage_completes() {
        let mut w = world();
        w.load_level(3);
        w.stage.point = 5;
        w.next_level();
        assert!(w.cleared());
        assert_eq!(w.point(), 0);
        assert!(w.tiles.is_empty());
        assert_eq!(w.actor.vel, Vec2::ZERO);
    }

    #[test]
    fn spawn_relocates_off_trigger() {
        let mut w = world();
        // Hazard covering the default spawn cell (col 1-2, gy 3).
        load_stage_rows(
            &mut w,
            &[
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                ".PP.......",
                "..........",
                "..........",
                "##########",
            ],
        );
        let want = spawn_pos(&w.config);
        assert_ne!(w.actor.pos, want);
        let rect = w.actor.bounds();
        assert!(w
            .tiles
            .iter()
            .all(|t| !t.is_trigger() || !rect.overlaps(&t.bounds())));
    }

    #[test]
    fn spawn_fallback_nudges_backward_when_ring_is_blocked() {
        let mut w = world();
        // Hazards blanket the spawn cell and the whole probe ring.
        load_stage_rows(
            &mut w,
            &[
                "..........",
                "..........",
                "..........",
                "..........",
                "..........",
                "PPPPPPPPPP",
                "PPPPPPPPPP",
                "PPPPPPPPPP",
                "PPPPPPPPPP",
                "PPPPPPPPPP",
                "PPPPPPPPPP",
                "PPPPPPPPPP",
            ],
        );
        let want = spawn_pos(&w.config);
        assert_eq!(w.actor.pos, want - Vec2::new(TILE, 0.0));
    }

    #[test]
    fn clean_spawn_is_left_alone() {
        let mut w = world();
        w.load_level(1);
        assert_eq!(w.actor.pos, spawn_pos(&w.config));
    }
}
