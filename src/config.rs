/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or
/// incomplete. Defaults mirror the reference tuning: 32px tiles,
/// gravity -1300, 520 jump, 5-tile dash at 900 px/s costing 3 points.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::tile::TILE;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub dash: DashConfig,
    pub rules: RulesConfig,
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Negative constant (y-up world).
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub max_jumps: u32,
    /// Max fall speed in px/s; 0 disables the clamp (unbounded fall).
    pub terminal_velocity: f32,
    /// Depth of the grounded probe below the actor, in pixels.
    pub ground_probe: f32,
    /// Fraction of a moving tile's velocity imparted while standing
    /// on it (conveyor carry).
    pub carry_ratio: f32,
}

#[derive(Clone, Debug)]
pub struct DashConfig {
    pub dash_tiles: u32,
    pub dash_speed: f32,
    /// Points spent per dash; affordability is checked by the World.
    pub dash_cost: i32,
}

impl DashConfig {
    /// Fixed dash travel in pixels.
    pub fn dash_distance(&self) -> f32 {
        self.dash_tiles as f32 * TILE
    }
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    /// Points awarded per broken tile.
    pub break_score: i32,
    /// Final Y below this means the actor missed every platform.
    pub fall_limit: f32,
    /// Spawn position in tile units (the layout carries no spawn glyph).
    pub spawn_x_tiles: f32,
    pub spawn_y_tiles: f32,
    /// Oscillating hazard speed in px/s.
    pub hazard_speed: f32,
    /// Oscillating hazard travel range in tiles, centered on spawn.
    pub hazard_range_tiles: f32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    dash: TomlDash,
    #[serde(default)]
    rules: TomlRules,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_move_speed")]
    move_speed: f32,
    #[serde(default = "default_jump_velocity")]
    jump_velocity: f32,
    #[serde(default = "default_max_jumps")]
    max_jumps: u32,
    #[serde(default)]
    terminal_velocity: f32,
    #[serde(default = "default_ground_probe")]
    ground_probe: f32,
    #[serde(default = "default_carry_ratio")]
    carry_ratio: f32,
}

#[derive(Deserialize, Debug)]
struct TomlDash {
    #[serde(default = "default_dash_tiles")]
    dash_tiles: u32,
    #[serde(default = "default_dash_speed")]
    dash_speed: f32,
    #[serde(default = "default_dash_cost")]
    dash_cost: i32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_break_score")]
    break_score: i32,
    #[serde(default = "default_fall_limit")]
    fall_limit: f32,
    #[serde(default = "default_spawn_x")]
    spawn_x_tiles: f32,
    #[serde(default = "default_spawn_y")]
    spawn_y_tiles: f32,
    #[serde(default = "default_hazard_speed")]
    hazard_speed: f32,
    #[serde(default = "default_hazard_range")]
    hazard_range_tiles: f32,
}

// ── Defaults ──

fn default_gravity() -> f32 { -1300.0 }
fn default_move_speed() -> f32 { 200.0 }
fn default_jump_velocity() -> f32 { 520.0 }
fn default_max_jumps() -> u32 { 2 }
fn default_ground_probe() -> f32 { 2.0 }
fn default_carry_ratio() -> f32 { 0.5 }

fn default_dash_tiles() -> u32 { 5 }
fn default_dash_speed() -> f32 { 900.0 }
fn default_dash_cost() -> i32 { 3 }

fn default_break_score() -> i32 { 1 }
fn default_fall_limit() -> f32 { -200.0 }
fn default_spawn_x() -> f32 { 1.5 }
fn default_spawn_y() -> f32 { 3.0 }
fn default_hazard_speed() -> f32 { 60.0 }
fn default_hazard_range() -> f32 { 3.0 }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            move_speed: default_move_speed(),
            jump_velocity: default_jump_velocity(),
            max_jumps: default_max_jumps(),
            terminal_velocity: 0.0,
            ground_probe: default_ground_probe(),
            carry_ratio: default_carry_ratio(),
        }
    }
}

impl Default for TomlDash {
    fn default() -> Self {
        TomlDash {
            dash_tiles: default_dash_tiles(),
            dash_speed: default_dash_speed(),
            dash_cost: default_dash_cost(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            break_score: default_break_score(),
            fall_limit: default_fall_limit(),
            spawn_x_tiles: default_spawn_x(),
            spawn_y_tiles: default_spawn_y(),
            hazard_speed: default_hazard_speed(),
            hazard_range_tiles: default_hazard_range(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            physics: PhysicsConfig {
                gravity: t.physics.gravity,
                move_speed: t.physics.move_speed,
                jump_velocity: t.physics.jump_velocity,
                max_jumps: t.physics.max_jumps,
                terminal_velocity: t.physics.terminal_velocity,
                ground_probe: t.physics.ground_probe,
                carry_ratio: t.physics.carry_ratio,
            },
            dash: DashConfig {
                dash_tiles: t.dash.dash_tiles,
                dash_speed: t.dash.dash_speed,
                dash_cost: t.dash.dash_cost,
            },
            rules: RulesConfig {
                break_score: t.rules.break_score,
                fall_limit: t.rules.fall_limit,
                spawn_x_tiles: t.rules.spawn_x_tiles,
                spawn_y_tiles: t.rules.spawn_y_tiles,
                hazard_speed: t.rules.hazard_speed,
                hazard_range_tiles: t.rules.hazard_range_tiles,
            },
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_toml(&candidate_dirs()).into()
    }

    /// Parse config from TOML text. Unparseable input falls back to
    /// defaults with a logged warning.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg.into(),
            Err(e) => {
                log::warn!("config parse error: {e}; using default settings");
                TomlConfig::default().into()
            }
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    log::warn!("{}: parse error: {e}; using default settings", path.display());
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}
