//! tiledash — physics and level-interaction core of a tile-based
//! 2D platformer.
//!
//! The crate owns simulation only: swept axis-separated collision
//! against a tile grid, an actor with double jump and a point-funded
//! dash, oscillating hazards, breakable tiles, and stage transitions.
//! Rendering, input, and audio live with the caller; each frame the
//! caller feeds inputs to [`sim::world::World`], calls
//! [`sim::world::World::step`], and consumes the returned
//! [`sim::event::GameEvent`]s.
//!
//! World space is Y-up with gravity negative. All collision boxes are
//! axis-aligned; overlap is strict (shared edges do not overlap), which
//! is what lets a grounded actor rest exactly on a tile top.

pub mod config;
pub mod domain;
pub mod sim;

pub use config::GameConfig;
pub use sim::event::GameEvent;
pub use sim::world::World;
