pub mod actor;
pub mod rect;
pub mod tile;
