/// Events emitted during a simulation step.
/// The presentation layer consumes these for animation/sound/shake.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A breakable tile was destroyed. `index` is its position in the
    /// tile list at the moment of the hit.
    TileBroken { index: usize, gx: i32, gy: i32 },
    /// Dash budget ran out this frame.
    DashEnded,
    /// Actor overlapped a hazard tile; restart is the caller's job.
    HazardTouched { index: usize },
    /// Actor fell below the world's fall limit.
    FellOut,
    /// Goal reached, next stage loaded.
    StageAdvanced { stage: usize },
    /// Goal reached on the final stage.
    GameCompleted,
}
