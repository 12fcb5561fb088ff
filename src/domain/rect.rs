/// Axis-aligned rectangle used for all collision geometry.
///
/// Overlap is strict: rectangles that merely share an edge do NOT
/// overlap. Resolution relies on this — an actor snapped flush to a
/// tile face rests there without re-triggering the same tile next
/// frame.

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Right edge (x + w).
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge (y + h). World is y-up.
    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test (touching edges don't count).
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }
}
