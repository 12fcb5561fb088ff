/// The controllable actor: kinematic state plus the pure state
/// transitions that need no knowledge of the tile grid.
///
/// Invariants owned here:
///   - jumps_left stays in [0, max_jumps]; refilled only via `land()`
///   - while dashing, horizontal velocity is pinned to dash speed × dir
///   - dash_remaining only decreases, never below zero

use glam::Vec2;

use super::rect::Rect;

/// Actor collision box, in pixels (fixed for the whole run).
pub const ACTOR_W: f32 = 22.0;
pub const ACTOR_H: f32 = 28.0;

/// Dash budget below this is treated as spent. Per-frame displacement
/// clamping can leave a sub-epsilon f32 residue that no subsequent
/// frame can consume (old_x + dx rounds back to old_x), which would
/// otherwise keep `dashing` true forever.
pub const DASH_EPSILON: f32 = 1e-3;

#[derive(Clone, Debug)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub jumps_left: u32,
    pub dashing: bool,
    /// Remaining dash distance in pixels.
    pub dash_remaining: f32,
    /// -1 or +1.
    pub dash_dir: i32,
}

impl Actor {
    pub fn new(x: f32, y: f32, max_jumps: u32) -> Self {
        Actor {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            grounded: false,
            jumps_left: max_jumps,
            dashing: false,
            dash_remaining: 0.0,
            dash_dir: 1,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ACTOR_W, ACTOR_H)
    }

    /// Back to spawn defaults. Called on every stage (re)load.
    pub fn reset(&mut self, x: f32, y: f32, max_jumps: u32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.jumps_left = max_jumps;
        self.dashing = false;
        self.dash_remaining = 0.0;
        self.dash_dir = 1;
    }

    /// vy += gravity·dt. Gravity is negative; fall speed is unbounded
    /// unless `terminal_velocity` is nonzero.
    pub fn apply_gravity(&mut self, gravity: f32, terminal_velocity: f32, dt: f32) {
        self.vel.y += gravity * dt;
        if terminal_velocity > 0.0 && self.vel.y < -terminal_velocity {
            self.vel.y = -terminal_velocity;
        }
    }

    /// Consume one jump if any remain. Returns whether the jump fired.
    pub fn try_jump(&mut self, jump_velocity: f32) -> bool {
        if self.jumps_left == 0 {
            return false;
        }
        self.jumps_left -= 1;
        self.vel.y = jump_velocity;
        self.grounded = false;
        true
    }

    /// Grounded contact: refill the jump counter.
    pub fn land(&mut self, max_jumps: u32) {
        self.grounded = true;
        self.jumps_left = max_jumps;
    }

    /// Begin a dash. The caller (World) has already verified point
    /// affordability; the Actor only owns the kinematics.
    /// Ties in `direction` resolve to +1.
    pub fn start_dash(&mut self, direction: i32, dash_distance: f32, dash_speed: f32) {
        self.dashing = true;
        self.dash_dir = if direction < 0 { -1 } else { 1 };
        self.dash_remaining = dash_distance;
        self.vel.x = self.dash_dir as f32 * dash_speed;
    }

    pub fn stop_dash(&mut self) {
        self.dashing = false;
        self.vel.x = 0.0;
    }

    /// Spend dash budget for distance actually travelled this frame.
    /// Returns true if the dash just ended. A residue below
    /// `DASH_EPSILON` counts as spent.
    pub fn consume_dash(&mut self, travelled: f32, dash_speed: f32) -> bool {
        self.dash_remaining = (self.dash_remaining - travelled).max(0.0);
        if self.dash_remaining <= DASH_EPSILON {
            self.dash_remaining = 0.0;
            self.stop_dash();
            return true;
        }
        // A wall snap may have zeroed vx; a static-friction tile must
        // never kill dash speed.
        self.vel.x = self.dash_dir as f32 * dash_speed;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_counter_decrements_and_runs_out() {
        let mut a = Actor::new(0.0, 0.0, 2);
        assert!(a.try_jump(520.0));
        assert_eq!(a.jumps_left, 1);
        assert_eq!(a.vel.y, 520.0);
        assert!(!a.grounded);

        assert!(a.try_jump(520.0));
        assert_eq!(a.jumps_left, 0);

        // Third request is a no-op.
        a.vel.y = -33.0;
        assert!(!a.try_jump(520.0));
        assert_eq!(a.vel.y, -33.0);
    }

    #[test]
    fn landing_refills_jumps() {
        let mut a = Actor::new(0.0, 0.0, 2);
        a.try_jump(520.0);
        a.try_jump(520.0);
        a.land(2);
        assert!(a.grounded);
        assert_eq!(a.jumps_left, 2);
    }

    #[test]
    fn gravity_is_unbounded_by_default() {
        let mut a = Actor::new(0.0, 0.0, 2);
        for _ in 0..1000 {
            a.apply_gravity(-1300.0, 0.0, 1.0 / 60.0);
        }
        assert!(a.vel.y < -20_000.0);
    }

    #[test]
    fn terminal_velocity_clamps_when_enabled() {
        let mut a = Actor::new(0.0, 0.0, 2);
        for _ in 0..1000 {
            a.apply_gravity(-1300.0, 600.0, 1.0 / 60.0);
        }
        assert_eq!(a.vel.y, -600.0);
    }

    #[test]
    fn dash_pins_velocity_and_direction() {
        let mut a = Actor::new(0.0, 0.0, 2);
        a.start_dash(-5, 160.0, 900.0);
        assert!(a.dashing);
        assert_eq!(a.dash_dir, -1);
        assert_eq!(a.vel.x, -900.0);
        assert_eq!(a.dash_remaining, 160.0);

        // Tie resolves to +1.
        a.stop_dash();
        a.start_dash(0, 160.0, 900.0);
        assert_eq!(a.dash_dir, 1);
        assert_eq!(a.vel.x, 900.0);
    }

    #[test]
    fn consume_dash_reasserts_velocity_until_spent() {
        let mut a = Actor::new(0.0, 0.0, 2);
        a.start_dash(1, 160.0, 900.0);

        // Wall snap zeroed vx; budget not yet spent.
        a.vel.x = 0.0;
        assert!(!a.consume_dash(100.0, 900.0));
        assert_eq!(a.vel.x, 900.0);
        assert_eq!(a.dash_remaining, 60.0);

        assert!(a.consume_dash(60.0, 900.0));
        assert!(!a.dashing);
        assert_eq!(a.vel.x, 0.0);
        assert_eq!(a.dash_remaining, 0.0);
    }

    #[test]
    fn sub_epsilon_residue_ends_the_dash() {
        let mut a = Actor::new(0.0, 0.0, 2);
        a.start_dash(1, 160.0, 900.0);
        // Rounding residue smaller than any consumable displacement;
        // the frame travels nothing, yet the dash must still end.
        a.dash_remaining = 7.6293945e-6;
        assert!(a.consume_dash(0.0, 900.0));
        assert!(!a.dashing);
        assert_eq!(a.dash_remaining, 0.0);
        assert_eq!(a.vel.x, 0.0);
    }

    #[test]
    fn dash_remaining_never_negative() {
        let mut a = Actor::new(0.0, 0.0, 2);
        a.start_dash(1, 160.0, 900.0);
        a.consume_dash(500.0, 900.0);
        assert_eq!(a.dash_remaining, 0.0);
    }

    #[test]
    fn reset_restores_spawn_defaults() {
        let mut a = Actor::new(0.0, 0.0, 2);
        a.try_jump(520.0);
        a.start_dash(-1, 160.0, 900.0);
        a.pos = Vec2::new(400.0, 300.0);
        a.reset(48.0, 96.0, 2);
        assert_eq!(a.pos, Vec2::new(48.0, 96.0));
        assert_eq!(a.vel, Vec2::ZERO);
        assert_eq!(a.jumps_left, 2);
        assert!(!a.dashing);
    }
}
