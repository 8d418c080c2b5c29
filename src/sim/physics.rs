//! Player physics
//!
//! Gravity and the jump impulse are fixed per-frame increments, so the run
//! plays faster on high-refresh displays. Only the session clock is scaled
//! by delta time.

use super::state::Player;
use crate::consts::{GRAVITY, JUMP_STRENGTH};
use crate::player_floor_y;

impl Player {
    /// Start a jump. Ignored while airborne; returns whether it took.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity = JUMP_STRENGTH;
        self.grounded = false;
        true
    }

    /// Advance one frame: gravity, integrate, clamp to the floor
    pub fn step(&mut self) {
        self.velocity += GRAVITY;
        self.pos.y += self.velocity;

        let floor = player_floor_y();
        if self.pos.y >= floor {
            self.pos.y = floor;
            self.velocity = 0.0;
            self.grounded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_standing_player_stays_grounded() {
        let mut player = Player::default();
        for _ in 0..10 {
            player.step();
        }
        assert!(player.grounded);
        assert_eq!(player.velocity, 0.0);
        assert_eq!(player.pos.y, player_floor_y());
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut player = Player::default();
        assert!(player.jump());
        assert_eq!(player.velocity, JUMP_STRENGTH);

        player.step();
        assert!(!player.grounded);
        assert!(player.pos.y < player_floor_y());

        let mut frames = 1;
        let mut apex = player.pos.y;
        while !player.grounded && frames < 200 {
            player.step();
            apex = apex.min(player.pos.y);
            frames += 1;
        }
        assert!(player.grounded);
        assert_eq!(player.pos.y, player_floor_y());
        // Roughly v^2 / 2g above the floor
        assert!(player_floor_y() - apex > 150.0);
        assert!(frames > 40 && frames < 50, "airtime {frames}");
    }

    #[test]
    fn test_no_double_jump() {
        let mut player = Player::default();
        assert!(player.jump());
        player.step();
        let velocity = player.velocity;
        assert!(!player.jump());
        assert_eq!(player.velocity, velocity);
    }

    proptest! {
        #[test]
        fn prop_airborne_jump_leaves_velocity(frames in 1usize..40) {
            let mut player = Player::default();
            player.jump();
            for _ in 0..frames {
                player.step();
            }
            prop_assume!(!player.grounded);
            let before = player.velocity;
            prop_assert!(!player.jump());
            prop_assert_eq!(player.velocity, before);
        }

        #[test]
        fn prop_never_below_floor(frames in 0usize..200, jump_at in 0usize..200) {
            let mut player = Player::default();
            for i in 0..frames {
                if i == jump_at {
                    player.jump();
                }
                player.step();
                prop_assert!(player.pos.y <= player_floor_y());
            }
        }
    }
}
