//! Thrust-ramp flight model
//!
//! Holding builds a ramp that drives a cubic thrust ease; releasing lets the
//! ramp decay while gravity (stronger when already falling) takes over and any
//! remaining upward speed is damped.

use super::state::Player;
use crate::lerp;
use crate::tuning::{WingsTuning, WorldTuning};

/// Outcome of one flight step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    Flying,
    /// Dropped below the world floor
    FellOff,
}

/// Latch a press-begin edge; ignored while already pressing
pub fn press_begin(player: &mut Player) {
    if !player.pressing {
        player.pressing = true;
        player.tap_pending = true;
    }
}

/// Latch a press-end edge
pub fn press_end(player: &mut Player) {
    player.pressing = false;
}

/// New vertical velocity after one step (no position change)
pub fn step_velocity(player: &mut Player, wings: &WingsTuning, dt: f32) -> f32 {
    let mut vy = player.vy;

    // A tap still lands even if the release arrived in the same tick
    if player.tap_pending {
        vy = vy.min(0.0) + wings.tap_boost_vy;
        player.tap_pending = false;
    }

    if player.pressing {
        player.ramp = (player.ramp + dt / wings.ramp_time).min(1.0);
        let t = player.ramp * player.ramp * player.ramp;
        let thrust = lerp(wings.thrust_min, wings.thrust_max, t);
        vy += thrust * dt;
    } else {
        player.ramp = (player.ramp - dt * wings.ramp_decay_mult).max(0.0);
        let falling = vy > 0.0;
        let g = if falling {
            wings.gravity_y * wings.fast_fall_mult
        } else {
            wings.gravity_y
        };
        vy += g * dt;
        if vy < 0.0 {
            vy *= wings.release_damp;
        }
    }

    let soft_cap_up = lerp(wings.soft_cap_up, wings.max_vy_up, player.ramp);
    if vy < soft_cap_up {
        vy = soft_cap_up;
    }
    vy.clamp(wings.max_vy_up, wings.max_vy_down)
}

/// Advance the player one tick
pub fn tick(player: &mut Player, wings: &WingsTuning, world: &WorldTuning, dt: f32) -> FlightOutcome {
    player.vy = step_velocity(player, wings, dt);
    player.pos.y += player.vy * dt;

    if player.pos.y > world.height {
        return FlightOutcome::FellOff;
    }
    player.pos.y = player.pos.y.clamp(world.top_margin, world.height);
    FlightOutcome::Flying
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn setup() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), tuning)
    }

    #[test]
    fn test_tap_boost_on_press_edge() {
        let (mut player, tuning) = setup();
        player.vy = 150.0;
        press_begin(&mut player);
        let vy = step_velocity(&mut player, &tuning.wings, SIM_DT);
        // Downward speed is cancelled before the boost, then thrust adds more lift
        assert!(vy < 0.0);
        assert!(vy >= tuning.wings.max_vy_up);
        assert!(!player.tap_pending);
    }

    #[test]
    fn test_repeated_press_does_not_retrigger() {
        let (mut player, _) = setup();
        press_begin(&mut player);
        player.tap_pending = false;
        press_begin(&mut player);
        assert!(!player.tap_pending);
        press_end(&mut player);
        press_begin(&mut player);
        assert!(player.tap_pending);
    }

    #[test]
    fn test_tap_and_release_same_tick() {
        let (mut player, tuning) = setup();
        press_begin(&mut player);
        press_end(&mut player);
        let vy = step_velocity(&mut player, &tuning.wings, SIM_DT);
        assert!(vy < 0.0, "tap boost should lift even when released in the same tick");
        assert!(!player.tap_pending);
    }

    #[test]
    fn test_ramp_saturates_and_decays() {
        let (mut player, tuning) = setup();
        press_begin(&mut player);
        for _ in 0..60 {
            player.vy = step_velocity(&mut player, &tuning.wings, SIM_DT);
        }
        assert_eq!(player.ramp, 1.0);
        // Full ramp lets the upward speed reach the hard cap
        assert_eq!(player.vy, tuning.wings.max_vy_up);

        press_end(&mut player);
        for _ in 0..30 {
            player.vy = step_velocity(&mut player, &tuning.wings, SIM_DT);
        }
        assert_eq!(player.ramp, 0.0);
    }

    #[test]
    fn test_release_falls_with_gravity() {
        let (mut player, tuning) = setup();
        let mut last_y = player.pos.y;
        for _ in 0..30 {
            assert_eq!(tick(&mut player, &tuning.wings, &tuning.world, SIM_DT), FlightOutcome::Flying);
            assert!(player.pos.y >= last_y);
            last_y = player.pos.y;
        }
        assert_eq!(player.vy, tuning.wings.max_vy_down);
    }

    #[test]
    fn test_release_damps_upward_speed() {
        let (mut player, tuning) = setup();
        player.vy = -100.0;
        let vy = step_velocity(&mut player, &tuning.wings, SIM_DT);
        // (-100 + 1800 / 60) * 0.6, well inside the soft cap
        assert!((vy - -42.0).abs() < 1e-3, "vy = {vy}");
    }

    #[test]
    fn test_fast_fall_gravity_when_already_falling() {
        let (mut player, tuning) = setup();
        player.vy = 50.0;
        let vy = step_velocity(&mut player, &tuning.wings, SIM_DT);
        let expected = 50.0 + 1800.0 * 1.15 * SIM_DT;
        assert!((vy - expected).abs() < 1e-3, "vy = {vy}, expected {expected}");
    }

    #[test]
    fn test_thrust_follows_cubic_ease() {
        let (mut player, tuning) = setup();
        player.pressing = true;
        player.ramp = 0.5;
        let vy = step_velocity(&mut player, &tuning.wings, SIM_DT);

        let ramp = 0.5 + SIM_DT / 0.25;
        assert!((player.ramp - ramp).abs() < 1e-6);
        let cubic = (-540.0 + (-1800.0 - -540.0) * ramp * ramp * ramp) * SIM_DT;
        let linear = (-540.0 + (-1800.0 - -540.0) * ramp) * SIM_DT;
        assert!((vy - cubic).abs() < 1e-3, "vy = {vy}, expected {cubic}");
        assert!((vy - linear).abs() > 1.0);
    }

    #[test]
    fn test_fell_off_bottom() {
        let (mut player, tuning) = setup();
        player.pos.y = tuning.world.height - 1.0;
        player.vy = tuning.wings.max_vy_down;
        assert_eq!(tick(&mut player, &tuning.wings, &tuning.world, SIM_DT), FlightOutcome::FellOff);
    }

    #[test]
    fn test_top_margin_clamp() {
        let (mut player, tuning) = setup();
        player.pos.y = tuning.world.top_margin + 1.0;
        press_begin(&mut player);
        for _ in 0..30 {
            tick(&mut player, &tuning.wings, &tuning.world, SIM_DT);
        }
        assert_eq!(player.pos.y, tuning.world.top_margin);
    }

    proptest! {
        #[test]
        fn prop_velocity_always_bounded(
            presses in proptest::collection::vec(any::<bool>(), 1..400),
            start_vy in -2000.0f32..2000.0,
            dt in 0.001f32..0.1,
        ) {
            let (mut player, tuning) = setup();
            player.vy = start_vy;
            for pressed in presses {
                if pressed { press_begin(&mut player) } else { press_end(&mut player) }
                tick(&mut player, &tuning.wings, &tuning.world, dt);
                prop_assert!(player.vy >= tuning.wings.max_vy_up);
                prop_assert!(player.vy <= tuning.wings.max_vy_down);
                prop_assert!((0.0..=1.0).contains(&player.ramp));
            }
        }
    }
}
