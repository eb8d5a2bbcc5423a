//! Scroll speed controller
//!
//! The target speed rises with time and score; the current speed chases it
//! with exponential smoothing so changes ramp instead of stepping.

use super::state::{GamePhase, SpeedState, World};
use crate::lerp;
use crate::tuning::SpeedTuning;

/// Target for the normal (post-intro) formula
pub fn running_target(speed: &SpeedState, tuning: &SpeedTuning, score: u64) -> f32 {
    let bonus = speed.time_bonus + score as f32 * tuning.score_bonus_per_point;
    (speed.baseline + bonus).clamp(speed.baseline, speed.max.max(speed.baseline))
}

/// Per-tick lerp factor; equals `convergence` at 60 Hz
#[inline]
pub fn convergence_factor(convergence: f32, dt: f32) -> f32 {
    1.0 - (1.0 - convergence.clamp(0.0, 1.0)).powf(dt * 60.0)
}

/// Advance the speed one tick and return the current speed
pub fn tick(world: &mut World, dt: f32) -> f32 {
    let tuning = &world.tuning.speed;
    let speed = &mut world.speed;

    speed.bonus_timer -= dt;
    while speed.bonus_timer <= 0.0 {
        speed.bonus_timer += tuning.bonus_interval.max(f32::EPSILON);
        let headroom = (speed.max - speed.baseline).max(0.0);
        speed.time_bonus = (speed.time_bonus + tuning.bonus_step).min(headroom);
    }

    speed.target = match world.phase {
        GamePhase::Intro => tuning.intro_boost_speed,
        _ => running_target(speed, tuning, world.score),
    };

    let previous = speed.current;
    speed.current = lerp(speed.current, speed.target, convergence_factor(tuning.convergence, dt));
    if (speed.current - previous).abs() > f32::EPSILON {
        log::trace!("speed {:.2} -> {:.2} (target {:.1})", previous, speed.current, speed.target);
    }
    speed.current
}

/// Recompute the target after a score change
pub fn on_score_changed(world: &mut World) {
    if world.phase == GamePhase::Running {
        world.speed.target = running_target(&world.speed, &world.tuning.speed, world.score);
    }
}

/// Push the scroll speed into obstacle and coin velocities, only when it moved
///
/// Hazards keep their launch velocity and are not touched.
pub fn apply_scroll_speed(world: &mut World) -> bool {
    let current = world.speed.current;
    if world.speed.last_applied == Some(current) {
        return false;
    }
    let vx = -current;
    for obstacle in world.obstacles.iter_mut().filter(|o| o.active) {
        obstacle.vel.x = vx;
        obstacle.vel.y = 0.0;
    }
    for coin in world.coins.iter_mut().filter(|c| !c.collected) {
        coin.vel.x = vx;
        coin.vel.y = 0.0;
    }
    world.speed.last_applied = Some(current);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn running_world() -> World {
        let mut world = World::new(5, Tuning::default());
        world.phase = GamePhase::Running;
        world.speed.current = world.speed.baseline;
        world
    }

    #[test]
    fn test_converges_toward_target() {
        let mut world = running_world();
        world.speed.time_bonus = 100.0;
        let target = world.speed.baseline + 100.0;
        let mut last_gap = f32::MAX;
        for _ in 0..120 {
            let current = tick(&mut world, SIM_DT);
            let gap = (target - current).abs();
            assert!(gap <= last_gap + 1e-3);
            last_gap = gap;
        }
        assert!(last_gap < 1.0);
    }

    #[test]
    fn test_one_frame_is_eight_percent() {
        let mut world = running_world();
        world.speed.time_bonus = 100.0;
        let before = world.speed.current;
        let after = tick(&mut world, SIM_DT);
        assert!(((after - before) - 8.0).abs() < 0.01);
    }

    #[test]
    fn test_target_clamped_to_max() {
        let mut world = running_world();
        world.score = 1_000_000;
        tick(&mut world, SIM_DT);
        assert_eq!(world.speed.target, world.speed.max);
    }

    #[test]
    fn test_time_bonus_steps_and_caps() {
        let mut world = running_world();
        let t = world.tuning.speed.clone();
        let mut elapsed = 0.0;
        while elapsed < t.bonus_interval + 0.5 {
            tick(&mut world, SIM_DT);
            elapsed += SIM_DT;
        }
        assert!((world.speed.time_bonus - t.bonus_step).abs() < 1e-4);

        for _ in 0..(60 * 60 * 5) {
            tick(&mut world, SIM_DT);
        }
        assert!(world.speed.time_bonus <= t.max - t.baseline);
        assert!(world.speed.current <= t.max + 1e-3);
    }

    #[test]
    fn test_score_raises_target() {
        let mut world = running_world();
        let before = running_target(&world.speed, &world.tuning.speed, 0);
        world.add_score(50);
        assert!(world.speed.target > before);
    }

    #[test]
    fn test_intro_targets_boost() {
        let mut world = World::new(5, Tuning::default());
        tick(&mut world, SIM_DT);
        assert_eq!(world.speed.target, world.tuning.speed.intro_boost_speed);
    }

    #[test]
    fn test_apply_only_on_change_and_skips_hazards() {
        let mut world = running_world();
        world.spawn_hazard(Vec2::new(900.0, 100.0), Vec2::new(-500.0, 30.0));
        assert!(apply_scroll_speed(&mut world));
        assert!(!apply_scroll_speed(&mut world));
        assert!(world.coins.iter().all(|c| c.vel.x == -world.speed.current));
        assert_eq!(world.hazards[0].vel, Vec2::new(-500.0, 30.0));

        world.speed.current += 1.0;
        assert!(apply_scroll_speed(&mut world));
    }
}
