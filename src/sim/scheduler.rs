//! Distance-based spawn scheduler
//!
//! Sets are spaced by scrolled pixels, not seconds, so spacing on screen stays
//! constant as the speed ramps. Halfway through each interval a decorative
//! coin pattern fills the gap.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::sets::{self, Archetype};
use super::state::{GamePhase, SchedulerState, World};
use crate::tuning::Tuning;

/// What the scheduler spawned this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduledSpawns {
    pub set: Option<Archetype>,
    pub gap_coins: bool,
}

/// Scheduler state for a fresh run
pub fn initial_state(tuning: &Tuning, rng: &mut Pcg32) -> SchedulerState {
    SchedulerState {
        distance_since_last_set: 0.0,
        next_set_distance: tuning.sets.set_distance.sample(rng),
        pending_tail_pad: 0.0,
        gap_coin_spawned: false,
        gap_coin_distance: 0.0,
        last_archetype: None,
        last_set_at: None,
    }
}

/// Has the intro banner's right edge scrolled past the left threshold?
///
/// Estimated from elapsed time and the (clamped) current speed rather than
/// from the banner coins themselves.
pub fn intro_passed(world: &World) -> bool {
    let intro = &world.tuning.intro;
    let speed = world
        .speed
        .current
        .clamp(intro.speed_clamp.min, intro.speed_clamp.max.max(intro.speed_clamp.min));
    let moved = speed * world.elapsed.max(0.0);
    let right_edge = world.intro.start_x + world.intro.width - moved;
    right_edge < intro.pass_x
}

/// Advance scrolled distance and spawn whatever is due
pub fn tick(world: &mut World, dt: f32) -> ScheduledSpawns {
    let mut spawned = ScheduledSpawns::default();
    world.scheduler.distance_since_last_set += world.speed.current * dt;

    if world.phase != GamePhase::Running {
        return spawned;
    }

    if world.scheduler.distance_since_last_set >= world.scheduler.next_set_distance {
        let spawn_x = world.tuning.world.width + world.tuning.world.spawn_ahead;
        spawned.set = Some(sets::spawn_random_set(world, spawn_x));

        let mut next = world.tuning.sets.set_distance.sample(&mut world.rng);
        let scheduler = &mut world.scheduler;
        if scheduler.pending_tail_pad > 0.0 {
            next += scheduler.pending_tail_pad;
            scheduler.pending_tail_pad = 0.0;
        }
        scheduler.distance_since_last_set = 0.0;
        scheduler.next_set_distance = next;
        scheduler.gap_coin_distance = next * 0.5;
        scheduler.gap_coin_spawned = false;
    }

    if !world.scheduler.gap_coin_spawned
        && world.scheduler.distance_since_last_set >= world.scheduler.gap_coin_distance
    {
        spawn_gap_coins(world);
        world.scheduler.gap_coin_spawned = true;
        spawned.gap_coins = true;
    }

    spawned
}

/// Random decorative pattern ahead of the screen, around mid height
fn spawn_gap_coins(world: &mut World) {
    let w = &world.tuning.world;
    let sets = &world.tuning.sets;
    let x = w.width + w.spawn_ahead + sets.gap_coin_ahead;
    let jitter = sets.gap_coin_y_jitter;
    let mid_y = w.height / 2.0;
    let y = mid_y + world.rng_range(-jitter, jitter);
    let pattern = world.tables.gap_patterns.sample(&mut world.rng);
    log::debug!("Gap coins {:?} at ({:.0}, {:.0})", pattern, x, y);
    sets::spawn_pattern(world, pattern, Vec2::new(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn running_world() -> World {
        let mut world = World::new(21, Tuning::default());
        world.coins.clear();
        world.phase = GamePhase::Running;
        world.scheduler.gap_coin_spawned = true;
        world.drain_events();
        world
    }

    #[test]
    fn test_exact_threshold_spawns_one_set() {
        let mut world = running_world();
        let next = world.scheduler.next_set_distance;
        world.scheduler.distance_since_last_set = next;
        world.speed.current = 0.0;

        let spawned = tick(&mut world, SIM_DT);
        assert!(spawned.set.is_some());
        assert_eq!(world.scheduler.distance_since_last_set, 0.0);
        assert!(!world.obstacles.is_empty());
        let formations: std::collections::BTreeSet<u32> = world.obstacles.iter().map(|o| o.formation).collect();
        assert_eq!(formations.len(), 1);

        // Next tick just short of the new threshold: nothing else
        let spawned = tick(&mut world, SIM_DT);
        assert!(spawned.set.is_none());
    }

    #[test]
    fn test_no_spawn_during_intro() {
        let mut world = running_world();
        world.phase = GamePhase::Intro;
        world.scheduler.distance_since_last_set = 1.0e6;
        world.scheduler.gap_coin_spawned = false;
        let spawned = tick(&mut world, SIM_DT);
        assert_eq!(spawned, ScheduledSpawns::default());
        assert!(world.obstacles.is_empty());
        assert!(world.coins.is_empty());
    }

    #[test]
    fn test_distance_accumulates_with_speed() {
        let mut world = running_world();
        world.speed.current = 300.0;
        tick(&mut world, 0.5);
        assert!((world.scheduler.distance_since_last_set - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_redraw_includes_tail_pad_and_halfway_gap_coins() {
        let mut world = running_world();
        world.speed.current = 0.0;
        world.scheduler.distance_since_last_set = world.scheduler.next_set_distance;
        world.scheduler.pending_tail_pad = 0.0;
        // Force a two-layer so it leaves a tail pad for the following interval
        sets::spawn_set(&mut world, Archetype::TwoLayer, 900.0);
        let pad = world.scheduler.pending_tail_pad;
        assert!(pad > 0.0);

        tick(&mut world, SIM_DT);
        let t = &world.tuning.sets;
        let next = world.scheduler.next_set_distance;
        assert!(next >= t.set_distance.min + pad - 1e-3);
        assert!(next <= t.set_distance.max + pad + t.two_layer_chain_tail_pad + 1e-3);
        assert_eq!(world.scheduler.gap_coin_distance, next * 0.5);
        assert!(!world.scheduler.gap_coin_spawned);

        let coins_before = world.coins.len();
        world.scheduler.distance_since_last_set = next * 0.5;
        let spawned = tick(&mut world, SIM_DT);
        assert!(spawned.gap_coins);
        assert!(world.coins.len() > coins_before);
        assert!(world.scheduler.gap_coin_spawned);

        // Only once per interval
        let spawned = tick(&mut world, SIM_DT);
        assert!(!spawned.gap_coins);
    }

    #[test]
    fn test_intro_passes_after_banner_scrolls_by() {
        let mut world = World::new(1, Tuning::default());
        assert!(!intro_passed(&world));
        world.speed.current = 500.0;
        let travel = world.intro.start_x + world.intro.width - world.tuning.intro.pass_x;
        world.elapsed = travel / 500.0 + 0.01;
        assert!(intro_passed(&world));
        world.elapsed = travel / 500.0 - 0.01;
        assert!(!intro_passed(&world));
    }

    #[test]
    fn test_intro_speed_is_clamped() {
        let mut world = World::new(1, Tuning::default());
        world.speed.current = 0.0;
        world.elapsed = 1000.0;
        // Clamped to 60 px/s, so 1000 s is plenty
        assert!(intro_passed(&world));
    }
}
