//! Hazard spawner
//!
//! Hazards run on their own logical timer and keep the velocity they were
//! launched with. Diagonal launches are checked against the forbidden band so
//! a hazard never ends its flight inside the only passage of a gate.

use glam::Vec2;
use rand::Rng;

use super::band::ForbiddenBand;
use super::state::{GamePhase, World};

/// Outcome of one timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Intro still on screen
    DeferredIntro,
    /// A set spawned too recently
    DeferredAfterSet,
    Spawned { double: bool },
}

/// Advance hazard timers; returns how many hazards were spawned
///
/// The periodic countdown keeps a fixed cadence. A deferred firing is retried
/// once on its own countdown and does not shift the period.
pub fn tick(world: &mut World, dt: f32) -> usize {
    let mut spawned = 0;

    if let Some(delay) = world.hazard_timer.pending_double.as_mut() {
        *delay -= dt;
        if *delay <= 0.0 {
            world.hazard_timer.pending_double = None;
            if world.phase == GamePhase::Running {
                spawn_one(world);
                spawned += 1;
            }
        }
    }

    if let Some(retry) = world.hazard_timer.retry.as_mut() {
        *retry -= dt;
        if *retry <= 0.0 {
            world.hazard_timer.retry = None;
            if let TimerOutcome::Spawned { .. } = on_timer(world) {
                spawned += 1;
            }
        }
    }

    world.hazard_timer.countdown -= dt;
    if world.hazard_timer.countdown <= 0.0 {
        world.hazard_timer.countdown += world.tuning.hazards.period.max(f32::EPSILON);
        if let TimerOutcome::Spawned { .. } = on_timer(world) {
            spawned += 1;
        }
    }

    spawned
}

/// Timer fired: spawn now, or schedule a one-shot retry
pub fn on_timer(world: &mut World) -> TimerOutcome {
    let t = world.tuning.hazards.clone();

    if world.phase != GamePhase::Running {
        world.hazard_timer.retry = Some(t.intro_retry);
        log::debug!("Hazard deferred {:.1}s (intro active)", t.intro_retry);
        return TimerOutcome::DeferredIntro;
    }

    if let Some(last) = world.scheduler.last_set_at {
        let since = world.elapsed - last;
        if since < t.safe_window {
            world.hazard_timer.retry = Some(t.safe_window);
            log::debug!("Hazard deferred {:.1}s (set spawned {:.2}s ago)", t.safe_window, since);
            return TimerOutcome::DeferredAfterSet;
        }
    }

    world.hazard_timer.retry = None;
    spawn_one(world);

    let double = world.rng.random_bool(t.double_prob.clamp(0.0, 1.0) as f64);
    if double {
        world.hazard_timer.pending_double = Some(t.double_delay);
    }
    TimerOutcome::Spawned { double }
}

/// Launch a single hazard off-screen right
pub fn spawn_one(world: &mut World) -> u32 {
    let t = world.tuning.hazards.clone();
    let height = world.tuning.world.height;
    let band = world
        .band
        .validate(&world.obstacles)
        .map(|b| b.padded(t.band_safety_pad));

    let lo = t.y_margin.min(height / 2.0);
    let hi = (height - t.y_margin).max(lo);
    let y = launch_y(&mut world.rng, lo, hi, band);
    let x = world.tuning.world.width + t.spawn_offset_x;

    let vx = -world.speed.current * t.speed_ratio;
    let mut vy = 0.0;
    if world.rng.random_bool(t.diagonal_prob.clamp(0.0, 1.0) as f64) {
        let magnitude = world.rng_range(t.max_dy * t.min_dy_frac, t.max_dy);
        vy = if world.rng.random_bool(0.5) { magnitude } else { -magnitude };
    }

    if let Some(band) = band {
        if vy != 0.0 {
            let flight = flight_time(x, t.size / 2.0, vx, t.lifetime);
            vy = choose_vy(y, vy, flight, &band);
        }
    }

    log::debug!(
        "Hazard at ({:.0}, {:.0}) vel ({:.0}, {:.0}) band {:?}",
        x,
        y,
        vx,
        vy,
        band.map(|b| (b.y_min, b.y_max))
    );
    world.spawn_hazard(Vec2::new(x, y), Vec2::new(vx, vy))
}

/// Seconds until a hazard launched at `start_x` leaves the screen on the left
pub fn flight_time(start_x: f32, half_size: f32, vx: f32, fallback: f32) -> f32 {
    let speed = vx.abs();
    if speed <= f32::EPSILON {
        return fallback;
    }
    (start_x + half_size) / speed
}

/// Keep `vy` if the path misses the band, else try the flipped sign, else go level
pub fn choose_vy(launch_y: f32, vy: f32, flight_time: f32, band: &ForbiddenBand) -> f32 {
    let clear = |vy: f32| !band.intersects_segment(launch_y, launch_y + vy * flight_time);
    if clear(vy) {
        vy
    } else if clear(-vy) {
        -vy
    } else {
        0.0
    }
}

/// Uniform y in `[lo, hi]` outside `band` when possible
fn launch_y<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32, band: Option<ForbiddenBand>) -> f32 {
    let Some(band) = band else {
        return sample(rng, lo, hi);
    };
    let below = (band.y_min.min(hi) - lo).max(0.0);
    let above = (hi - band.y_max.max(lo)).max(0.0);
    let total = below + above;
    if total <= 0.0 {
        // Band covers the whole launch range: take the end furthest from its middle
        let mid = band.mid();
        let y = if (lo - mid).abs() >= (hi - mid).abs() { lo } else { hi };
        log::warn!(
            "Forbidden band [{:.0}, {:.0}] covers hazard range [{:.0}, {:.0}], launching at {:.0}",
            band.y_min,
            band.y_max,
            lo,
            hi,
            y
        );
        return y;
    }
    let r = rng.random_range(0.0..total);
    if r < below {
        lo + r
    } else {
        band.y_max.max(lo) + (r - below)
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}
