//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically. The order of the
//! steps below is part of the contract: input edges first, then speed, flight,
//! movement and cleanup, then spawning, and collisions last.

use super::flight::{self, FlightOutcome};
use super::state::{GameEvent, GameOverCause, GamePhase, World};
use super::{collision, hazards, scheduler, speed};

/// Input edges latched since the previous tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Press started (tap / hold begins)
    pub press_begin: bool,
    /// Press released
    pub press_end: bool,
}

/// Advance the world by one timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    // Terminal until restart
    if world.phase == GamePhase::GameOver {
        return;
    }

    if input.press_begin {
        flight::press_begin(&mut world.player);
    }
    if input.press_end {
        flight::press_end(&mut world.player);
    }

    world.elapsed += dt;

    speed::tick(world, dt);
    speed::apply_scroll_speed(world);

    let outcome = flight::tick(&mut world.player, &world.tuning.wings, &world.tuning.world, dt);
    if outcome == FlightOutcome::FellOff {
        world.trigger_game_over(GameOverCause::FellOff);
        return;
    }

    move_entities(world, dt);
    prune_entities(world);
    world.band.validate(&world.obstacles);

    if world.phase == GamePhase::Intro && scheduler::intro_passed(world) {
        world.set_phase(GamePhase::Running);
        speed::on_score_changed(world);
    }

    scheduler::tick(world, dt);
    hazards::tick(world, dt);
    collision::resolve(world);
}

fn move_entities(world: &mut World, dt: f32) {
    for obstacle in world.obstacles.iter_mut().filter(|o| o.active) {
        obstacle.pos += obstacle.vel * dt;
    }
    for coin in world.coins.iter_mut() {
        coin.pos += coin.vel * dt;
    }
    for hazard in world.hazards.iter_mut().filter(|h| h.active) {
        hazard.pos += hazard.vel * dt;
        hazard.ttl -= dt;
    }
}

/// Drop entities that left the screen or expired, reporting each removal
fn prune_entities(world: &mut World) {
    let cleanup_x = world.tuning.world.cleanup_x;
    let height = world.tuning.world.height;
    let events = &mut world.events;

    retain_reporting(
        &mut world.obstacles,
        events,
        |o| o.active && o.rect().max.x >= cleanup_x,
        |o| o.id,
    );
    retain_reporting(
        &mut world.coins,
        events,
        |c| !c.collected && c.rect().max.x >= cleanup_x,
        |c| c.id,
    );
    retain_reporting(
        &mut world.hazards,
        events,
        |h| {
            let r = h.rect();
            h.active && h.ttl > 0.0 && r.max.x >= cleanup_x && r.max.y >= -height && r.min.y <= height * 2.0
        },
        |h| h.id,
    );
}

fn retain_reporting<T>(
    items: &mut Vec<T>,
    events: &mut Vec<GameEvent>,
    keep: impl Fn(&T) -> bool,
    id: impl Fn(&T) -> u32,
) {
    items.retain(|item| {
        let kept = keep(item);
        if !kept {
            events.push(GameEvent::Despawned { id: id(item) });
        }
        kept
    });
}
