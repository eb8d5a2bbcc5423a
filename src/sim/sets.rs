//! Obstacle set generator
//!
//! One call places one formation just past the right edge of the screen.
//! Archetype choice is a memoryless weighted draw; only the two-layer
//! archetype leaves state behind (the tail pad).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::band::band_for_gate;
use super::coins::{self, GapPattern};
use super::state::{ObstacleKind, World};

/// Formation archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    StairsUp,
    TwoLayer,
    StairsDown,
    PillarGate,
}

/// Draw an archetype and build it at `spawn_x`
pub fn spawn_random_set(world: &mut World, spawn_x: f32) -> Archetype {
    let archetype = world.tables.archetypes.sample(&mut world.rng);
    spawn_set(world, archetype, spawn_x);
    archetype
}

/// Build a specific archetype at `spawn_x`
pub fn spawn_set(world: &mut World, archetype: Archetype, spawn_x: f32) {
    let formation = world.next_formation_id();
    match archetype {
        Archetype::StairsUp => spawn_stairs(world, spawn_x, true, formation),
        Archetype::TwoLayer => spawn_two_layer(world, spawn_x, formation),
        Archetype::StairsDown => spawn_stairs(world, spawn_x, false, formation),
        Archetype::PillarGate => spawn_pillar_gate(world, spawn_x, formation),
    }
    log::debug!(
        "Set #{} {:?} at x={:.0} (t={:.2}s)",
        formation,
        archetype,
        spawn_x,
        world.elapsed
    );
    world.scheduler.last_archetype = Some(archetype);
    world.scheduler.last_set_at = Some(world.elapsed);
}

/// Three floor-anchored platforms, each with a coin arc above it
fn spawn_stairs(world: &mut World, base_x: f32, ascending: bool, formation: u32) {
    let sets = world.tuning.sets.clone();
    let coin_scale = world.tuning.coins.arc_scale;
    let ph = sets.platform_size.y;
    let bottom_y = world.tuning.world.height - ph / 2.0;
    let step_y = sets.stair_step_y.sample(&mut world.rng);

    let arc = coins::arc_points(sets.stair_coins, sets.stair_coin_spacing, sets.stair_coin_amp, ascending);
    for i in 0..3 {
        let level = if ascending { i } else { 2 - i };
        let rise = level as f32 * step_y;
        let pos = Vec2::new(base_x + i as f32 * sets.stair_step_x, bottom_y - rise).round();
        world.spawn_obstacle(ObstacleKind::Platform, pos, sets.platform_size, formation);

        let top = pos.y - ph / 2.0;
        world.spawn_coin_points(Vec2::new(pos.x, top - sets.stair_coin_rise), &arc, coin_scale);
    }
}

/// Symmetric platform pair, a center platform further ahead with a coin grid
/// beneath it, and a decorative pattern in the pair's opening
fn spawn_two_layer(world: &mut World, base_x: f32, formation: u32) {
    let sets = world.tuning.sets.clone();
    let coin_tuning = world.tuning.coins.clone();
    let h = world.tuning.world.height;

    let jitter = if sets.two_layer_jitter > 0.0 {
        world.rng_range(-sets.two_layer_jitter, sets.two_layer_jitter)
    } else {
        0.0
    };
    let center_y = (h / 2.0).round() + jitter;
    let gap = sets.two_layer_gap.sample(&mut world.rng);

    let top = Vec2::new(base_x, center_y - gap / 2.0);
    let bottom = Vec2::new(base_x, center_y + gap / 2.0);
    world.spawn_obstacle(ObstacleKind::Platform, top, sets.platform_size, formation);
    world.spawn_obstacle(ObstacleKind::Platform, bottom, sets.platform_size, formation);

    let center_x = base_x + sets.two_layer_center_offset.sample(&mut world.rng);
    let mid = Vec2::new(center_x, center_y);
    world.spawn_obstacle(ObstacleKind::Platform, mid, sets.platform_size, formation);

    let grid_origin = Vec2::new(mid.x, mid.y + sets.platform_size.y / 2.0 + sets.grid_y_pad);
    let grid = coins::grid_points(sets.grid_cols, sets.grid_rows, sets.grid_spacing);
    world.spawn_coin_points(grid_origin, &grid, coin_tuning.grid_scale);

    let opening = (top + bottom) * 0.5;
    spawn_set_pattern(world, opening);

    let mut tail_pad = sets.two_layer_tail_pad;
    if world.scheduler.last_archetype == Some(Archetype::TwoLayer) {
        tail_pad += sets.two_layer_chain_tail_pad;
    }
    world.scheduler.pending_tail_pad = tail_pad;
}

/// Floor pillar and ceiling pillar with a passage between them
fn spawn_pillar_gate(world: &mut World, base_x: f32, formation: u32) {
    let sets = world.tuning.sets.clone();
    let h = world.tuning.world.height;

    let margin = sets.pillar_passage_margin.min(h / 2.0);
    let passage_y = world.rng_range(margin, h - margin);
    let gap = (sets.pillar_gap_base + sets.pillar_gap_jitter.sample(&mut world.rng)).max(0.0);
    let gate_top = (passage_y - gap / 2.0).max(0.0);
    let gate_bottom = (passage_y + gap / 2.0).min(h);

    let x_floor = base_x;
    let x_ceiling = base_x + sets.pillar_offset_x.sample(&mut world.rng);

    let floor_h = h - gate_bottom;
    let floor_id = world.spawn_obstacle(
        ObstacleKind::PillarBottom,
        Vec2::new(x_floor, h - floor_h / 2.0),
        Vec2::new(sets.pillar_width, floor_h),
        formation,
    );
    let ceiling_id = world.spawn_obstacle(
        ObstacleKind::PillarTop,
        Vec2::new(x_ceiling, gate_top / 2.0),
        Vec2::new(sets.pillar_width, gate_top),
        formation,
    );

    let top = world.obstacles.iter().find(|o| o.id == ceiling_id);
    let bottom = world.obstacles.iter().find(|o| o.id == floor_id);
    if let (Some(top), Some(bottom)) = (top, bottom) {
        let band = band_for_gate(top, bottom, world);
        log::debug!(
            "Gate passage [{:.0}, {:.0}] -> forbidden band [{:.0}, {:.0}]",
            gate_top,
            gate_bottom,
            band.y_min,
            band.y_max
        );
        world.band.set(band, ceiling_id, floor_id);
    }

    spawn_set_pattern(world, Vec2::new((x_floor + x_ceiling) / 2.0, passage_y));
}

/// Random decorative pattern inside a set's opening
fn spawn_set_pattern(world: &mut World, center: Vec2) {
    let pattern = world.tables.set_patterns.sample(&mut world.rng);
    spawn_pattern(world, pattern, center);
}

/// Instantiate a gap pattern as coins around `center`
pub fn spawn_pattern(world: &mut World, pattern: GapPattern, center: Vec2) {
    let scale = world.tuning.coins.pattern_scale;
    world.spawn_coin_points(center, &pattern.points(), scale);
}
