//! World state and core simulation types
//!
//! Everything a run mutates lives in `World`; component modules take it by
//! `&mut` and nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::band::ForbiddenBandTracker;
use super::coins::{self, GapPattern};
use super::rect::Rect;
use super::sampler::WeightedTable;
use super::sets::Archetype;
use crate::tuning::{Span, SpeedTuning, Tuning};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Intro banner on screen; nothing spawns
    Intro,
    /// Active gameplay
    Running,
    /// Run ended (terminal until restart)
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Obstacle,
    Hazard,
    FellOff,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Platform,
    /// Hangs from the ceiling
    PillarTop,
    /// Stands on the floor
    PillarBottom,
}

/// Entity categories reported to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Hazard,
    Coin,
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned {
        id: u32,
        kind: EntityKind,
        pos: Vec2,
        size: Vec2,
        shrink: Vec2,
        circular: bool,
    },
    Despawned {
        id: u32,
    },
    ScoreChanged {
        score: u64,
    },
    CoinsChanged {
        coins: u32,
    },
    PhaseChanged {
        phase: GamePhase,
    },
    GameOver {
        score: u64,
        coins: u32,
        cause: GameOverCause,
    },
}

/// The flying character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (negative = up)
    pub vy: f32,
    /// Hold ramp in [0, 1]
    pub ramp: f32,
    pub alive: bool,
    /// Latched input level
    pub pressing: bool,
    /// Press-begin seen since the last flight step
    pub tap_pending: bool,
    pub size: Vec2,
    pub shrink: Vec2,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.world.player_x, tuning.world.height / 2.0),
            vy: 0.0,
            ramp: 0.0,
            alive: true,
            pressing: false,
            tap_pending: false,
            size: Vec2::splat(tuning.collision.player_size),
            shrink: Vec2::splat(tuning.collision.player_shrink),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// A scroll-bound obstacle (platform or pillar)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Center of the visible sprite
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub shrink: Vec2,
    /// Set this obstacle was spawned with
    pub formation: u32,
    pub active: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// A fast obstacle with its own launch velocity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub shrink: Vec2,
    /// Seconds left before self-destruct
    pub ttl: f32,
    pub active: bool,
}

impl Hazard {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub shrink: Vec2,
    pub collected: bool,
}

impl Coin {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// Scroll speed bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedState {
    pub current: f32,
    pub target: f32,
    pub baseline: f32,
    /// Accumulated periodic bonus (px/s)
    pub time_bonus: f32,
    /// Seconds until the next periodic bonus
    pub bonus_timer: f32,
    pub max: f32,
    /// Speed last written into obstacle/coin velocities
    pub last_applied: Option<f32>,
}

impl SpeedState {
    /// Initial state: launched slow, aiming for the intro boost
    pub fn new(t: &SpeedTuning) -> Self {
        Self {
            current: t.intro_min_speed.max(t.baseline * t.intro_start_ratio),
            target: t.intro_boost_speed,
            baseline: t.baseline,
            time_bonus: 0.0,
            bonus_timer: t.bonus_interval,
            max: t.max,
            last_applied: None,
        }
    }
}

/// Distance-based set scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Pixels scrolled since the last set
    pub distance_since_last_set: f32,
    pub next_set_distance: f32,
    /// Extra spacing owed to the next interval
    pub pending_tail_pad: f32,
    pub gap_coin_spawned: bool,
    pub gap_coin_distance: f32,
    pub last_archetype: Option<Archetype>,
    /// World time of the last set spawn (seconds)
    pub last_set_at: Option<f32>,
}

/// Hazard spawn countdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardTimer {
    /// Seconds until the next periodic `on_timer`
    pub countdown: f32,
    /// One-shot retry of a deferred timer firing
    pub retry: Option<f32>,
    /// Seconds until the second hazard of a double pair
    pub pending_double: Option<f32>,
}

/// Intro coin banner placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntroBanner {
    pub start_x: f32,
    pub width: f32,
}

/// Random choice tables built from tuning
#[derive(Debug, Clone)]
pub struct ChoiceTables {
    pub archetypes: WeightedTable<Archetype>,
    /// Patterns dropped between sets
    pub gap_patterns: WeightedTable<GapPattern>,
    /// Patterns placed inside a set's opening
    pub set_patterns: WeightedTable<GapPattern>,
}

impl ChoiceTables {
    pub fn new(tuning: &Tuning) -> Self {
        let w = &tuning.sets.weights;
        Self {
            archetypes: WeightedTable::new([
                (Archetype::StairsUp, w.stairs_up),
                (Archetype::TwoLayer, w.two_layer),
                (Archetype::StairsDown, w.stairs_down),
                (Archetype::PillarGate, w.pillar_gate),
            ]),
            gap_patterns: WeightedTable::uniform(coins::GAP_PATTERNS),
            set_patterns: WeightedTable::uniform(coins::SET_PATTERNS),
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Seconds of simulated time
    pub elapsed: f32,
    pub score: u64,
    pub coin_count: u32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub hazards: Vec<Hazard>,
    pub coins: Vec<Coin>,
    pub speed: SpeedState,
    pub scheduler: SchedulerState,
    pub hazard_timer: HazardTimer,
    pub band: ForbiddenBandTracker,
    pub intro: IntroBanner,
    pub tables: ChoiceTables,
    /// Outgoing notifications (see `drain_events`)
    pub events: Vec<GameEvent>,
    next_id: u32,
    next_formation: u32,
}

impl World {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let scheduler = super::scheduler::initial_state(&tuning, &mut rng);
        let mut world = Self {
            seed,
            rng,
            phase: GamePhase::Intro,
            elapsed: 0.0,
            score: 0,
            coin_count: 0,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            hazards: Vec::new(),
            coins: Vec::new(),
            speed: SpeedState::new(&tuning.speed),
            scheduler,
            hazard_timer: HazardTimer {
                countdown: tuning.hazards.period,
                retry: None,
                pending_double: None,
            },
            band: ForbiddenBandTracker::default(),
            intro: IntroBanner {
                start_x: tuning.world.width + tuning.intro.start_offset_x,
                width: 0.0,
            },
            tables: ChoiceTables::new(&tuning),
            tuning,
            events: Vec::new(),
            next_id: 1,
            next_formation: 1,
        };

        world.spawn_intro_banner();
        world
    }

    /// Rebuild this run from its seed and tuning.
    ///
    /// Events the host has not drained yet are kept and stay ahead of the new
    /// run's spawn events.
    pub fn restart(&mut self) {
        log::info!("Restarting run (seed {})", self.seed);
        let tuning = std::mem::take(&mut self.tuning);
        let mut events = std::mem::take(&mut self.events);
        *self = Self::new(self.seed, tuning);
        events.append(&mut self.events);
        self.events = events;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate a new formation ID
    pub fn next_formation_id(&mut self) -> u32 {
        let id = self.next_formation;
        self.next_formation += 1;
        id
    }

    /// Uniform draw from `[min, max]` on the run's RNG
    pub fn rng_range(&mut self, min: f32, max: f32) -> f32 {
        Span::new(min, max).sample(&mut self.rng)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} at t={:.2}s", self.phase, phase, self.elapsed);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged { phase });
        }
    }

    /// Spawn an obstacle centered at `pos`
    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, pos: Vec2, size: Vec2, formation: u32) -> u32 {
        let id = self.next_entity_id();
        let shrink = Vec2::splat(self.tuning.collision.obstacle_shrink);
        self.obstacles.push(Obstacle {
            id,
            kind,
            pos,
            vel: Vec2::new(-self.speed.current, 0.0),
            size,
            shrink,
            formation,
            active: true,
        });
        self.events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::Obstacle(kind),
            pos,
            size,
            shrink,
            circular: false,
        });
        id
    }

    /// Spawn a coin at `pos` with the given sprite scale
    pub fn spawn_coin(&mut self, pos: Vec2, scale: f32) -> u32 {
        let id = self.next_entity_id();
        let size = Vec2::splat(self.tuning.coins.texture_size * scale);
        let shrink = Vec2::splat(self.tuning.collision.coin_shrink);
        let pos = pos.round();
        self.coins.push(Coin {
            id,
            pos,
            vel: Vec2::new(-self.speed.current, 0.0),
            size,
            shrink,
            collected: false,
        });
        self.events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::Coin,
            pos,
            size,
            shrink,
            circular: true,
        });
        id
    }

    /// Instantiate a point set as coins at `center + offset`
    pub fn spawn_coin_points(&mut self, center: Vec2, offsets: &[Vec2], scale: f32) {
        for &offset in offsets {
            self.spawn_coin(center + offset, scale);
        }
    }

    /// Spawn a hazard with its launch velocity
    pub fn spawn_hazard(&mut self, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        let size = Vec2::splat(self.tuning.hazards.size);
        let shrink = Vec2::splat(self.tuning.collision.hazard_shrink);
        self.hazards.push(Hazard {
            id,
            pos,
            vel,
            size,
            shrink,
            ttl: self.tuning.hazards.lifetime,
            active: true,
        });
        self.events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::Hazard,
            pos,
            size,
            shrink,
            circular: false,
        });
        id
    }

    /// Lay out the intro text as coins and remember its width
    fn spawn_intro_banner(&mut self) {
        let intro = self.tuning.intro.clone();
        let origin = Vec2::new(self.intro.start_x, (self.tuning.world.height * intro.y_frac).round());
        let layout = coins::text_points(&intro.text, intro.cell, intro.kern);
        self.spawn_coin_points(origin, &layout.points, intro.coin_scale);
        self.intro.width = layout.width;
        log::debug!(
            "Intro banner {:?}: {} coins, {:.0}px wide",
            intro.text,
            layout.points.len(),
            layout.width
        );
    }

    /// Add score, notify, and retarget speed
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.events.push(GameEvent::ScoreChanged { score: self.score });
        super::speed::on_score_changed(self);
    }

    /// Enter GameOver; later calls are ignored
    pub fn trigger_game_over(&mut self, cause: GameOverCause) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.player.alive = false;
        self.set_phase(GamePhase::GameOver);
        log::info!(
            "Game over ({:?}): score {}, coins {}, t={:.2}s",
            cause,
            self.score,
            self.coin_count,
            self.elapsed
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            coins: self.coin_count,
            cause,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_starts_in_intro_with_banner() {
        let world = World::new(1, Tuning::default());
        assert_eq!(world.phase, GamePhase::Intro);
        assert!(!world.coins.is_empty());
        assert!(world.intro.width > 0.0);
        assert!(world.obstacles.is_empty());
        assert!(world.hazards.is_empty());
        // Banner starts off-screen right
        assert!(world.coins.iter().all(|c| c.pos.x >= world.tuning.world.width));
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut world = World::new(1, Tuning::default());
        world.drain_events();
        assert!(world.trigger_game_over(GameOverCause::Hazard));
        assert!(!world.trigger_game_over(GameOverCause::Obstacle));
        let overs = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(!world.player.alive);
    }

    #[test]
    fn test_restart_keeps_undrained_events_first() {
        let mut world = World::new(4, Tuning::default());
        world.drain_events();
        world.trigger_game_over(GameOverCause::FellOff);
        world.restart();

        let events = world.drain_events();
        assert_eq!(events[0], GameEvent::PhaseChanged { phase: GamePhase::GameOver });
        assert!(matches!(
            events[1],
            GameEvent::GameOver { cause: GameOverCause::FellOff, .. }
        ));
        let fresh = World::new(4, Tuning::default());
        assert_eq!(&events[2..], fresh.events.as_slice());
        assert_eq!(world.phase, GamePhase::Intro);
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut world = World::new(3, Tuning::default());
        let a = world.spawn_hazard(Vec2::ZERO, Vec2::ZERO);
        let b = world.spawn_coin(Vec2::ZERO, 1.0);
        assert_ne!(a, b);
        assert!(world.coins.iter().filter(|c| c.id == b).count() == 1);
    }
}
