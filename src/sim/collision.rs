//! Collision resolution against the player
//!
//! Sprites carry transparent margins, so every test runs on the visible
//! rectangles shrunk toward their centers rather than the raw boxes.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Coin, GameEvent, GameOverCause, Hazard, Obstacle, Player, World};

/// Anything the player can touch
pub trait Collider {
    fn bounds(&self) -> Rect;
    fn shrink(&self) -> Vec2;
    fn is_active(&self) -> bool;
}

impl Collider for Obstacle {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn shrink(&self) -> Vec2 {
        self.shrink
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collider for Hazard {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn shrink(&self) -> Vec2 {
        self.shrink
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collider for Coin {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn shrink(&self) -> Vec2 {
        self.shrink
    }

    fn is_active(&self) -> bool {
        !self.collected
    }
}

/// Shrunk-rectangle overlap between the player and an entity.
/// Inactive entities and a dead player never overlap.
pub fn overlap<C: Collider + ?Sized>(player: &Player, entity: &C) -> bool {
    if !player.alive || !entity.is_active() {
        return false;
    }
    let a = player.rect().shrunk(player.shrink);
    let b = entity.bounds().shrunk(entity.shrink());
    a.intersects(&b)
}

/// What a collision pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub fatal: Option<GameOverCause>,
    pub coins_collected: u32,
}

/// Run all player checks for this tick.
///
/// Fatal contacts are checked first; a dead player collects nothing.
pub fn resolve(world: &mut World) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !world.player.alive {
        return report;
    }

    let player = &world.player;
    if world.obstacles.iter().any(|o| overlap(player, o)) {
        report.fatal = Some(GameOverCause::Obstacle);
    } else if world.hazards.iter().any(|h| overlap(player, h)) {
        report.fatal = Some(GameOverCause::Hazard);
    }
    if let Some(cause) = report.fatal {
        world.trigger_game_over(cause);
        return report;
    }

    let mut collected = Vec::new();
    for coin in world.coins.iter_mut() {
        if overlap(&world.player, coin) {
            coin.collected = true;
            collected.push(coin.id);
        }
    }
    if collected.is_empty() {
        return report;
    }

    world.coins.retain(|c| !c.collected);
    let points = world.tuning.collision.coin_score;
    for id in collected {
        world.coin_count += 1;
        world.events.push(GameEvent::Despawned { id });
        world.events.push(GameEvent::CoinsChanged {
            coins: world.coin_count,
        });
        world.add_score(points);
        report.coins_collected += 1;
    }
    log::trace!(
        "Collected {} coin(s): score {}, coins {}",
        report.coins_collected,
        world.score,
        world.coin_count
    );
    report
}
