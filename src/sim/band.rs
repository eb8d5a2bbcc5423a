//! Forbidden band: the safe passage through a pillar gate
//!
//! Hazards must not end their flight inside the passage of the most recent
//! gate, otherwise a gate plus a hazard can leave no way through.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, World};

/// Vertical interval, always `y_min <= y_max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenBand {
    pub y_min: f32,
    pub y_max: f32,
}

impl ForbiddenBand {
    #[inline]
    pub fn mid(&self) -> f32 {
        (self.y_min + self.y_max) * 0.5
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Grow the band by `pad` on both sides
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            y_min: self.y_min - pad,
            y_max: self.y_max + pad,
        }
    }

    /// Does the vertical segment between `y0` and `y1` touch the band?
    pub fn intersects_segment(&self, y0: f32, y1: f32) -> bool {
        let lo = y0.min(y1);
        let hi = y0.max(y1);
        lo <= self.y_max && hi >= self.y_min
    }

    pub fn contains(&self, y: f32) -> bool {
        (self.y_min..=self.y_max).contains(&y)
    }
}

/// Band from the gate edges: `gate_top` is the bottom edge of the ceiling pillar,
/// `gate_bottom` the top edge of the floor pillar.
///
/// Padding that would invert the band is reduced so the band keeps
/// `min_height`; anchors that overlap collapse to `mid ± collapse_half_width`.
pub fn compute_band(
    gate_top: f32,
    gate_bottom: f32,
    pad: f32,
    min_height: f32,
    collapse_half_width: f32,
) -> ForbiddenBand {
    let pad = pad.max(0.0);
    let band = ForbiddenBand {
        y_min: gate_top + pad,
        y_max: gate_bottom - pad,
    };
    if band.y_min <= band.y_max {
        return band;
    }

    let gap = gate_bottom - gate_top;
    let shrunk_pad = ((gap - min_height) * 0.5).clamp(0.0, pad);
    let band = ForbiddenBand {
        y_min: gate_top + shrunk_pad,
        y_max: gate_bottom - shrunk_pad,
    };
    if band.y_min <= band.y_max {
        return band;
    }

    let mid = (gate_top + gate_bottom) * 0.5;
    let half = collapse_half_width.abs();
    ForbiddenBand {
        y_min: mid - half,
        y_max: mid + half,
    }
}

/// Band computed from the visible edges of a gate's two pillars
pub fn band_for_gate(top: &Obstacle, bottom: &Obstacle, world: &World) -> ForbiddenBand {
    let t = &world.tuning.band;
    compute_band(
        top.rect().bottom(),
        bottom.rect().top(),
        t.pad,
        t.min_height,
        t.collapse_half_width,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct AnchoredBand {
    band: ForbiddenBand,
    top_id: u32,
    bottom_id: u32,
}

/// Holds the band of the most recent gate while both its pillars are alive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenBandTracker {
    current: Option<AnchoredBand>,
}

impl ForbiddenBandTracker {
    /// Record a new gate, replacing any previous band
    pub fn set(&mut self, band: ForbiddenBand, top_id: u32, bottom_id: u32) {
        self.current = Some(AnchoredBand {
            band,
            top_id,
            bottom_id,
        });
    }

    /// Stored band without anchor checks
    pub fn peek(&self) -> Option<ForbiddenBand> {
        self.current.map(|a| a.band)
    }

    /// Drop the band if either anchor is gone or inactive; returns the live band
    pub fn validate(&mut self, obstacles: &[Obstacle]) -> Option<ForbiddenBand> {
        let anchored = self.current?;
        let alive = |id: u32| obstacles.iter().any(|o| o.id == id && o.active);
        if alive(anchored.top_id) && alive(anchored.bottom_id) {
            Some(anchored.band)
        } else {
            log::debug!(
                "Forbidden band [{:.0}, {:.0}] released (anchor gone)",
                anchored.band.y_min,
                anchored.band.y_max
            );
            self.current = None;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_padding() {
        let band = compute_band(100.0, 300.0, 20.0, 40.0, 12.0);
        assert_eq!(band, ForbiddenBand { y_min: 120.0, y_max: 280.0 });
    }

    #[test]
    fn test_inverted_padding_collapses_around_mid() {
        // 100 + 170 = 270 > 400 - 170 = 230
        let band = compute_band(100.0, 400.0, 170.0, 40.0, 12.0);
        assert!(band.y_min <= band.y_max);
        assert!((band.mid() - 250.0).abs() < 1e-4);
        assert!((band.height() - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_overlapping_anchors_collapse_to_thin_band() {
        let band = compute_band(260.0, 240.0, 10.0, 40.0, 12.0);
        assert_eq!(band, ForbiddenBand { y_min: 238.0, y_max: 262.0 });
    }

    #[test]
    fn test_gap_smaller_than_min_height() {
        let band = compute_band(200.0, 220.0, 30.0, 40.0, 12.0);
        assert_eq!(band, ForbiddenBand { y_min: 200.0, y_max: 220.0 });
    }

    #[test]
    fn test_segment_intersection() {
        let band = ForbiddenBand { y_min: 300.0, y_max: 340.0 };
        assert!(band.intersects_segment(200.0, 320.0));
        assert!(band.intersects_segment(400.0, 200.0));
        assert!(!band.intersects_segment(200.0, 299.0));
        assert!(!band.intersects_segment(341.0, 420.0));
    }

    #[test]
    fn test_tracker_invalidates_on_missing_anchor() {
        use crate::sim::state::{Obstacle, ObstacleKind};
        use glam::Vec2;

        let pillar = |id, kind| Obstacle {
            id,
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::ONE,
            shrink: Vec2::ONE,
            formation: 1,
            active: true,
        };
        let mut obstacles = vec![pillar(1, ObstacleKind::PillarTop), pillar(2, ObstacleKind::PillarBottom)];
        let mut tracker = ForbiddenBandTracker::default();
        let band = ForbiddenBand { y_min: 10.0, y_max: 20.0 };
        tracker.set(band, 1, 2);
        assert_eq!(tracker.validate(&obstacles), Some(band));

        obstacles[1].active = false;
        assert_eq!(tracker.validate(&obstacles), None);
        assert_eq!(tracker.peek(), None);

        tracker.set(band, 1, 2);
        obstacles.retain(|o| o.id != 1);
        assert_eq!(tracker.validate(&obstacles), None);
    }

    proptest! {
        #[test]
        fn prop_band_never_inverted(
            top in -500.0f32..1000.0,
            bottom in -500.0f32..1000.0,
            pad in 0.0f32..400.0,
            min_height in 0.0f32..200.0,
            half in 0.0f32..50.0,
        ) {
            let band = compute_band(top, bottom, pad, min_height, half);
            prop_assert!(band.y_min <= band.y_max);
        }
    }
}
