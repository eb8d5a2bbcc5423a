//! Weighted discrete choice
//!
//! Archetype and coin-pattern selection both go through `WeightedTable` so
//! the odds live in data instead of in cumulative-subtraction loops.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// A fixed set of choices with relative weights
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    items: Vec<T>,
    /// `None` when the weights are unusable (all zero, negative, NaN); draws are uniform then
    dist: Option<WeightedIndex<f32>>,
}

impl<T: Copy> WeightedTable<T> {
    /// Build a table. `entries` must not be empty.
    pub fn new(entries: impl IntoIterator<Item = (T, f32)>) -> Self {
        let (items, weights): (Vec<T>, Vec<f32>) = entries.into_iter().unzip();
        debug_assert!(!items.is_empty(), "weighted table needs at least one entry");
        let dist = WeightedIndex::new(weights).ok();
        if dist.is_none() {
            log::warn!("Unusable weights for {} choices, falling back to uniform", items.len());
        }
        Self { items, dist }
    }

    /// Every entry equally likely
    pub fn uniform(items: impl IntoIterator<Item = T>) -> Self {
        Self::new(items.into_iter().map(|item| (item, 1.0)))
    }

    /// Draw one entry
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let idx = match &self.dist {
            Some(dist) => dist.sample(rng),
            None => rng.random_range(0..self.items.len()),
        };
        self.items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_zero_weight_never_drawn() {
        let table = WeightedTable::new([('a', 1.0), ('b', 0.0), ('c', 2.0)]);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2000 {
            assert_ne!(table.sample(&mut rng), 'b');
        }
    }

    #[test]
    fn test_weights_shape_frequencies() {
        let table = WeightedTable::new([(0usize, 1.0), (1, 1.0), (2, 1.0), (3, 0.8)]);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 4];
        let n = 38_000;
        for _ in 0..n {
            counts[table.sample(&mut rng)] += 1;
        }
        // Expected shares: 1/3.8 each for the first three, 0.8/3.8 for the last
        let share = |c: u32| c as f32 / n as f32;
        for &c in &counts[..3] {
            assert!((share(c) - 1.0 / 3.8).abs() < 0.02);
        }
        assert!((share(counts[3]) - 0.8 / 3.8).abs() < 0.02);
    }

    #[test]
    fn test_all_zero_falls_back_to_uniform() {
        let table = WeightedTable::new([(1u8, 0.0), (2u8, 0.0)]);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[table.sample(&mut rng) as usize] = true;
        }
        assert!(seen[1] && seen[2]);
    }
}
