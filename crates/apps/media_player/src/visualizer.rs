//! Cosmetic bar visualizer. Bar heights are random; no audio analysis is involved.

use rand::{rngs::SmallRng, Rng, SeedableRng};

pub const BAR_COUNT: usize = 16;
pub const MIN_BAR_PERCENT: u8 = 10;
pub const MAX_BAR_PERCENT: u8 = 100;
pub const RESTING_BAR_PERCENT: u8 = 5;
/// Animation period while playing.
pub const VISUALIZER_PERIOD_MS: u32 = 100;

pub struct Visualizer {
    bars: Vec<u8>,
    rng: SmallRng,
}

impl Visualizer {
    pub fn new(seed: u64) -> Self {
        Self {
            bars: vec![RESTING_BAR_PERCENT; BAR_COUNT],
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Bar heights in percent.
    pub fn bars(&self) -> &[u8] {
        &self.bars
    }

    /// Assigns every bar a fresh height in `MIN_BAR_PERCENT..=MAX_BAR_PERCENT`.
    pub fn animate(&mut self) {
        for bar in &mut self.bars {
            *bar = self.rng.gen_range(MIN_BAR_PERCENT..=MAX_BAR_PERCENT);
        }
    }

    pub fn rest(&mut self) {
        self.bars.fill(RESTING_BAR_PERCENT);
    }

    pub fn is_resting(&self) -> bool {
        self.bars.iter().all(|bar| *bar == RESTING_BAR_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animated_bars_stay_within_range_and_rest_resets_them() {
        let mut visualizer = Visualizer::new(42);
        assert!(visualizer.is_resting());

        for _ in 0..50 {
            visualizer.animate();
            assert!(visualizer
                .bars()
                .iter()
                .all(|bar| (MIN_BAR_PERCENT..=MAX_BAR_PERCENT).contains(bar)));
        }
        assert!(!visualizer.is_resting());

        visualizer.rest();
        assert_eq!(visualizer.bars(), &[RESTING_BAR_PERCENT; BAR_COUNT]);
    }
}
