//! RNG module - level-seeded block generation
//!
//! Tray blocks are drawn from a deterministic generator that is reseeded from the
//! level number whenever the level changes. The same level number and the same
//! sequence of draws therefore always yields the same tray contents.

use crate::types::{Block, BlockColor, BlockId, BlockShape};

/// Golden-ratio multiplier used to spread small level numbers across the seed space
const LEVEL_SEED_MULTIPLIER: u32 = 0x9E37_79B9;

/// Seed derived from a level number
pub fn level_seed(level: u32) -> u32 {
    level.max(1).wrapping_mul(LEVEL_SEED_MULTIPLIER)
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Level-gated block generator
///
/// Only the random stream lives here. The shape/color pool is picked by the
/// caller's level on every draw, so reseeding never changes what may appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGenerator {
    rng: SimpleRng,
}

impl BlockGenerator {
    /// Generator seeded deterministically from `level`
    pub fn for_level(level: u32) -> Self {
        Self {
            rng: SimpleRng::new(level_seed(level)),
        }
    }

    /// Resume from a previously captured RNG state
    pub fn from_state(state: u32) -> Self {
        Self {
            rng: SimpleRng::new(state),
        }
    }

    /// Restart the random stream from a level number
    pub fn reseed(&mut self, level: u32) {
        self.rng = SimpleRng::new(level_seed(level));
    }

    /// Current RNG state (for persistence)
    pub fn state(&self) -> u32 {
        self.rng.state()
    }

    pub fn next_shape(&mut self, level: u32) -> BlockShape {
        let n = BlockShape::available_for_level(level).count();
        let pick = self.rng.next_range(n as u32) as usize;
        BlockShape::available_for_level(level)
            .nth(pick)
            .unwrap_or(BlockShape::Single)
    }

    pub fn next_color(&mut self, level: u32) -> BlockColor {
        let n = BlockColor::available_for_level(level).count();
        let pick = self.rng.next_range(n as u32) as usize;
        BlockColor::available_for_level(level)
            .nth(pick)
            .unwrap_or(BlockColor::Red)
    }

    /// Draw a block from `level`'s pool; shape is drawn before color
    pub fn draw(&mut self, id: BlockId, level: u32) -> Block {
        let shape = self.next_shape(level);
        let color = self.next_color(level);
        Block::new(id, shape, color)
    }
}

impl Default for BlockGenerator {
    fn default() -> Self {
        Self::for_level(1)
    }
}
