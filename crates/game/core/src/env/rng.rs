//! RNG oracle and roll sources for deterministic randomness.
//!
//! The engine never touches a global RNG. Every random decision is a named
//! draw from a [`RollSource`]:
//!
//! - [`SeededRolls`] derives each draw from a game seed and a draw counter
//!   through an [`RngOracle`], so a battle replays identically from its seed.
//! - Tests substitute scripted sources to force hits, misses and crits.
//!
//! # Determinism
//!
//! All RNG implementations must be deterministic: given the same seed,
//! they must produce the same sequence of random numbers.

use std::collections::{HashMap, VecDeque};

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)` derived from a seed.
    fn next_unit(&self, seed: u64) -> f32 {
        // 24 bits keep the result strictly below 1.0 in f32
        (self.next_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses PCG-XSH-RR, which produces 32-bit output from 64-bit state.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a deterministic seed for one draw.
///
/// # Arguments
///
/// * `game_seed` - Base seed set at battle start (for replay/determinism)
/// * `draw` - Monotonic draw counter of the battle
/// * `context` - What the draw is for (see [`RollPurpose::context`])
pub fn compute_seed(game_seed: u64, draw: u64, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing constants
    let mut hash = game_seed;
    hash ^= draw.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x517cc1b727220a95);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// What a random draw decides. Keeps seeded streams stable per purpose and
/// lets scripted sources answer by purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum RollPurpose {
    SelfKnockout,
    Accuracy,
    Critical,
    EnemyCount,
    EnemyArchetype,
    UpgradeRarity,
    UpgradePick,
}

impl RollPurpose {
    pub const fn context(self) -> u32 {
        match self {
            Self::SelfKnockout => 1,
            Self::Accuracy => 2,
            Self::Critical => 3,
            Self::EnemyCount => 10,
            Self::EnemyArchetype => 11,
            Self::UpgradeRarity => 20,
            Self::UpgradePick => 21,
        }
    }
}

/// Source of every random decision the engine makes.
pub trait RollSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self, purpose: RollPurpose) -> f32;

    /// Uniform integer in `[min, max]` inclusive.
    fn range(&mut self, purpose: RollPurpose, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as f32;
        let offset = (self.unit(purpose) * span) as u32;
        min + offset.min(max - min)
    }

    /// Uniform index into a collection of `len` items (`len > 0`).
    fn index(&mut self, purpose: RollPurpose, len: usize) -> usize {
        debug_assert!(len > 0, "index roll over an empty collection");
        self.range(purpose, 0, len.saturating_sub(1) as u32) as usize
    }
}

/// Seeded, replayable roll stream.
///
/// Owned by whoever owns the battle; the draw counter persists across calls so
/// the whole battle is one deterministic sequence.
#[derive(Clone, Debug)]
pub struct SeededRolls<R: RngOracle = PcgRng> {
    rng: R,
    game_seed: u64,
    draws: u64,
}

impl SeededRolls<PcgRng> {
    pub fn new(game_seed: u64) -> Self {
        Self::with_oracle(PcgRng, game_seed)
    }
}

impl<R: RngOracle> SeededRolls<R> {
    pub fn with_oracle(rng: R, game_seed: u64) -> Self {
        Self {
            rng,
            game_seed,
            draws: 0,
        }
    }

    pub fn game_seed(&self) -> u64 {
        self.game_seed
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn next_seed(&mut self, purpose: RollPurpose) -> u64 {
        let seed = compute_seed(self.game_seed, self.draws, purpose.context());
        self.draws += 1;
        seed
    }
}

impl<R: RngOracle> RollSource for SeededRolls<R> {
    fn unit(&mut self, purpose: RollPurpose) -> f32 {
        let seed = self.next_seed(purpose);
        self.rng.next_unit(seed)
    }

    fn range(&mut self, purpose: RollPurpose, min: u32, max: u32) -> u32 {
        let seed = self.next_seed(purpose);
        self.rng.range(seed, min, max)
    }
}

/// Roll source replaying fixed draws per purpose.
///
/// Purposes without queued draws return the fallback value.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRolls {
    queues: HashMap<RollPurpose, VecDeque<f32>>,
    fallback: f32,
}

impl ScriptedRolls {
    pub fn new(fallback: f32) -> Self {
        Self {
            queues: HashMap::new(),
            fallback,
        }
    }

    #[must_use]
    pub fn with(mut self, purpose: RollPurpose, draws: impl IntoIterator<Item = f32>) -> Self {
        self.queues.entry(purpose).or_default().extend(draws);
        self
    }

    pub fn push(&mut self, purpose: RollPurpose, draw: f32) {
        self.queues.entry(purpose).or_default().push_back(draw);
    }

    /// Draws still queued for a purpose.
    pub fn pending(&self, purpose: RollPurpose) -> usize {
        self.queues.get(&purpose).map_or(0, VecDeque::len)
    }
}

impl RollSource for ScriptedRolls {
    fn unit(&mut self, purpose: RollPurpose) -> f32 {
        self.queues
            .get_mut(&purpose)
            .and_then(VecDeque::pop_front)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn unit_values_stay_below_one() {
        struct MaxRng;
        impl RngOracle for MaxRng {
            fn next_u32(&self, _seed: u64) -> u32 {
                u32::MAX
            }
        }
        let value = MaxRng.next_unit(0);
        assert!(value < 1.0);
        assert!(value > 0.99);
    }

    #[test]
    fn seeded_streams_replay_from_the_same_seed() {
        let mut a = SeededRolls::new(7);
        let mut b = SeededRolls::new(7);
        let draws_a: Vec<f32> = (0..16).map(|_| a.unit(RollPurpose::Accuracy)).collect();
        let draws_b: Vec<f32> = (0..16).map(|_| b.unit(RollPurpose::Accuracy)).collect();
        assert_eq!(draws_a, draws_b);
        assert_eq!(a.draws(), 16);

        let mut c = SeededRolls::new(8);
        let draws_c: Vec<f32> = (0..16).map(|_| c.unit(RollPurpose::Accuracy)).collect();
        assert_ne!(draws_a, draws_c);
    }

    #[test]
    fn ranges_are_inclusive_and_bounded() {
        let mut rolls = SeededRolls::new(99);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let value = rolls.range(RollPurpose::EnemyCount, 2, 4);
            assert!((2..=4).contains(&value));
            seen[(value - 2) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn default_range_maps_unit_draws_onto_the_span() {
        struct Fixed(f32);
        impl RollSource for Fixed {
            fn unit(&mut self, _purpose: RollPurpose) -> f32 {
                self.0
            }
        }
        assert_eq!(Fixed(0.0).range(RollPurpose::EnemyCount, 1, 2), 1);
        assert_eq!(Fixed(0.999).range(RollPurpose::EnemyCount, 1, 2), 2);
        assert_eq!(Fixed(0.5).index(RollPurpose::UpgradePick, 4), 2);
    }

    #[test]
    fn scripted_rolls_replay_per_purpose() {
        let mut rolls = ScriptedRolls::new(0.5)
            .with(RollPurpose::Accuracy, [0.1, 0.9])
            .with(RollPurpose::Critical, [0.0]);
        assert_eq!(rolls.unit(RollPurpose::Critical), 0.0);
        assert_eq!(rolls.unit(RollPurpose::Accuracy), 0.1);
        assert_eq!(rolls.unit(RollPurpose::Accuracy), 0.9);
        assert_eq!(rolls.unit(RollPurpose::Accuracy), 0.5);
        assert_eq!(rolls.pending(RollPurpose::Critical), 0);
    }
}
