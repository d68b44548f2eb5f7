// Deterministic, portable random source for counterpoint generation.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding,
// hand-rolled so that a seed printed by the CLI reproduces the same exercise
// on every platform and compiler version.
//
// The generator never touches the engine directly: the engine asks a
// `RandomSource` for bounded draws, and anything implementing the trait can
// stand in. `ExerciseRng` is the production source; `FixedSequence` replays a
// scripted list of draws so tests can pin every random decision (the first
// pitch, each interval permutation) without depending on generator output.
//
// `ExerciseRng` serializes its full state, so a session can be snapshotted
// and resumed mid-stream.
//
// **Critical constraint: determinism.** Every method must produce identical
// output given the same prior state. No floating point, no OS entropy, no
// stdlib hashing in this crate.

use serde::{Deserialize, Serialize};

/// A source of bounded random draws.
///
/// The counterpoint engine only ever needs "pick an index below `bound`";
/// shuffling is built on top of that so scripted sources stay easy to write.
pub trait RandomSource {
    /// Return a uniformly distributed value in `[0, bound)`.
    ///
    /// Panics if `bound == 0`.
    fn below(&mut self, bound: usize) -> usize;

    /// Shuffle `items` in place (Fisher–Yates, front to back).
    ///
    /// Draws exactly `items.len() - 1` values: for slot `i` the draw is
    /// `below(len - i)`, and the chosen element is swapped into slot `i`.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        let len = items.len();
        for i in 0..len.saturating_sub(1) {
            let j = i + self.below(len - i);
            items.swap(i, j);
        }
    }
}

/// Xoshiro256++ PRNG, the production random source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRng {
    s: [u64; 4],
}

impl ExerciseRng {
    /// Create a generator seeded from a `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, so nearby seeds
    /// still produce unrelated streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        ExerciseRng {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform integer in `[low, high)` without modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        // Reject the short tail so every residue is equally likely.
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }
}

impl RandomSource for ExerciseRng {
    fn below(&mut self, bound: usize) -> usize {
        self.range_u64(0, bound as u64) as usize
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Replays a scripted list of draws.
///
/// Each call to `below(bound)` takes the next scripted value and reduces it
/// modulo `bound`. The script wraps around when exhausted; an empty script
/// always answers 0.
#[derive(Clone, Debug, Default)]
pub struct FixedSequence {
    values: Vec<usize>,
    cursor: usize,
    draws: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<usize>) -> Self {
        FixedSequence {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// A source that always answers 0: first pitch is the first perfect
    /// interval and every shuffle keeps the declared order.
    pub fn zeros() -> Self {
        FixedSequence::new(Vec::new())
    }

    /// Number of draws served so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for FixedSequence {
    fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "below: bound must be positive");
        self.draws += 1;
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v % bound
    }
}
