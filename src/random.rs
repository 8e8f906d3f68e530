//! Entropy sources consumed by the generator.
//!
//! The generator only ever asks for two things: a uniform integer below some
//! bound and a uniform float in `[0, 1)`. `SeededRandom` is the production
//! source; `RecordingRandom` and `ReplayRandom` let a harness capture the exact
//! draw sequence behind a generated case and reproduce it later.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

use crate::error::Result;

/// Uniform random draws.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
    fn rnd(&mut self, n: u32) -> u32;

    /// Uniform float in `[0, 1)`.
    fn float(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn rnd(&mut self, n: u32) -> u32 {
        (**self).rnd(n)
    }

    fn float(&mut self) -> f64 {
        (**self).float()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn rnd(&mut self, n: u32) -> u32 {
        (**self).rnd(n)
    }

    fn float(&mut self) -> f64 {
        (**self).float()
    }
}

// ── Seeded source ───────────────────────────────────────────────────────

/// Reproducible source: the same seed always yields the same draws.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy, for runs that do not need to be reproduced.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn rnd(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

// ── Recording and replay ────────────────────────────────────────────────

/// A single recorded draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Draw {
    /// Integer draw; `n` is the bound it was drawn under.
    Int { n: u32, value: u32 },
    Float { value: f64 },
}

impl Draw {
    /// Scripted integer draw. The bound is unknown, so replay reduces `value`
    /// modulo whatever bound the generator asks for.
    pub fn int(value: u32) -> Self {
        Draw::Int { n: 0, value }
    }

    pub fn float(value: f64) -> Self {
        Draw::Float { value }
    }
}

/// Wraps a source and remembers every draw it hands out.
#[derive(Debug)]
pub struct RecordingRandom<R> {
    inner: R,
    draws: Vec<Draw>,
}

impl<R: RandomSource> RecordingRandom<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn into_draws(self) -> Vec<Draw> {
        self.draws
    }

    /// Write the recorded draws as a JSON array.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.draws)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

impl<R: RandomSource> RandomSource for RecordingRandom<R> {
    fn rnd(&mut self, n: u32) -> u32 {
        let value = self.inner.rnd(n);
        self.draws.push(Draw::Int { n, value });
        value
    }

    fn float(&mut self) -> f64 {
        let value = self.inner.float();
        self.draws.push(Draw::Float { value });
        value
    }
}

/// Replays a fixed draw sequence.
///
/// Integer draws are reduced modulo the requested bound so a script never
/// produces an out-of-range value. A float draw consumed by `rnd` is scaled to
/// the bound; an integer draw consumed by `float` is scaled by its recorded
/// bound. Float results are clamped into `[0, 1)`. Once the sequence is exhausted every draw yields zero.
#[derive(Debug, Clone, Default)]
pub struct ReplayRandom {
    draws: VecDeque<Draw>,
}

impl ReplayRandom {
    pub fn new(draws: impl IntoIterator<Item = Draw>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Script consisting only of integer draws.
    pub fn ints(values: impl IntoIterator<Item = u32>) -> Self {
        Self::new(values.into_iter().map(Draw::int))
    }

    /// Load draws previously written by [`RecordingRandom::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let draws: Vec<Draw> = serde_json::from_str(&data)?;
        Ok(Self::new(draws))
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ReplayRandom {
    fn rnd(&mut self, n: u32) -> u32 {
        if n == 0 {
            // Still consume the draw so recorded sequences stay aligned.
            self.draws.pop_front();
            return 0;
        }
        match self.draws.pop_front() {
            Some(Draw::Int { value, .. }) => value % n,
            Some(Draw::Float { value }) => ((value.clamp(0.0, 1.0) * n as f64) as u32).min(n - 1),
            None => 0,
        }
    }

    fn float(&mut self) -> f64 {
        match self.draws.pop_front() {
            Some(Draw::Float { value }) => value.clamp(0.0, 1.0 - f64::EPSILON),
            Some(Draw::Int { n, value }) if n > 0 => {
                (value as f64 / n as f64).clamp(0.0, 1.0 - f64::EPSILON)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_source_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.rnd(1000), b.rnd(1000));
            assert_eq!(a.float(), b.float());
        }
    }

    #[test]
    fn seeded_source_respects_bounds() {
        let mut rng = SeededRandom::new(7);
        assert_eq!(rng.rnd(0), 0);
        for _ in 0..1000 {
            assert!(rng.rnd(3) < 3);
            let f = rng.float();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn replay_reduces_and_then_yields_zero() {
        let mut rng = ReplayRandom::ints([7, 2]);
        assert_eq!(rng.rnd(5), 2);
        assert_eq!(rng.rnd(5), 2);
        assert_eq!(rng.rnd(5), 0);
        assert_eq!(rng.float(), 0.0);
    }

    #[test]
    fn replayed_floats_stay_below_one() {
        let mut rng = ReplayRandom::new([
            Draw::float(5.0),
            Draw::float(-1.0),
            Draw::Int { n: 4, value: 9 },
        ]);
        let high = rng.float();
        assert!((0.0..1.0).contains(&high));
        assert_eq!(rng.float(), 0.0);
        assert!((0.0..1.0).contains(&rng.float()));
    }

    #[test]
    fn out_of_range_float_keeps_slice_size_bounded() {
        let mut rng = ReplayRandom::new([Draw::float(5.0)]);
        assert!(crate::args::gc_slice_size(&mut rng) < 1 << 32);
    }

    #[test]
    fn recorded_draws_replay_identically() {
        let mut recorder = RecordingRandom::new(SeededRandom::new(99));
        let original: Vec<u32> = (0..20).map(|i| recorder.rnd(i + 1)).collect();
        let f = recorder.float();

        let mut replay = ReplayRandom::new(recorder.into_draws());
        let replayed: Vec<u32> = (0..20).map(|i| replay.rnd(i + 1)).collect();
        assert_eq!(original, replayed);
        assert_eq!(replay.float(), f);
        assert_eq!(replay.remaining(), 0);
    }

    #[test]
    fn draws_round_trip_through_json_file() {
        let mut recorder = RecordingRandom::new(SeededRandom::new(3));
        recorder.rnd(10);
        recorder.float();
        let file = tempfile::NamedTempFile::new().unwrap();
        recorder.save(file.path()).unwrap();
        let replay = ReplayRandom::load(file.path()).unwrap();
        assert_eq!(replay.remaining(), 2);
    }
}
