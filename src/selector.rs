//! Weighted selection over the effective catalog.

use crate::catalog::{self, Emitter, Entry, Operation};
use crate::config::Config;
use crate::environment::Environment;
use crate::error::{GeneratorError, Result};
use crate::exprs::ExpressionSource;
use crate::random::RandomSource;

/// Items with positive integer weights, sampled with replacement.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    items: Vec<(u32, T)>,
    total: u32,
}

impl<T> WeightedTable<T> {
    /// Rejects an empty table, a zero weight, or a total that does not fit
    /// in `u32`.
    pub fn new(items: impl IntoIterator<Item = (u32, T)>) -> Result<Self> {
        let items: Vec<(u32, T)> = items.into_iter().collect();
        if items.is_empty() {
            return Err(GeneratorError::EmptyCatalog);
        }
        let mut total: u32 = 0;
        for (index, (weight, _)) in items.iter().enumerate() {
            if *weight == 0 {
                return Err(GeneratorError::ZeroWeight { index });
            }
            total = total
                .checked_add(*weight)
                .ok_or(GeneratorError::WeightOverflow)?;
        }
        Ok(Self { items, total })
    }

    pub fn total_weight(&self) -> u32 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.items.iter().map(|(w, item)| (*w, item))
    }

    /// Index of the first item whose running weight sum exceeds a uniform
    /// draw in `[0, total)`.
    pub fn pick_index(&self, rng: &mut dyn RandomSource) -> usize {
        let k = rng.rnd(self.total);
        let mut running: u32 = 0;
        for (index, (weight, _)) in self.items.iter().enumerate() {
            running += weight;
            if running > k {
                return index;
            }
        }
        // Unreachable while k < total.
        self.items.len() - 1
    }

    pub fn pick(&self, rng: &mut dyn RandomSource) -> &T {
        &self.items[self.pick_index(rng)].1
    }
}

/// The generator: one weighted pick from the host's catalog per call.
#[derive(Debug, Clone)]
pub struct TestingFunctions {
    env: Environment,
    config: Config,
    table: WeightedTable<Operation>,
}

impl TestingFunctions {
    /// Build the generator over the catalog visible in `env`.
    pub fn new(env: Environment, config: Config) -> Result<Self> {
        let entries: Vec<Entry> = catalog::effective(&env).collect();
        Self::with_catalog(env, config, entries)
    }

    /// Build over an explicit catalog. Fails on an empty or zero-weight
    /// catalog, on an invalid config, and on a browser environment without
    /// an access prefix.
    pub fn with_catalog(
        env: Environment,
        config: Config,
        entries: impl IntoIterator<Item = Entry>,
    ) -> Result<Self> {
        config.validate()?;
        if env.is_hosted() && env.access_prefix().is_empty() {
            return Err(GeneratorError::InvalidConfig(
                "browser environment needs a non-empty access prefix".to_string(),
            ));
        }
        let table = WeightedTable::new(entries.into_iter().map(|e| (e.weight, e.op)))?;
        tracing::info!(
            host = %env.host(),
            entries = table.len(),
            total_weight = table.total_weight(),
            "testing-function catalog ready"
        );
        Ok(Self { env, config, table })
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn total_weight(&self) -> u32 {
        self.table.total_weight()
    }

    /// Effective catalog as `(weight, operation)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &Operation)> {
        self.table.iter()
    }

    /// Pick an operation and render it.
    pub fn testing_functions(
        &self,
        rng: &mut dyn RandomSource,
        exprs: &mut dyn ExpressionSource,
        depth: u32,
        boolean_hint: bool,
    ) -> String {
        let op = *self.table.pick(rng);
        tracing::trace!(op = %op.label(), depth, "selected testing function");
        self.render(&op, rng, exprs, depth, boolean_hint)
    }

    /// Render a specific operation, bypassing the weighted pick.
    pub fn render(
        &self,
        op: &Operation,
        rng: &mut dyn RandomSource,
        exprs: &mut dyn ExpressionSource,
        depth: u32,
        boolean_hint: bool,
    ) -> String {
        let mut em = Emitter::new(&self.env, &self.config, rng);
        op.generate(&mut em, exprs, depth, boolean_hint)
    }

    /// `gczeal(level, period)` on its own, outside the weighted pool and
    /// without the browser rate limit.
    pub fn enable_gc_zeal(&self, rng: &mut dyn RandomSource) -> String {
        let mut em = Emitter::new(&self.env, &self.config, rng);
        catalog::enable_gc_zeal(&mut em)
    }
}
