//! Common test utilities
#![allow(dead_code)]

use testing_functions::{
    Config, Environment, ExprPool, ExpressionSource, RandomSource, ReplayRandom, SeededRandom,
    TestingFunctions,
};

pub const PREFIX: &str = "fuzzPriv.";

/// Generator for the standalone shell with default tuning.
pub fn shell_generator() -> TestingFunctions {
    TestingFunctions::new(Environment::shell(), Config::default())
        .expect("default shell catalog is valid")
}

/// Generator for the browser with the default `fuzzPriv.` prefix.
pub fn browser_generator() -> TestingFunctions {
    TestingFunctions::new(Environment::browser(PREFIX), Config::default())
        .expect("default browser catalog is valid")
}

/// Render one pick driven entirely by scripted integer draws.
pub fn scripted(generator: &TestingFunctions, draws: &[u32]) -> String {
    let mut rng = ReplayRandom::ints(draws.iter().copied());
    let mut exprs = ExprPool::new(generator.environment().host());
    generator.testing_functions(&mut rng, &mut exprs, 3, false)
}

/// Generate `count` expressions from a seed.
pub fn seeded_batch(generator: &TestingFunctions, seed: u64, count: usize) -> Vec<String> {
    let mut rng = SeededRandom::new(seed);
    let mut exprs = ExprPool::new(generator.environment().host());
    (0..count)
        .map(|_| generator.testing_functions(&mut rng, &mut exprs, 3, false))
        .collect()
}

/// Expression source that always returns the same fragment.
pub struct FixedExpr(pub &'static str);

impl ExpressionSource for FixedExpr {
    fn make_expr(&mut self, _rng: &mut dyn RandomSource, _depth: u32, _boolean_hint: bool) -> String {
        self.0.to_string()
    }

    fn host_global(&mut self, _rng: &mut dyn RandomSource) -> String {
        self.0.to_string()
    }

    fn any_object(&mut self, _rng: &mut dyn RandomSource) -> String {
        self.0.to_string()
    }
}
