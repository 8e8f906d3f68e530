//! Interface to the expression-synthesis subsystem.
//!
//! Some testing functions take an object or a global. The generator does not
//! build those itself; it asks an [`ExpressionSource`] and then coerces
//! whatever comes back into a single argument.

use crate::environment::Host;
use crate::random::RandomSource;

pub trait ExpressionSource {
    /// Arbitrary expression text within a recursion budget.
    fn make_expr(&mut self, rng: &mut dyn RandomSource, depth: u32, boolean_hint: bool) -> String;

    /// Browser only: a reference to some window-like global.
    fn host_global(&mut self, rng: &mut dyn RandomSource) -> String;

    /// Browser only: a reference to any known object.
    fn any_object(&mut self, rng: &mut dyn RandomSource) -> String;
}

const SHELL_EXPRS: &[&str] = &[
    "this",
    "globalThis",
    "[]",
    "({})",
    "new Object()",
    "(function(){})",
    "Math",
    "0",
    "''",
    "null",
    "undefined",
    "[1, 2, 3]",
];

const BOOLEAN_EXPRS: &[&str] = &["true", "false", "!0", "(1 < 2)"];

const BROWSER_GLOBALS: &[&str] = &["window", "self", "globalThis"];

const BROWSER_OBJECTS: &[&str] = &["window", "document", "Math", "[]", "({})"];

/// Fixed pools of valid expressions.
///
/// Stands in for the real expression synthesizer when the generator runs on
/// its own, e.g. from the CLI. Output never depends on `depth`.
#[derive(Debug, Clone, Copy)]
pub struct ExprPool {
    host: Host,
}

impl ExprPool {
    pub fn new(host: Host) -> Self {
        Self { host }
    }
}

impl Default for ExprPool {
    fn default() -> Self {
        Self::new(Host::Shell)
    }
}

fn pick(rng: &mut dyn RandomSource, pool: &[&str]) -> String {
    pool[rng.rnd(pool.len() as u32) as usize].to_string()
}

impl ExpressionSource for ExprPool {
    fn make_expr(&mut self, rng: &mut dyn RandomSource, _depth: u32, boolean_hint: bool) -> String {
        match (self.host, boolean_hint) {
            (_, true) => pick(rng, BOOLEAN_EXPRS),
            (Host::Shell, false) => pick(rng, SHELL_EXPRS),
            (Host::Browser, false) => pick(rng, BROWSER_OBJECTS),
        }
    }

    fn host_global(&mut self, rng: &mut dyn RandomSource) -> String {
        pick(rng, BROWSER_GLOBALS)
    }

    fn any_object(&mut self, rng: &mut dyn RandomSource) -> String {
        pick(rng, BROWSER_OBJECTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn boolean_hint_picks_boolean_pool() {
        let mut pool = ExprPool::new(Host::Shell);
        let mut rng = SeededRandom::new(1);
        for _ in 0..50 {
            let expr = pool.make_expr(&mut rng, 3, true);
            assert!(BOOLEAN_EXPRS.contains(&expr.as_str()));
        }
    }

    #[test]
    fn browser_globals_come_from_browser_pool() {
        let mut pool = ExprPool::new(Host::Browser);
        let mut rng = SeededRandom::new(2);
        for _ in 0..50 {
            let expr = pool.host_global(&mut rng);
            assert!(BROWSER_GLOBALS.contains(&expr.as_str()));
        }
    }
}
