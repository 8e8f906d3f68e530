//! Testing-function call generator
//!
//! Produces single JavaScript expressions that call a JavaScript engine's
//! internal testing functions (GC triggers, incremental GC control, barrier
//! verification, JIT and profiler toggles) for use inside a larger fuzzer.
//! The text is never executed here; the fuzz driver decides where it goes.
//!
//! # Features
//!
//! - Weighted catalog of operations, split into calls both hosts provide and
//!   calls only the standalone shell provides
//! - Host resolution (shell vs. browser) done once, then passed around
//! - try/catch scaffolding for calls that may legitimately throw
//! - Differential-testing conditional around function references in the shell
//! - Reproducible draws via seeded, recording and replaying random sources
//!
//! # Example
//!
//! ```rust
//! use testing_functions::{Config, Environment, ExprPool, SeededRandom, TestingFunctions};
//!
//! let env = Environment::shell();
//! let generator = TestingFunctions::new(env, Config::default()).unwrap();
//!
//! let mut rng = SeededRandom::new(1);
//! let mut exprs = ExprPool::default();
//! let text = generator.testing_functions(&mut rng, &mut exprs, 3, false);
//! assert!(text.starts_with('('));
//! ```

pub mod args;
pub mod catalog;
pub mod config;
pub mod environment;
pub mod error;
pub mod exprs;
pub mod random;
pub mod selector;
pub mod shape;
pub mod wrap;

#[cfg(feature = "v8-check")]
pub mod check;

// Re-export commonly used items
pub use catalog::{Entry, Operation};
pub use config::{Config, HostSelection};
pub use environment::{AdvertisedGlobals, Environment, Host, HostProbe};
pub use error::GeneratorError;
pub use exprs::{ExprPool, ExpressionSource};
pub use random::{Draw, RandomSource, RecordingRandom, ReplayRandom, SeededRandom};
pub use selector::{TestingFunctions, WeightedTable};
