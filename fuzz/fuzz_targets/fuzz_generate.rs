#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use testing_functions::shape::is_self_contained;
use testing_functions::{Config, Environment, ExprPool, ReplayRandom, TestingFunctions};

#[derive(Arbitrary, Debug)]
struct GenerateInput {
    browser: bool,
    depth: u8,
    boolean_hint: bool,
    differential_one_in: u8,
    draws: Vec<u32>,
}

// Drive the generator with arbitrary draw sequences (including exhausted
// ones) and check that every result is a single self-contained expression.
fuzz_target!(|input: GenerateInput| {
    let env = if input.browser {
        Environment::browser("fuzzPriv.")
    } else {
        Environment::shell()
    };
    let config = Config {
        differential_one_in: u32::from(input.differential_one_in.max(1)),
        ..Config::default()
    };
    let generator = match TestingFunctions::new(env, config) {
        Ok(generator) => generator,
        Err(_) => return,
    };

    let mut rng = ReplayRandom::ints(input.draws);
    let mut exprs = ExprPool::new(generator.environment().host());
    for _ in 0..8 {
        let text = generator.testing_functions(
            &mut rng,
            &mut exprs,
            u32::from(input.depth),
            input.boolean_hint,
        );
        assert!(is_self_contained(&text), "not self-contained: {text}");
    }
});
