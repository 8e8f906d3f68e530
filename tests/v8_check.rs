#![cfg(feature = "v8-check")]

mod common;

use common::{browser_generator, seeded_batch, shell_generator};
use testing_functions::check::evaluate;
use testing_functions::wrap::{ensure_one_arg, try_catch_expr};
use testing_functions::{Config, Environment};

fn eval_shell(code: &str) -> Result<String, String> {
    evaluate(&Environment::shell(), &Config::default(), code)
}

#[test]
fn try_catch_turns_throw_into_undefined() {
    let code = try_catch_expr("(function() { throw new Error('busy'); })()");
    assert_eq!(eval_shell(&code).unwrap(), "undefined");
}

#[test]
fn try_catch_passes_value_through() {
    let code = try_catch_expr("41 + 1");
    assert_eq!(eval_shell(&code).unwrap(), "42");
}

#[test]
fn ensure_one_arg_collapses_argument_list() {
    for fragment in ["1, 2", "", "[]"] {
        let code = format!(
            "(function() {{ return arguments.length; }})({})",
            ensure_one_arg(fragment)
        );
        assert_eq!(eval_shell(&code).unwrap(), "1", "fragment {fragment:?}");
    }
}

#[test]
fn syntax_errors_are_reported() {
    assert!(eval_shell("(void gc(").is_err());
}

#[test]
fn shell_output_evaluates() {
    let generator = shell_generator();
    for text in seeded_batch(&generator, 9, 300) {
        if let Err(message) = evaluate(generator.environment(), generator.config(), &text) {
            panic!("{text}: {message}");
        }
    }
}

#[test]
fn browser_output_evaluates() {
    let generator = browser_generator();
    for text in seeded_batch(&generator, 10, 300) {
        if let Err(message) = evaluate(generator.environment(), generator.config(), &text) {
            panic!("{text}: {message}");
        }
    }
}

#[test]
fn nested_browser_prefix_cannot_be_stubbed() {
    let env = Environment::browser("a.b.");
    assert!(evaluate(&env, &Config::default(), "0").is_err());
}
