//! Structural wrappers applied to generated text.
//!
//! None of these run anything; they only shape the text so that, once the
//! fuzz driver executes it, anticipated host exceptions degrade to `undefined`
//! and collaborator output always occupies exactly one argument slot.

use crate::config::Config;
use crate::environment::Environment;
use crate::random::RandomSource;

/// Evaluate `expr` inside an immediately invoked function that turns any
/// exception into `undefined`. `try` is statement-level, hence the function.
pub fn try_catch_expr(expr: &str) -> String {
    format!("(function() {{ try {{ return {expr}; }} catch(e) {{ return undefined; }} }})()")
}

/// Coerce a fragment into a single argument.
///
/// `""` and `"1, 2"` would otherwise pass zero or two arguments; the comma
/// operator inside the parentheses collapses a list to one value, and an empty
/// fragment becomes `void 0`.
pub fn ensure_one_arg(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        "(null || (void 0))".to_string()
    } else {
        format!("(null || ({fragment}))")
    }
}

/// Reference to `callee` that, at run time, is the real function only when
/// `flag()` agrees with the chosen polarity, and a no-op otherwise.
///
/// Two runs that differ only in a host option flipping `flag()` then differ
/// only in which calls are live, so output divergence can be pinned on that
/// option.
pub fn feature_conditional(callee: &str, flag: &str, negate: bool) -> String {
    let bang = if negate { "!" } else { "" };
    format!("({bang}{flag}() ? {callee} : (function(){{}}))")
}

/// Reference to the testing function `name` as the host should see it.
///
/// In the browser this is just the prefixed name. In the shell it is the bare
/// name, replaced by a [`feature_conditional`] once in
/// `config.differential_one_in` calls.
pub fn entry_point(
    env: &Environment,
    config: &Config,
    rng: &mut dyn RandomSource,
    name: &str,
) -> String {
    let callee = env.apply_access_prefix(name);
    if env.is_hosted() || rng.rnd(config.differential_one_in) != 0 {
        return callee;
    }
    let negate = rng.rnd(2) != 0;
    feature_conditional(&callee, &config.feature_flag, negate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ReplayRandom, SeededRandom};
    use proptest::prelude::*;

    #[test]
    fn try_catch_shape() {
        assert_eq!(
            try_catch_expr("(startgc(1))"),
            "(function() { try { return (startgc(1)); } catch(e) { return undefined; } })()"
        );
    }

    #[test]
    fn empty_fragment_becomes_void() {
        assert_eq!(ensure_one_arg(""), "(null || (void 0))");
        assert_eq!(ensure_one_arg("  "), "(null || (void 0))");
        assert_eq!(ensure_one_arg("1, 2"), "(null || (1, 2))");
    }

    #[test]
    fn conditional_polarity() {
        assert_eq!(
            feature_conditional("gc", "isAsmJSCompilationAvailable", false),
            "(isAsmJSCompilationAvailable() ? gc : (function(){}))"
        );
        assert_eq!(
            feature_conditional("gc", "isAsmJSCompilationAvailable", true),
            "(!isAsmJSCompilationAvailable() ? gc : (function(){}))"
        );
    }

    #[test]
    fn shell_wraps_on_zero_draw() {
        let env = Environment::shell();
        let config = Config::default();

        let mut rng = ReplayRandom::ints([1]);
        assert_eq!(entry_point(&env, &config, &mut rng, "gc"), "gc");

        let mut rng = ReplayRandom::ints([0, 1]);
        assert_eq!(
            entry_point(&env, &config, &mut rng, "gc"),
            "(!isAsmJSCompilationAvailable() ? gc : (function(){}))"
        );
    }

    #[test]
    fn browser_never_wraps() {
        let env = Environment::browser("fuzzPriv.");
        let config = Config::default();
        let mut rng = SeededRandom::new(5);
        for _ in 0..500 {
            assert_eq!(entry_point(&env, &config, &mut rng, "gc"), "fuzzPriv.gc");
        }
    }

    #[test]
    fn shell_wraps_about_one_in_five() {
        let env = Environment::shell();
        let config = Config::default();
        let mut rng = SeededRandom::new(6);
        let wrapped = (0..5000)
            .filter(|_| entry_point(&env, &config, &mut rng, "gc") != "gc")
            .count();
        assert!((800..=1200).contains(&wrapped), "wrapped {wrapped} of 5000");
    }

    proptest! {
        #[test]
        fn one_arg_keeps_fragment_inside_single_group(
            parts in proptest::collection::vec("[a-z0-9]{1,6}", 0..5),
        ) {
            let fragment = parts.join(", ");
            let coerced = ensure_one_arg(&fragment);
            prop_assert!(coerced.starts_with("(null || ("));
            prop_assert!(coerced.ends_with("))"));
            prop_assert!(crate::shape::is_self_contained(&coerced));
            // Even an empty list leaves something inside the inner group.
            let inner = &coerced["(null || (".len()..coerced.len() - 2];
            prop_assert!(!inner.trim().is_empty());
        }
    }
}
