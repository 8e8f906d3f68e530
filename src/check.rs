//! Evaluate generated expressions in an embedded V8 isolate.
//!
//! V8 has none of the testing functions the catalog targets, so every
//! evaluation first runs a prelude that installs no-op stubs under the names
//! (and, in the browser, the namespace) the generated text expects. What is
//! being checked is that the text parses and that its scaffolding behaves;
//! the stubs do nothing.

use std::sync::Once;

use crate::catalog::entry_points;
use crate::config::Config;
use crate::environment::Environment;

static INIT: Once = Once::new();

/// Initialize V8. Safe to call repeatedly.
pub fn initialize_v8() {
    INIT.call_once(|| {
        let platform = v8::new_default_platform(0, false).make_shared();
        v8::V8::initialize_platform(platform);
        v8::V8::initialize();
    });
}

/// Script that defines a stub for every testing function and the feature
/// flag, plus the window-like globals browser-pool expressions use.
pub fn prelude(env: &Environment, config: &Config) -> Result<String, String> {
    let stubs: Vec<String> = entry_points()
        .iter()
        .map(|name| format!("{name}: function() {{ return 0; }}"))
        .collect();
    let mut script = String::new();

    if env.is_hosted() {
        let namespace = env
            .access_prefix()
            .strip_suffix('.')
            .filter(|ns| !ns.is_empty() && !ns.contains('.'))
            .ok_or_else(|| {
                format!(
                    "cannot stub browser prefix '{}': expected a single identifier followed by '.'",
                    env.access_prefix()
                )
            })?;
        script.push_str(&format!("var {namespace} = {{ {} }};\n", stubs.join(", ")));
        script.push_str("var window = globalThis;\nvar self = globalThis;\nvar document = {};\n");
    } else {
        script.push_str(&format!("var __stubs = {{ {} }};\n", stubs.join(", ")));
        script.push_str("for (var __k in __stubs) globalThis[__k] = __stubs[__k];\n");
    }
    script.push_str(&format!(
        "var {} = function() {{ return true; }};\n",
        config.feature_flag
    ));
    Ok(script)
}

/// Run the prelude followed by `code` in a fresh isolate and return the
/// completion value as a string, or the exception message.
pub fn evaluate(env: &Environment, config: &Config, code: &str) -> Result<String, String> {
    initialize_v8();
    let source = format!("{}{}", prelude(env, config)?, code);

    let mut isolate = v8::Isolate::new(Default::default());
    let handle_scope = &mut v8::HandleScope::new(&mut isolate);
    let context = v8::Context::new(handle_scope, Default::default());
    let scope = &mut v8::ContextScope::new(handle_scope, context);
    let scope = &mut v8::TryCatch::new(scope);

    let source = v8::String::new(scope, &source).ok_or("Failed to create V8 string")?;
    let script = match v8::Script::compile(scope, source, None) {
        Some(script) => script,
        None => return Err(exception_message(scope, "Failed to compile script")),
    };
    match script.run(scope) {
        Some(result) => Ok(result.to_rust_string_lossy(scope)),
        None => Err(exception_message(scope, "Failed to run script")),
    }
}

fn exception_message(scope: &mut v8::TryCatch<v8::HandleScope>, fallback: &str) -> String {
    match scope.exception() {
        Some(exception) => exception.to_rust_string_lossy(scope),
        None => fallback.to_string(),
    }
}
