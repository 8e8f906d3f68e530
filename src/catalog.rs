//! Weighted table of testing-function calls.
//!
//! Each [`Entry`] pairs a weight with an [`Operation`]. [`SHARED`] lists calls
//! both hosts provide; [`SHELL_ONLY`] lists calls that only exist in the
//! standalone shell. Rendering an operation yields one parenthesized
//! expression (or an immediately invoked function when the call may throw).
//! Calls whose result is not interesting are wrapped in `void` so they do not
//! leak an unintended value into the surrounding program.

use crate::args::{gc_slice_size, maybe_comma_shrinking, number_of_allocs};
use crate::config::Config;
use crate::environment::Environment;
use crate::exprs::ExpressionSource;
use crate::random::RandomSource;
use crate::wrap::{ensure_one_arg, entry_point, try_catch_expr};

/// Zeal level that destabilizes browser builds; remapped to 0 there.
pub const BROWSER_UNSAFE_ZEAL_LEVEL: u32 = 9;

/// Zeal levels are drawn from `[0, ZEAL_LEVELS)`.
pub const ZEAL_LEVELS: u32 = 15;

/// Largest value accepted by 32-bit GC parameters.
const GCPARAM_UNLIMITED: u64 = 4_294_967_295;

/// Whether the call's value is kept or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `(void f(...))`
    Void,
    /// `(f(...))`
    Value,
}

/// Scaffolding around the rendered call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// The call may throw depending on engine state; see [`try_catch_expr`].
    TryCatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Call with fixed arguments.
    Call {
        name: &'static str,
        args: &'static str,
        form: Form,
        guard: Guard,
    },
    /// `gc('compartment'[, 'shrinking'])`
    CompartmentGc,
    /// `gc(global[, 'shrinking'])`
    GlobalGc,
    /// `startgc(budget[, 'shrinking'])`. Throws if an incremental GC is
    /// already in progress.
    StartGc,
    /// `gcslice(budget)`
    GcSlice,
    /// `selectforgc(object)`
    SelectForGc,
    /// `schedulegc(global)`
    ScheduleGcGlobal,
    /// `schedulegc(n)`: collect after n allocations.
    ScheduleGcAllocs,
    /// One of several `gcparam` mutations.
    SetGcParam,
    /// `gczeal(level, period)`, rate-limited in the browser.
    GcZeal,
    /// `setJitCompilerOption(option, rnd(bound))`
    JitOption {
        option: &'static str,
        bound: u32,
        guard: Guard,
    },
}

/// A catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub weight: u32,
    pub op: Operation,
}

const fn call(weight: u32, name: &'static str, args: &'static str, form: Form) -> Entry {
    Entry {
        weight,
        op: Operation::Call {
            name,
            args,
            form,
            guard: Guard::None,
        },
    }
}

const fn guarded(weight: u32, name: &'static str, form: Form) -> Entry {
    Entry {
        weight,
        op: Operation::Call {
            name,
            args: "",
            form,
            guard: Guard::TryCatch,
        },
    }
}

const fn op(weight: u32, op: Operation) -> Entry {
    Entry { weight, op }
}

const fn jit(weight: u32, option: &'static str, bound: u32, guard: Guard) -> Entry {
    op(weight, Operation::JitOption { option, bound, guard })
}

/// Calls available in both hosts.
pub const SHARED: &[Entry] = &[
    // Full or targeted collection.
    call(10, "gc", "", Form::Void),
    op(10, Operation::CompartmentGc),
    op(5, Operation::GlobalGc),
    // Nursery collection.
    call(20, "minorgc", "false", Form::Value),
    call(20, "minorgc", "true", Form::Value),
    // Incremental collection.
    op(20, Operation::StartGc),
    op(20, Operation::GcSlice),
    op(10, Operation::SelectForGc),
    op(10, Operation::ScheduleGcGlobal),
    op(10, Operation::ScheduleGcAllocs),
    op(10, Operation::SetGcParam),
    // Very frequent collection. Slow.
    op(1, Operation::GcZeal),
    // Barrier verification only does something when called in pairs.
    call(10, "verifyprebarriers", "", Form::Value),
    call(10, "verifypostbarriers", "", Form::Value),
    call(1, "countHeap", "", Form::Void),
    // Validation toggles.
    call(5, "validategc", "false", Form::Value),
    call(1, "validategc", "true", Form::Value),
    call(5, "fullcompartmentchecks", "false", Form::Value),
    call(1, "fullcompartmentchecks", "true", Form::Value),
    call(5, "setIonCheckGraphCoherency", "false", Form::Value),
    call(1, "setIonCheckGraphCoherency", "true", Form::Value),
    call(1, "enableOsiPointRegisterChecks", "", Form::Value),
    // Warm-up thresholds.
    jit(1, "baseline.warmup.trigger", 20, Guard::None),
    jit(1, "ion.warmup.trigger", 40, Guard::None),
    // Turning a JIT off throws while its code is on the stack.
    jit(1, "ion.enable", 2, Guard::TryCatch),
    jit(1, "baseline.enable", 2, Guard::TryCatch),
    // Profiler.
    call(1, "enableSPSProfiling", "", Form::Value),
    call(1, "enableSPSProfilingWithSlowAssertions", "", Form::Value),
    call(5, "disableSPSProfiling", "", Form::Value),
    call(5, "deterministicgc", "false", Form::Value),
    call(1, "deterministicgc", "true", Form::Value),
    // Keep JIT code alive across later collections.
    call(5, "gcPreserveCode", "", Form::Value),
];

/// Calls that only the standalone shell provides.
pub const SHELL_ONLY: &[Entry] = &[
    call(5, "bailout", "", Form::Value),
    // Throw outside the ARM simulator.
    guarded(1, "disableSingleStepProfiling", Form::Void),
    guarded(1, "enableSingleStepProfiling", Form::Value),
];

/// The catalog visible in `env`.
pub fn effective(env: &Environment) -> impl Iterator<Item = Entry> {
    let shell_only: &'static [Entry] = if env.is_hosted() { &[] } else { SHELL_ONLY };
    SHARED.iter().chain(shell_only).copied()
}

/// Every testing-function name the catalog can reference, in catalog order,
/// without duplicates.
pub fn entry_points() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for entry in SHARED.iter().chain(SHELL_ONLY) {
        let name = entry.op.entry_point();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

// ── Rendering ───────────────────────────────────────────────────────────

/// Per-call rendering state: the host, tuning knobs and the entropy source.
pub struct Emitter<'a> {
    env: &'a Environment,
    config: &'a Config,
    rng: &'a mut dyn RandomSource,
}

impl<'a> Emitter<'a> {
    pub fn new(env: &'a Environment, config: &'a Config, rng: &'a mut dyn RandomSource) -> Self {
        Self { env, config, rng }
    }

    fn rnd(&mut self, n: u32) -> u32 {
        self.rng.rnd(n)
    }

    fn tf(&mut self, name: &str) -> String {
        entry_point(self.env, self.config, self.rng, name)
    }

    fn global(&mut self, exprs: &mut dyn ExpressionSource, depth: u32, boolean_hint: bool) -> String {
        let fragment = if self.env.is_hosted() {
            exprs.host_global(self.rng)
        } else {
            exprs.make_expr(self.rng, depth.saturating_sub(1), boolean_hint)
        };
        ensure_one_arg(&fragment)
    }

    fn object(&mut self, exprs: &mut dyn ExpressionSource, depth: u32, boolean_hint: bool) -> String {
        let fragment = if self.env.is_hosted() {
            exprs.any_object(self.rng)
        } else {
            exprs.make_expr(self.rng, depth.saturating_sub(1), boolean_hint)
        };
        ensure_one_arg(&fragment)
    }
}

fn shape(form: Form, callee: &str, args: &str) -> String {
    match form {
        Form::Void => format!("(void {callee}({args}))"),
        Form::Value => format!("({callee}({args}))"),
    }
}

fn guard(guard: Guard, text: String) -> String {
    match guard {
        Guard::None => text,
        Guard::TryCatch => try_catch_expr(&text),
    }
}

impl Operation {
    /// Name of the testing function this operation calls.
    pub fn entry_point(&self) -> &'static str {
        match self {
            Operation::Call { name, .. } => *name,
            Operation::CompartmentGc | Operation::GlobalGc => "gc",
            Operation::StartGc => "startgc",
            Operation::GcSlice => "gcslice",
            Operation::SelectForGc => "selectforgc",
            Operation::ScheduleGcGlobal | Operation::ScheduleGcAllocs => "schedulegc",
            Operation::SetGcParam => "gcparam",
            Operation::GcZeal => "gczeal",
            Operation::JitOption { .. } => "setJitCompilerOption",
        }
    }

    /// Short human-readable label for logs and listings.
    pub fn label(&self) -> String {
        match self {
            Operation::Call { name, args, .. } => format!("{name}({args})"),
            Operation::CompartmentGc => "gc('compartment')".to_string(),
            Operation::GlobalGc => "gc(global)".to_string(),
            Operation::StartGc => "startgc(budget)".to_string(),
            Operation::GcSlice => "gcslice(budget)".to_string(),
            Operation::SelectForGc => "selectforgc(object)".to_string(),
            Operation::ScheduleGcGlobal => "schedulegc(global)".to_string(),
            Operation::ScheduleGcAllocs => "schedulegc(allocs)".to_string(),
            Operation::SetGcParam => "gcparam(...)".to_string(),
            Operation::GcZeal => "gczeal(level, period)".to_string(),
            Operation::JitOption { option, .. } => format!("setJitCompilerOption('{option}')"),
        }
    }

    /// Render this operation. Draws happen left to right in the order the
    /// pieces appear in the output.
    pub fn generate(
        &self,
        em: &mut Emitter<'_>,
        exprs: &mut dyn ExpressionSource,
        depth: u32,
        boolean_hint: bool,
    ) -> String {
        match *self {
            Operation::Call {
                name,
                args,
                form,
                guard: g,
            } => {
                let callee = em.tf(name);
                guard(g, shape(form, &callee, args))
            }
            Operation::CompartmentGc => {
                let callee = em.tf("gc");
                let shrinking = maybe_comma_shrinking(em.rng);
                shape(Form::Void, &callee, &format!("'compartment'{shrinking}"))
            }
            Operation::GlobalGc => {
                let callee = em.tf("gc");
                let global = em.global(exprs, depth, boolean_hint);
                let shrinking = maybe_comma_shrinking(em.rng);
                shape(Form::Void, &callee, &format!("{global}{shrinking}"))
            }
            Operation::StartGc => {
                let callee = em.tf("startgc");
                let budget = gc_slice_size(em.rng);
                let shrinking = maybe_comma_shrinking(em.rng);
                try_catch_expr(&shape(Form::Value, &callee, &format!("{budget}{shrinking}")))
            }
            Operation::GcSlice => {
                let callee = em.tf("gcslice");
                let budget = gc_slice_size(em.rng);
                shape(Form::Value, &callee, &budget.to_string())
            }
            Operation::SelectForGc => {
                let callee = em.tf("selectforgc");
                let object = em.object(exprs, depth, boolean_hint);
                shape(Form::Value, &callee, &object)
            }
            Operation::ScheduleGcGlobal => {
                let callee = em.tf("schedulegc");
                let global = em.global(exprs, depth, boolean_hint);
                shape(Form::Void, &callee, &global)
            }
            Operation::ScheduleGcAllocs => {
                let callee = em.tf("schedulegc");
                let allocs = number_of_allocs(em.rng);
                shape(Form::Void, &callee, &allocs.to_string())
            }
            Operation::SetGcParam => set_gcparam(em),
            Operation::GcZeal => {
                if !em.env.is_hosted() || em.rnd(em.config.browser_zeal_one_in) == 0 {
                    enable_gc_zeal(em)
                } else {
                    "(0)".to_string()
                }
            }
            Operation::JitOption { option, bound, guard: g } => {
                let callee = em.tf("setJitCompilerOption");
                let value = em.rnd(bound);
                guard(g, shape(Form::Value, &callee, &format!("'{option}', {value}")))
            }
        }
    }
}

/// `gczeal(level, period)`. Level 9 is remapped to 0 in the browser.
pub fn enable_gc_zeal(em: &mut Emitter<'_>) -> String {
    let mut level = em.rnd(ZEAL_LEVELS);
    if em.env.is_hosted() && level == BROWSER_UNSAFE_ZEAL_LEVEL {
        level = 0;
    }
    let period = number_of_allocs(em.rng);
    let callee = em.tf("gczeal");
    shape(Form::Value, &callee, &format!("{level}, {period}"))
}

/// Mutate a GC parameter. Every branch is try/catch wrapped: setting a
/// parameter can throw depending on the state of an in-progress collection.
fn set_gcparam(em: &mut Emitter<'_>) -> String {
    match em.rnd(4) {
        0 => {
            let budget = em.rnd(100);
            gcparam_set(em, "sliceTimeBudget", &budget.to_string())
        }
        1 => {
            // A tiny mark stack forces delayed marking.
            let limit = if em.rnd(2) != 0 {
                u64::from(1 + em.rnd(30))
            } else {
                GCPARAM_UNLIMITED
            };
            gcparam_set(em, "markStackLimit", &limit.to_string())
        }
        2 => {
            // Ceiling just above current usage: a near-future allocation fails.
            let slack = if em.rnd(2) != 0 { em.rnd(2) } else { em.rnd(4097) };
            let current = gcparam_get(em, "gcBytes");
            gcparam_set(em, "maxBytes", &format!("{current} + {slack}"))
        }
        _ => gcparam_set(em, "maxBytes", &GCPARAM_UNLIMITED.to_string()),
    }
}

fn gcparam_set(em: &mut Emitter<'_>, name: &str, value: &str) -> String {
    let callee = em.tf("gcparam");
    try_catch_expr(&format!("{callee}('{name}', {value})"))
}

/// Reads never go through the conditional wrapper: the value feeds
/// arithmetic, not a call.
fn gcparam_get(em: &Emitter<'_>, name: &str) -> String {
    format!("{}('{name}')", em.env.apply_access_prefix("gcparam"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_positive() {
        for entry in SHARED.iter().chain(SHELL_ONLY) {
            assert!(entry.weight > 0, "{} has zero weight", entry.op.label());
        }
    }

    #[test]
    fn browser_hides_shell_only_entries() {
        let browser = effective(&Environment::browser("fuzzPriv.")).count();
        let shell = effective(&Environment::shell()).count();
        assert_eq!(browser, SHARED.len());
        assert_eq!(shell, SHARED.len() + SHELL_ONLY.len());
    }

    #[test]
    fn entry_points_are_unique_identifiers() {
        let names = entry_points();
        for name in &names {
            assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
        assert!(names.contains(&"gczeal"));
        assert!(names.contains(&"gcparam"));
        assert!(names.contains(&"bailout"));
        assert!(!names.contains(&"relazify"));
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<String> = SHARED.iter().chain(SHELL_ONLY).map(|e| e.op.label()).collect();
        let total = labels.len();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }
}
