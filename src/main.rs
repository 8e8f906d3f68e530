//! Command-line front end for the testing-function generator.
//!
//! Prints one generated expression per line on stdout. Logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use testing_functions::{
    AdvertisedGlobals, Config, ExprPool, HostSelection, RandomSource, RecordingRandom,
    ReplayRandom, SeededRandom, TestingFunctions,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HostArg {
    Auto,
    Shell,
    Browser,
}

impl From<HostArg> for HostSelection {
    fn from(arg: HostArg) -> Self {
        match arg {
            HostArg::Auto => HostSelection::Auto,
            HostArg::Shell => HostSelection::Shell,
            HostArg::Browser => HostSelection::Browser,
        }
    }
}

/// CLI arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target host. `auto` reads TESTING_FUNCTIONS_HOST_GLOBALS.
    #[arg(long, value_enum)]
    host: Option<HostArg>,

    /// Namespace prefix used in the browser (e.g. "fuzzPriv.")
    #[arg(long)]
    prefix: Option<String>,

    /// Seed for reproducible output; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of expressions to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Recursion budget handed to the expression source
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Prefer boolean-valued sub-expressions
    #[arg(long)]
    boolean: bool,

    /// Only emit gczeal calls
    #[arg(long)]
    zeal: bool,

    /// List the effective catalog instead of generating
    #[arg(long)]
    list: bool,

    /// Emit JSON lines instead of plain text
    #[arg(long)]
    json: bool,

    /// Write every random draw to this file
    #[arg(long, conflicts_with = "replay")]
    record: Option<PathBuf>,

    /// Replay draws from a file written by --record
    #[arg(long, conflicts_with = "seed")]
    replay: Option<PathBuf>,

    /// Evaluate each expression in V8 and report failures
    #[cfg(feature = "v8-check")]
    #[arg(long)]
    check: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[derive(Serialize)]
struct GeneratedLine<'a> {
    index: usize,
    expression: &'a str,
}

#[derive(Serialize)]
struct CatalogLine {
    label: String,
    entry_point: &'static str,
    weight: u32,
    probability: f64,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(err) = run(args) {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(host) = args.host {
        config.host = host.into();
    }
    if let Some(prefix) = &args.prefix {
        config.browser_prefix = prefix.clone();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let env = config.environment(&AdvertisedGlobals::from_env());
    let generator = TestingFunctions::new(env, config).context("building catalog")?;

    if args.list {
        return list_catalog(&generator, args.json);
    }

    let source: Box<dyn RandomSource> = match (&args.replay, args.seed) {
        (Some(path), _) => Box::new(
            ReplayRandom::load(path).with_context(|| format!("loading draws {}", path.display()))?,
        ),
        (None, Some(seed)) => Box::new(SeededRandom::new(seed)),
        (None, None) => Box::new(SeededRandom::from_entropy()),
    };
    let mut rng = RecordingRandom::new(source);
    let mut exprs = ExprPool::new(generator.environment().host());

    let mut failures = 0usize;
    for index in 0..args.count {
        let expression = if args.zeal {
            generator.enable_gc_zeal(&mut rng)
        } else {
            generator.testing_functions(&mut rng, &mut exprs, args.depth, args.boolean)
        };

        if !passes_check(&args, &generator, index, &expression) {
            failures += 1;
        }

        if args.json {
            let line = GeneratedLine {
                index,
                expression: &expression,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{expression}");
        }
    }

    if let Some(path) = &args.record {
        rng.save(path)
            .with_context(|| format!("writing draws {}", path.display()))?;
        tracing::info!(draws = rng.draws().len(), path = %path.display(), "recorded draws");
    }

    if failures > 0 {
        bail!("{failures} of {} expressions failed to evaluate", args.count);
    }
    Ok(())
}

#[cfg(feature = "v8-check")]
fn passes_check(args: &Args, generator: &TestingFunctions, index: usize, expression: &str) -> bool {
    if !args.check {
        return true;
    }
    match testing_functions::check::evaluate(generator.environment(), generator.config(), expression)
    {
        Ok(_) => true,
        Err(message) => {
            tracing::warn!(index, %expression, "evaluation failed: {message}");
            false
        }
    }
}

#[cfg(not(feature = "v8-check"))]
fn passes_check(_args: &Args, _generator: &TestingFunctions, _index: usize, _expression: &str) -> bool {
    true
}

fn list_catalog(generator: &TestingFunctions, json: bool) -> Result<()> {
    let total = f64::from(generator.total_weight());
    for (weight, op) in generator.entries() {
        let line = CatalogLine {
            label: op.label(),
            entry_point: op.entry_point(),
            weight,
            probability: f64::from(weight) / total,
        };
        if json {
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!(
                "{:>4}  {:>6.2}%  {}",
                line.weight,
                line.probability * 100.0,
                line.label
            );
        }
    }
    Ok(())
}
