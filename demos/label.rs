//! Label the states of a transition system with a CTL property and render the result.
//!
//! The system is read from a DOT file (by default, a two-process mutual exclusion model).
//! States satisfying the chosen property are highlighted in the output DOT file,
//! which can be rendered with `dot -Tsvg result.dot -o result.svg`.
//!
//! Run with: `cargo run --example label -- --property liveness`

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;

use ctl_rs::ctl::{CtlChecker, CtlFormula};
use ctl_rs::dot::{load_dot, parse_dot, to_dot};

const MUTEX: &str = include_str!("mutex.dot");

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Input DOT file (default: built-in mutex model).
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Property to check.
    #[clap(long, value_enum, default_value_t = Property::Safety)]
    property: Property,

    /// Output DOT file with satisfying states highlighted.
    #[clap(short, long, value_name = "FILE", default_value = "result.dot")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Property {
    /// ¬(c1 ∧ c2): never both critical
    Safety,
    /// ¬(t1 ∧ t2): never both trying
    Contention,
    /// t1 → AF c1: a trying process eventually enters
    Liveness,
    /// EF c1: the critical section is reachable
    Reachable,
    /// EG ¬c1: process 1 may be kept out forever
    Starvation,
    /// A[n1 U t1] on all paths process 1 idles until it tries
    Progress,
}

impl Property {
    fn formula(self) -> CtlFormula {
        let atom = |p: &str| CtlFormula::atom(p);
        match self {
            Property::Safety => atom("c1").and(atom("c2")).not(),
            Property::Contention => atom("t1").and(atom("t2")).not(),
            Property::Liveness => atom("t1").implies(atom("c1").af()),
            Property::Reachable => atom("c1").ef(),
            Property::Starvation => atom("c1").not().eg(),
            Property::Progress => atom("n1").au(atom("t1")),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let ts = match &args.input {
        Some(path) => load_dot(path)?,
        None => parse_dot(MUTEX)?,
    };
    info!(
        "Loaded {} states, {} transitions, propositions {:?}",
        ts.num_states(),
        ts.num_transitions(),
        ts.propositions()
    );

    let formula = args.property.formula();
    let checker = CtlChecker::new(&ts);
    let sat = checker.check(&formula);

    println!("formula = {}", formula);
    println!("satisfying states = {:?}", sat.iter().map(|s| s.id()).collect::<Vec<_>>());
    println!("holds everywhere: {}", sat.len() == ts.num_states());
    let violations = checker.violations(&formula);
    if !violations.is_empty() {
        println!("violated in: {:?}", violations.iter().map(|s| s.id()).collect::<Vec<_>>());
    }

    let dot = to_dot(&ts, &sat)?;
    std::fs::write(&args.output, dot)?;
    info!("Wrote {}", args.output.display());

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());
    Ok(())
}
