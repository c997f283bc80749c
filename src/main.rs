//! Command-line interface for eqsolve.
//!
//! Parses each expression once and evaluates it at the requested values of the variable, or
//! samples it over a range.

use std::process::ExitCode;

use clap::Parser as ClapParser;
use eqsolve::{Parser, PostfixSolver};
use log::info;

const MAX_STEPS: i64 = 1_000_000;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Expressions to evaluate
    #[arg(required = true)]
    exprs: Vec<String>,

    /// Symbol of the free variable
    #[arg(short, long, default_value_t = 'x')]
    variable: char,

    /// Value of the variable, may be repeated
    #[arg(short, long, allow_negative_numbers = true)]
    at: Vec<f64>,

    /// Sample over a range instead: START END
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    range: Option<Vec<f64>>,

    /// Number of intervals the range is divided into
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=MAX_STEPS))]
    steps: u32,

    /// Print the postfix notation of each expression
    #[arg(short, long)]
    postfix: bool,
}

fn report(expr: &str, solver: &PostfixSolver, args: &Args) -> Result<(), eqsolve::Error> {
    if args.postfix {
        println!("{} => {}", expr, solver);
    }

    if let Some(range) = &args.range {
        for (x, y) in solver.sample(range[0], range[1], args.steps as usize)? {
            println!("{}\t{}", x, y);
        }
        return Ok(());
    }

    if args.at.is_empty() {
        println!("{} = {}", expr, solver.calculate()?);
    }
    for &value in &args.at {
        println!("{} = {} for {} = {}", expr, solver.calculate_for(value)?, args.variable, value);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    if let Some(range) = &args.range {
        if range.iter().any(|bound| !bound.is_finite()) {
            eprintln!("Error: range bounds must be finite, got {:?}", range);
            return ExitCode::FAILURE;
        }
    }
    let parser = Parser::new().variable(args.variable);
    info!("using {:?}", parser.config());

    let mut status = ExitCode::SUCCESS;
    for expr in &args.exprs {
        let result = parser
            .parse(expr)
            .and_then(|solver| report(expr, &solver, &args));
        if let Err(e) = result {
            eprintln!("Error when evaluating `{}`: {}", expr, e);
            status = ExitCode::FAILURE;
        }
    }
    status
}
