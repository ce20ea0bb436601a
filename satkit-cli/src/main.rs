use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Error};
use clap::{App, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info, Level, LevelFilter, Record};

use satkit::{Backend, SolveError, SolverConfig, Verdict};
use satkit_dimacs::DimacsParser;
use satkit_formula::CnfFormula;

fn main() {
    let exit_code = match main_with_err() {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            1
        }
    };
    std::process::exit(exit_code);
}

/// Matches `varisat-cli`'s formatter: `info` lines get a bare `c ` prefix so
/// stdout stays readable as DIMACS-adjacent commented output, everything
/// else is prefixed with its level.
fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder.target(Target::Stdout).format(format).filter(None, LevelFilter::Info);

    if let Ok(env_var) = std::env::var("SATKIT_LOG") {
        builder.parse_filters(&env_var);
    }

    builder.init();
}

fn app() -> App<'static, 'static> {
    App::new("satkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A propositional satisfiability solver")
        .arg(Arg::with_name("INPUT").help("DIMACS CNF input file (stdin if omitted)"))
        .arg(
            Arg::with_name("solver")
                .long("solver")
                .takes_value(true)
                .possible_values(&["dpll", "dp", "res", "cdcl"])
                .default_value("cdcl")
                .help("Which backend decides satisfiability"),
        )
        .arg(
            Arg::with_name("results-log")
                .long("results-log")
                .takes_value(true)
                .value_name("FILE")
                .help("Append '<input>\\n<elapsed_ms>\\n' to this file after solving"),
        )
        .arg(
            Arg::with_name("vsids-decay")
                .long("vsids-decay")
                .takes_value(true)
                .help("Override the CDCL backend's VSIDS decay factor"),
        )
        .arg(
            Arg::with_name("learned-limit")
                .long("learned-limit")
                .takes_value(true)
                .help("Override the CDCL backend's learned-clause limit before reduction"),
        )
}

fn backend_from_flag(name: &str) -> Backend {
    match name {
        "dpll" => Backend::Dpll,
        "dp" => Backend::Dp,
        "res" => Backend::Resolution,
        "cdcl" => Backend::Cdcl,
        _ => unreachable!("clap restricts this to the possible_values list"),
    }
}

fn read_input(path: Option<&str>) -> Result<CnfFormula, Error> {
    match path {
        Some(path) => {
            info!("reading file '{}'", path);
            let file = File::open(path).with_context(|| format!("failed to open '{}'", path))?;
            DimacsParser::parse(file).context("invalid DIMACS CNF input")
        }
        None => {
            info!("reading from stdin");
            DimacsParser::parse(io::stdin()).context("invalid DIMACS CNF input")
        }
    }
}

fn main_with_err() -> Result<i32, Error> {
    init_logging();
    info!("satkit {}", env!("CARGO_PKG_VERSION"));

    let matches = app().get_matches();

    let start = Instant::now();

    let formula = read_input(matches.value_of("INPUT"))?;

    let mut config = SolverConfig::default();
    if let Some(decay) = matches.value_of("vsids-decay") {
        config.vsids_decay = decay.parse().context("--vsids-decay must be a number")?;
    }
    if let Some(limit) = matches.value_of("learned-limit") {
        config.learned_limit = limit.parse().context("--learned-limit must be a non-negative integer")?;
    }

    let backend = backend_from_flag(matches.value_of("solver").unwrap());

    let verdict = match satkit::solve(&formula, backend, config) {
        Ok(verdict) => verdict,
        Err(SolveError::OutOfMemory) => {
            error!("out of memory while solving");
            return Ok(3);
        }
        Err(err @ SolveError::InternalInvariant(_)) => {
            error!("{}", err);
            return Ok(2);
        }
    };

    let elapsed_ms = start.elapsed().as_millis();

    match verdict {
        Verdict::Sat(assignment) => {
            println!("SATISFIABLE");
            if let Some(assignment) = assignment {
                let mut dimacs: Vec<isize> = assignment.iter().map(|lit| lit.to_dimacs()).collect();
                dimacs.sort_by_key(|n| n.abs());
                dimacs.dedup_by_key(|n| n.abs());
                let line: Vec<String> = dimacs.iter().map(|n| n.to_string()).collect();
                println!("{}", line.join(" "));
            }
        }
        Verdict::Unsat => println!("UNSATISFIABLE"),
    }
    info!("{} ms", elapsed_ms);

    if let Some(log_path) = matches.value_of("results-log") {
        let basename = matches.value_of("INPUT").unwrap_or("stdin");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("failed to open results log '{}'", log_path))?;
        writeln!(file, "{}\n{}", basename, elapsed_ms)?;
    }

    Ok(0)
}
