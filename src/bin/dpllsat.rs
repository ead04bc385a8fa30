use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dpllsat::cnf::cnf::Cnf;
use dpllsat::cnf::dimacs::{
    load_cnf, parse_dimacs_reader, to_dimacs, write_cnf, write_error, write_result,
};
use dpllsat::cnf::random::generate_seeded;
use dpllsat::error::SatError;
use dpllsat::fuzz::{FuzzConfig, run_campaign, schedule};
use dpllsat::sat::brute::MAX_BRUTE_VARS;
use dpllsat::sat::dpll::{DEFAULT_STACK_SIZE, PropagationMode, SolveOptions};
use dpllsat::solver::backend_from_name;

#[derive(Debug, Parser)]
#[command(name = "dpllsat")]
#[command(about = "DPLL satisfiability checker for DIMACS CNF")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Decide a DIMACS instance read from PATH or stdin.
    Solve {
        path: Option<String>,
        #[arg(long, default_value = "dpll", value_parser = ["dpll", "varisat", "brute"])]
        backend: String,
        #[arg(long, default_value = "single", value_parser = ["single", "fixpoint"])]
        propagation: String,
        #[arg(long = "stack-mb", default_value_t = DEFAULT_STACK_SIZE / (1024 * 1024))]
        stack_mb: usize,
        #[arg(long, default_value_t = false)]
        stats: bool,
    },
    /// Write a random mixed-width instance.
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        out: Option<String>,
    },
    /// Compare the DPLL engine against a reference backend on random instances.
    Fuzz {
        #[arg(long = "max-vars", default_value_t = 100)]
        max_vars: u32,
        #[arg(long = "max-clauses", default_value_t = 600)]
        max_clauses: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value = "varisat", value_parser = ["varisat", "brute", "dpll"])]
        oracle: String,
        #[arg(long = "wrong-dir")]
        wrong_dir: Option<String>,
        #[arg(long)]
        csv: Option<String>,
        #[arg(long, default_value_t = false)]
        progress: bool,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Solve {
            path,
            backend,
            propagation,
            stack_mb,
            stats,
        } => solve_cmd(path.as_deref(), &backend, &propagation, stack_mb, stats),
        Cmd::Gen {
            vars,
            clauses,
            seed,
            out,
        } => {
            gen_cmd(vars, clauses, seed, out.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Fuzz {
            max_vars,
            max_clauses,
            seed,
            oracle,
            wrong_dir,
            csv,
            progress,
        } => fuzz_cmd(
            FuzzConfig {
                max_vars,
                max_clauses,
                seed,
                wrong_dir: wrong_dir.map(PathBuf::from),
                csv: csv.map(PathBuf::from),
                progress,
            },
            &oracle,
        ),
    }
}

fn parse_propagation(name: &str) -> Result<PropagationMode> {
    match name {
        "single" => Ok(PropagationMode::SinglePass),
        "fixpoint" => Ok(PropagationMode::FixedPoint),
        _ => bail!("unknown propagation mode '{}', expected single|fixpoint", name),
    }
}

fn load_input(path: Option<&str>) -> Result<Cnf, SatError> {
    match path {
        None | Some("-") => parse_dimacs_reader(std::io::stdin().lock()),
        Some(p) => load_cnf(p),
    }
}

fn solve_cmd(
    path: Option<&str>,
    backend: &str,
    propagation: &str,
    stack_mb: usize,
    stats: bool,
) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let solver = parse_propagation(propagation).and_then(|propagation| {
        let opts = SolveOptions {
            propagation,
            stack_size: stack_mb.max(1).saturating_mul(1024 * 1024),
        };
        backend_from_name(backend, opts)
    });
    let mut solver = match solver {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("error: {e:#}");
            write_error(&mut out)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let started = Instant::now();
    let outcome = load_input(path).and_then(|cnf| solver.solve(&cnf));
    let elapsed_ms = started.elapsed().as_millis();
    match outcome {
        Ok(result) => {
            write_result(&mut out, &result)?;
            if stats {
                let s = solver.stats();
                writeln!(
                    out,
                    "c backend={} elapsed_ms={}",
                    solver.backend_name(),
                    elapsed_ms
                )?;
                writeln!(
                    out,
                    "c decisions={} propagations={} pure={} conflicts={}",
                    s.search.decisions,
                    s.search.propagations,
                    s.search.pure_assignments,
                    s.search.conflicts
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e}");
            write_error(&mut out)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn gen_cmd(vars: u32, clauses: usize, seed: u64, out: Option<&str>) -> Result<()> {
    let cnf = generate_seeded(vars, clauses, seed);
    match out {
        Some(path) => {
            write_cnf(path, &cnf).with_context(|| format!("failed to write {}", path))?;
            eprintln!(
                "GEN: wrote {} | vars={} clauses={} seed={}",
                path,
                cnf.num_vars(),
                cnf.clauses().len(),
                seed
            );
        }
        None => print!("{}", to_dimacs(&cnf)),
    }
    Ok(())
}

fn fuzz_cmd(cfg: FuzzConfig, oracle_name: &str) -> Result<ExitCode> {
    let peak_vars = schedule(cfg.max_vars, cfg.max_clauses)
        .last()
        .map_or(0, |&(vars, _)| vars);
    if oracle_name == "brute" && peak_vars > MAX_BRUTE_VARS {
        bail!(
            "brute oracle supports at most {} variables, campaign reaches {}",
            MAX_BRUTE_VARS,
            peak_vars
        );
    }
    let mut engine = backend_from_name("dpll", SolveOptions::default())?;
    let mut oracle = backend_from_name(oracle_name, SolveOptions::default())?;
    if cfg.progress {
        println!("    case |   vars | clauses | status   | time");
    }

    let report = run_campaign(&cfg, engine.as_mut(), oracle.as_mut())?;
    println!(
        "FUZZ: total={} passed={} mismatches={} unsound={} pass_rate={:.2}%",
        report.total,
        report.passed,
        report.mismatches,
        report.unsound,
        report.pass_rate()
    );
    if let (Some(dir), true) = (&cfg.wrong_dir, report.mismatches > 0) {
        println!("FUZZ: mismatching cases saved to {}", dir.display());
    }

    if report.mismatches == 0 && report.unsound == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
