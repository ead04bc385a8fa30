use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::cnf::cnf::Cnf;
use crate::cnf::dimacs::{to_dimacs, write_error, write_result};
use crate::cnf::random::generate_random_cnf;
use crate::error::SatError;
use crate::sat::dpll::SatResult;
use crate::solver::SatBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzConfig {
    pub max_vars: u32,
    pub max_clauses: usize,
    pub seed: u64,
    pub wrong_dir: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub progress: bool,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            max_vars: 100,
            max_clauses: 600,
            seed: 0,
            wrong_dir: None,
            csv: None,
            progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzRow {
    pub case: usize,
    pub vars: u32,
    pub clauses: usize,
    pub engine: String,
    pub oracle: String,
    pub status: String,
    pub wall_ms: u128,
}

impl FuzzRow {
    pub fn csv_header() -> &'static str {
        "case,vars,clauses,engine,oracle,status,wall_ms"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.case, self.vars, self.clauses, self.engine, self.oracle, self.status, self.wall_ms
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzReport {
    pub total: usize,
    pub passed: usize,
    pub mismatches: usize,
    pub unsound: usize,
}

impl FuzzReport {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Instance sizes visited by the campaign: case `i` has `i` clauses and the
/// variable count grows by one every fourth case.
pub fn schedule(max_vars: u32, max_clauses: usize) -> Vec<(u32, usize)> {
    let mut out = Vec::new();
    let mut vars = 0u32;
    let mut case = 0usize;
    while case <= max_clauses || vars <= max_vars {
        case += 1;
        if case % 4 == 0 {
            vars += 1;
        }
        out.push((vars, case));
    }
    out
}

/// Solves random instances with `engine` and `oracle` and compares verdicts.
/// Disagreements are written to `cfg.wrong_dir` when set.
pub fn run_campaign(
    cfg: &FuzzConfig,
    engine: &mut dyn SatBackend,
    oracle: &mut dyn SatBackend,
) -> Result<FuzzReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut csv = match &cfg.csv {
        Some(path) => {
            let mut f = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            writeln!(f, "{}", FuzzRow::csv_header())?;
            Some(f)
        }
        None => None,
    };

    let mut report = FuzzReport::default();
    for (case, (vars, clauses)) in schedule(cfg.max_vars, cfg.max_clauses)
        .into_iter()
        .enumerate()
    {
        let case = case + 1;
        let cnf = generate_random_cnf(vars, clauses, &mut rng);
        let started = Instant::now();
        let engine_out = engine.solve(&cnf);
        let oracle_out = oracle.solve(&cnf);
        let wall_ms = started.elapsed().as_millis();

        let engine_word = outcome_word(&engine_out);
        let oracle_word = outcome_word(&oracle_out);
        report.total += 1;

        let mut status = if engine_word == oracle_word {
            report.passed += 1;
            "ok"
        } else {
            report.mismatches += 1;
            warn!(
                case,
                vars,
                clauses,
                engine = engine_word,
                oracle = oracle_word,
                "verdicts differ"
            );
            if let Some(dir) = &cfg.wrong_dir {
                save_wrong_case(dir, report.mismatches, &cnf, &engine_out, &oracle_out)?;
            }
            "mismatch"
        };
        if let Ok(SatResult::Sat(model)) = &engine_out {
            if !cnf.is_satisfied_by(model.values()) {
                report.unsound += 1;
                warn!(case, "engine model falsifies a clause");
                status = "unsound";
            }
        }

        let row = FuzzRow {
            case,
            vars,
            clauses,
            engine: engine_word.to_string(),
            oracle: oracle_word.to_string(),
            status: status.to_string(),
            wall_ms,
        };
        if cfg.progress {
            println!(
                "{:8} | {:6} | {:6} | {:8} | {}ms",
                row.case, row.vars, row.clauses, row.status, row.wall_ms
            );
        }
        if let Some(f) = csv.as_mut() {
            writeln!(f, "{}", row.to_csv_line())?;
        }
    }

    Ok(report)
}

pub fn outcome_word(outcome: &Result<SatResult, SatError>) -> &'static str {
    match outcome {
        Ok(SatResult::Sat(_)) => "SATISFIABLE",
        Ok(SatResult::Unsat) => "UNSATISFIABLE",
        Err(_) => "ERROR",
    }
}

fn render(outcome: &Result<SatResult, SatError>) -> Result<String> {
    let mut buf = Vec::new();
    match outcome {
        Ok(result) => write_result(&mut buf, result)?,
        Err(e) => {
            write_error(&mut buf)?;
            writeln!(buf, "c {}", e)?;
        }
    }
    Ok(String::from_utf8(buf)?)
}

fn save_wrong_case(
    dir: &Path,
    k: usize,
    cnf: &Cnf,
    engine_out: &Result<SatResult, SatError>,
    oracle_out: &Result<SatResult, SatError>,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    fs::write(dir.join(format!("case_{k}_input.cnf")), to_dimacs(cnf))?;
    fs::write(dir.join(format!("case_{k}_output_solver.txt")), render(engine_out)?)?;
    fs::write(dir.join(format!("case_{k}_output_oracle.txt")), render(oracle_out)?)?;
    Ok(())
}
