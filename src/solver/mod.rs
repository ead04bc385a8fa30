pub mod brute_backend;
pub mod dpll_backend;
pub mod varisat;

use anyhow::{Result, bail};

use crate::cnf::cnf::Cnf;
use crate::error::SatError;
use crate::sat::dpll::{SatResult, SearchStats, SolveOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub solve_calls: usize,
    pub search: SearchStats,
}

/// A complete decision procedure for CNF instances.
pub trait SatBackend {
    fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, SatError>;
    fn stats(&self) -> SolverStats;
    fn backend_name(&self) -> &'static str;
}

pub fn backend_from_name(name: &str, opts: SolveOptions) -> Result<Box<dyn SatBackend>> {
    match name {
        "dpll" => Ok(Box::new(dpll_backend::DpllSolverBackend::with_options(opts))),
        "varisat" => Ok(Box::new(varisat::VarisatSolver::new())),
        "brute" => Ok(Box::new(brute_backend::BruteForceBackend::new())),
        _ => bail!("unknown backend '{}', expected dpll|varisat|brute", name),
    }
}
