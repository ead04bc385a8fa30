use crate::cnf::cnf::Cnf;
use crate::error::SatError;
use crate::sat::brute::brute_force;
use crate::sat::dpll::SatResult;
use crate::solver::{SatBackend, SolverStats};

#[derive(Debug, Clone, Default)]
pub struct BruteForceBackend {
    stats: SolverStats,
}

impl BruteForceBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SatBackend for BruteForceBackend {
    fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, SatError> {
        self.stats.solve_calls += 1;
        brute_force(cnf)
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "brute"
    }
}
