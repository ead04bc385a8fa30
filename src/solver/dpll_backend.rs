use crate::cnf::cnf::Cnf;
use crate::error::SatError;
use crate::sat::dpll::{SatResult, SolveOptions, solve_with};
use crate::solver::{SatBackend, SolverStats};

#[derive(Debug, Clone, Default)]
pub struct DpllSolverBackend {
    opts: SolveOptions,
    stats: SolverStats,
}

impl DpllSolverBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(opts: SolveOptions) -> Self {
        Self {
            opts,
            stats: SolverStats::default(),
        }
    }
}

impl SatBackend for DpllSolverBackend {
    fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, SatError> {
        self.stats.solve_calls += 1;
        let out = solve_with(cnf, &self.opts)?;
        let search = &mut self.stats.search;
        search.decisions += out.stats.decisions;
        search.propagations += out.stats.propagations;
        search.pure_assignments += out.stats.pure_assignments;
        search.conflicts += out.stats.conflicts;
        Ok(out.result)
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "dpll"
    }
}
