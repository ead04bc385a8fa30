use varisat::ExtendFormula;

use crate::cnf::cnf::{Cnf, Lit};
use crate::error::SatError;
use crate::sat::dpll::{Model, SatResult};
use crate::solver::{SatBackend, SolverStats};

/// CDCL reference solver. A fresh `varisat::Solver` is built per call.
#[derive(Debug, Clone, Default)]
pub struct VarisatSolver {
    stats: SolverStats,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_lit(lit: Lit) -> varisat::Lit {
    varisat::Lit::from_var(varisat::Var::from_dimacs(lit.var() as isize), lit.sign())
}

impl SatBackend for VarisatSolver {
    fn solve(&mut self, cnf: &Cnf) -> Result<SatResult, SatError> {
        cnf.ensure_nondegenerate()?;
        self.stats.solve_calls += 1;

        let mut inner = varisat::Solver::new();
        for clause in cnf.clauses() {
            let lits = clause.lits().iter().copied().map(to_lit).collect::<Vec<_>>();
            inner.add_clause(&lits);
        }

        match inner.solve() {
            Ok(true) => {
                // variables absent from every clause are not in the model
                let mut values = vec![false; cnf.num_vars() as usize];
                for lit in inner.model().unwrap_or_default() {
                    if let Some(v) = values.get_mut(lit.var().index()) {
                        *v = lit.is_positive();
                    }
                }
                Ok(SatResult::Sat(Model::from_values(values)))
            }
            Ok(false) => Ok(SatResult::Unsat),
            Err(e) => Err(SatError::InternalInconsistency(format!(
                "varisat failed: {}",
                e
            ))),
        }
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "varisat"
    }
}
