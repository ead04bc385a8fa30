use std::time::Instant;

use tracing::{info, trace};

use crate::cnf::cnf::{Cnf, Lit};
use crate::error::SatError;
use crate::sat::assignment::{Assignment, UndoLog, Value};

/// A satisfying total assignment, `values()[v - 1]` being variable `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn value(&self, var: u32) -> Option<bool> {
        let idx = (var as usize).checked_sub(1)?;
        self.values.get(idx).copied()
    }

    pub fn num_vars(&self) -> u32 {
        self.values.len() as u32
    }

    /// One literal per variable in increasing variable order.
    pub fn lits(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, &v)| Lit::new(idx as u32 + 1, v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    Sat(Model),
    Unsat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationMode {
    /// One unit-propagation pass per search node.
    #[default]
    SinglePass,
    /// Repeat unit propagation until no new unit literal appears.
    FixedPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    pub propagation: PropagationMode,
    /// Stack size of the search thread in bytes.
    pub stack_size: usize,
}

pub const DEFAULT_STACK_SIZE: usize = 64 * 1024 * 1024;

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            propagation: PropagationMode::SinglePass,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub decisions: usize,
    pub propagations: usize,
    pub pure_assignments: usize,
    pub conflicts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutput {
    pub result: SatResult,
    pub stats: SearchStats,
    pub elapsed_ms: u128,
}

pub fn solve(cnf: &Cnf) -> Result<SatResult, SatError> {
    solve_with(cnf, &SolveOptions::default()).map(|out| out.result)
}

pub fn is_sat(cnf: &Cnf) -> Result<bool, SatError> {
    Ok(matches!(solve(cnf)?, SatResult::Sat(_)))
}

pub fn solve_model(cnf: &Cnf) -> Result<Option<Model>, SatError> {
    match solve(cnf)? {
        SatResult::Sat(m) => Ok(Some(m)),
        SatResult::Unsat => Ok(None),
    }
}

/// Runs the search on a dedicated thread sized by `opts.stack_size`; recursion
/// depth grows with the variable count.
pub fn solve_with(cnf: &Cnf, opts: &SolveOptions) -> Result<SolveOutput, SatError> {
    cnf.ensure_nondegenerate()?;
    info!(
        vars = cnf.num_vars(),
        clauses = cnf.clauses().len(),
        mode = ?opts.propagation,
        "starting search"
    );

    let started = Instant::now();
    let (found, assignment, stats) = std::thread::scope(|scope| -> Result<_, SatError> {
        let handle = std::thread::Builder::new()
            .name("dpll-search".to_string())
            .stack_size(opts.stack_size)
            .spawn_scoped(scope, || {
                let mut assignment = Assignment::new(cnf.num_vars());
                let mut search = Search::new(cnf, opts.propagation);
                let found = search.run(&mut assignment, 1);
                (found, assignment, search.stats())
            })?;
        handle
            .join()
            .map_err(|_| SatError::InternalInconsistency("search thread panicked".to_string()))
    })?;
    let elapsed_ms = started.elapsed().as_millis();

    let result = if found {
        let model = Model::from_values(assignment.to_values());
        if !cnf.is_satisfied_by(model.values()) {
            return Err(SatError::InternalInconsistency(
                "search reported a model that falsifies a clause".to_string(),
            ));
        }
        SatResult::Sat(model)
    } else {
        SatResult::Unsat
    };

    info!(
        sat = found,
        decisions = stats.decisions,
        propagations = stats.propagations,
        pure = stats.pure_assignments,
        conflicts = stats.conflicts,
        elapsed_ms,
        "search finished"
    );
    Ok(SolveOutput {
        result,
        stats,
        elapsed_ms,
    })
}

/// True when some clause has every literal false under `assignment`.
pub fn has_conflict(cnf: &Cnf, assignment: &Assignment) -> bool {
    cnf.clauses().iter().any(|clause| {
        let mut open = false;
        for &lit in clause.lits() {
            match assignment.eval(lit) {
                Some(true) => return false,
                Some(false) => {}
                None => open = true,
            }
        }
        !open
    })
}

/// The single open literal of every unsatisfied clause that has exactly one,
/// in clause order. Repeats and contradictions are left to the caller.
pub fn find_unit_literals(cnf: &Cnf, assignment: &Assignment) -> Vec<Lit> {
    let mut units = Vec::new();
    'clauses: for clause in cnf.clauses() {
        let mut open = None::<Lit>;
        for &lit in clause.lits() {
            match assignment.eval(lit) {
                Some(true) => continue 'clauses,
                Some(false) => {}
                None if open.is_some() => continue 'clauses,
                None => open = Some(lit),
            }
        }
        if let Some(lit) = open {
            units.push(lit);
        }
    }
    units
}

/// Literals of unassigned variables that occur with one polarity only among
/// the open literals of unsatisfied clauses, in variable order.
pub fn find_pure_literals(cnf: &Cnf, assignment: &Assignment) -> Vec<Lit> {
    let n = cnf.num_vars() as usize;
    let mut pos = vec![false; n + 1];
    let mut neg = vec![false; n + 1];

    for clause in cnf.clauses() {
        let satisfied = clause
            .lits()
            .iter()
            .any(|&lit| assignment.eval(lit) == Some(true));
        if satisfied {
            continue;
        }
        for &lit in clause.lits() {
            if assignment.is_assigned(lit.var()) {
                continue;
            }
            if lit.sign() {
                pos[lit.var() as usize] = true;
            } else {
                neg[lit.var() as usize] = true;
            }
        }
    }

    (1..=cnf.num_vars())
        .filter(|&var| !assignment.is_assigned(var))
        .filter_map(|var| match (pos[var as usize], neg[var as usize]) {
            (true, false) => Some(Lit::new(var, true)),
            (false, true) => Some(Lit::new(var, false)),
            _ => None,
        })
        .collect()
}

/// Depth-first search over one shared assignment. A call that returns `false`
/// leaves the assignment exactly as it found it.
pub struct Search<'a> {
    cnf: &'a Cnf,
    mode: PropagationMode,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub fn new(cnf: &'a Cnf, mode: PropagationMode) -> Self {
        Self {
            cnf,
            mode,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches for a completion of `assignment`, branching only on variables
    /// `>= cursor`. On success the assignment holds the model.
    pub fn run(&mut self, assignment: &mut Assignment, cursor: u32) -> bool {
        if has_conflict(self.cnf, assignment) {
            self.stats.conflicts += 1;
            return false;
        }

        let mut undo = UndoLog::new();
        if !self.propagate_units(assignment, &mut undo) {
            self.stats.conflicts += 1;
            return false;
        }
        self.assign_pure_literals(assignment, &mut undo);

        let next = if cursor > self.cnf.num_vars() {
            None
        } else {
            assignment.next_unassigned(cursor)
        };
        let Some(var) = next else {
            if has_conflict(self.cnf, assignment) {
                self.stats.conflicts += 1;
                undo.rollback(assignment);
                return false;
            }
            return true;
        };

        self.stats.decisions += 1;
        for value in [Value::True, Value::False] {
            assignment.set(var, value);
            if self.run(assignment, var + 1) {
                return true;
            }
        }

        assignment.set(var, Value::Unassigned);
        undo.rollback(assignment);
        trace!(var, cursor, "backtracked");
        false
    }

    /// Applies unit literals; on conflict rolls back everything in `undo` and
    /// returns false.
    fn propagate_units(&mut self, assignment: &mut Assignment, undo: &mut UndoLog) -> bool {
        loop {
            let mut progressed = false;
            for lit in find_unit_literals(self.cnf, assignment) {
                if assignment.is_assigned(lit.var()) {
                    continue;
                }
                undo.assign(assignment, lit);
                self.stats.propagations += 1;
                progressed = true;
                if has_conflict(self.cnf, assignment) {
                    undo.rollback(assignment);
                    return false;
                }
            }
            if self.mode == PropagationMode::SinglePass || !progressed {
                return true;
            }
        }
    }

    fn assign_pure_literals(&mut self, assignment: &mut Assignment, undo: &mut UndoLog) {
        for lit in find_pure_literals(self.cnf, assignment) {
            if !assignment.is_assigned(lit.var()) {
                undo.assign(assignment, lit);
                self.stats.pure_assignments += 1;
            }
        }
    }
}
