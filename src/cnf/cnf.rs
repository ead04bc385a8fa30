use std::fmt;

use crate::error::SatError;

/// A literal: a 1-based variable index plus polarity (`sign == true` asserts the variable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    var: u32,
    sign: bool,
}

impl Lit {
    /// Panics when `var` is 0; use [`Lit::from_dimacs`] for untrusted input.
    pub fn new(var: u32, sign: bool) -> Self {
        assert!(var >= 1, "variables are 1-based");
        Self { var, sign }
    }

    pub fn var(self) -> u32 {
        self.var
    }

    pub fn sign(self) -> bool {
        self.sign
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }

    /// Builds a literal from its signed DIMACS form. Returns `None` for `0`
    /// and for magnitudes that do not fit a variable index.
    pub fn from_dimacs(value: i64) -> Option<Self> {
        if value == 0 {
            return None;
        }
        let var = u32::try_from(value.unsigned_abs()).ok()?;
        Some(Self::new(var, value > 0))
    }

    pub fn to_dimacs(self) -> i64 {
        let v = self.var as i64;
        if self.sign { v } else { -v }
    }

    /// Truth value of this literal when its variable takes `value`.
    pub fn eval(self, value: bool) -> bool {
        value == self.sign
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A clause with no duplicate literal and no complementary pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Normalizes `lits` into a clause. Returns `None` when the clause is a
    /// tautology (contains both `l` and `-l`).
    pub fn new(mut lits: Vec<Lit>) -> Option<Self> {
        // sorted by variable, so duplicates and complements are adjacent
        lits.sort_unstable();
        lits.dedup();
        if lits.windows(2).any(|w| w[0].var == w[1].var) {
            return None;
        }
        Some(Self { lits })
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn max_var(&self) -> u32 {
        self.lits.iter().map(|l| l.var).max().unwrap_or(0)
    }

    /// Evaluates the clause against a total assignment, `values[v - 1]` being variable `v`.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        self.lits.iter().any(|&lit| {
            (lit.var as usize)
                .checked_sub(1)
                .and_then(|idx| values.get(idx))
                .is_some_and(|&v| lit.eval(v))
        })
    }
}

/// A CNF instance. Every literal's variable lies in `[1, num_vars]`; clauses
/// keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<Clause>,
    dropped_tautologies: usize,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
            dropped_tautologies: 0,
        }
    }

    /// Adds a clause, growing `num_vars` to cover its variables. Tautologies
    /// are counted and dropped; returns whether the clause was kept.
    pub fn add_clause(&mut self, lits: Vec<Lit>) -> bool {
        match Clause::new(lits) {
            Some(clause) => {
                self.num_vars = self.num_vars.max(clause.max_var());
                self.clauses.push(clause);
                true
            }
            None => {
                self.dropped_tautologies += 1;
                false
            }
        }
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn dropped_tautologies(&self) -> usize {
        self.dropped_tautologies
    }

    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Clause::len).max().unwrap_or(0)
    }

    pub fn ensure_nondegenerate(&self) -> Result<(), SatError> {
        if self.num_vars == 0 {
            return Err(SatError::DegenerateInstance {
                num_vars: self.num_vars,
            });
        }
        Ok(())
    }

    /// True when every clause has a literal made true by `values`.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        values.len() == self.num_vars as usize
            && self.clauses.iter().all(|c| c.is_satisfied_by(values))
    }
}
