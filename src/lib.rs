//! DPLL satisfiability checking for CNF formulas: DIMACS input, a backtracking
//! search with unit propagation and pure-literal elimination, and reference
//! backends for cross-checking verdicts.

pub mod cnf;
pub mod error;
pub mod fuzz;
pub mod sat;
pub mod solver;
