use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::cnf::{Cnf, Lit};
use crate::error::SatError;
use crate::sat::dpll::{Model, SatResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    vars: i64,
    clauses: i64,
}

pub fn load_cnf(path: impl AsRef<Path>) -> Result<Cnf, SatError> {
    let file = File::open(path.as_ref())?;
    parse_dimacs_reader(BufReader::new(file))
}

pub fn parse_dimacs_str(s: &str) -> Result<Cnf, SatError> {
    parse_dimacs_reader(std::io::Cursor::new(s.as_bytes()))
}

/// Reads a DIMACS CNF instance. Lines before the problem line are skipped; the
/// effective variable count is the larger of the declared count and the
/// highest variable referenced. Without a problem line the result has zero
/// variables.
pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<Cnf, SatError> {
    let mut header = None::<Header>;
    let mut raw_clauses = Vec::<Vec<Lit>>::new();

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('c') {
            continue;
        }
        if clean.starts_with('p') {
            if header.is_some() {
                return Err(SatError::parse(line_no, "duplicate problem line"));
            }
            header = Some(parse_header(clean, line_no)?);
            continue;
        }
        if header.is_none() {
            continue;
        }
        if clean.starts_with('%') {
            // SATLIB trailer
            break;
        }
        raw_clauses.push(parse_clause_line(clean, line_no)?);
    }

    let Some(header) = header else {
        debug!("no problem line found");
        return Ok(Cnf::new(0));
    };

    let declared_vars = u32::try_from(header.vars.max(0)).unwrap_or(u32::MAX);
    if header.clauses != raw_clauses.len() as i64 {
        warn!(
            declared = header.clauses,
            actual = raw_clauses.len(),
            "clause count differs from problem line"
        );
    }

    let mut cnf = Cnf::new(declared_vars);
    for clause in raw_clauses {
        cnf.add_clause(clause);
    }
    debug!(
        declared_vars = header.vars,
        vars = cnf.num_vars(),
        clauses = cnf.clauses().len(),
        tautologies = cnf.dropped_tautologies(),
        "parsed dimacs"
    );
    Ok(cnf)
}

fn parse_header(line: &str, line_no: usize) -> Result<Header, SatError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 4 || parts[0] != "p" {
        return Err(SatError::parse(line_no, "expected 'p cnf <vars> <clauses>'"));
    }
    if parts[1] != "cnf" {
        return Err(SatError::parse(
            line_no,
            format!("unsupported format '{}', expected 'cnf'", parts[1]),
        ));
    }
    let vars = parts[2]
        .parse::<i64>()
        .map_err(|_| SatError::parse(line_no, format!("invalid variable count '{}'", parts[2])))?;
    let clauses = parts[3]
        .parse::<i64>()
        .map_err(|_| SatError::parse(line_no, format!("invalid clause count '{}'", parts[3])))?;
    if vars > i64::from(u32::MAX) {
        return Err(SatError::parse(
            line_no,
            format!("variable count {} out of range", vars),
        ));
    }
    Ok(Header { vars, clauses })
}

fn parse_clause_line(line: &str, line_no: usize) -> Result<Vec<Lit>, SatError> {
    let mut lits = Vec::new();
    let mut tokens = line.split_whitespace();
    while let Some(tok) = tokens.next() {
        let value = tok
            .parse::<i64>()
            .map_err(|_| SatError::parse(line_no, format!("invalid literal '{}'", tok)))?;
        if value == 0 {
            if let Some(extra) = tokens.next() {
                return Err(SatError::parse(
                    line_no,
                    format!("unexpected '{}' after terminating 0", extra),
                ));
            }
            return Ok(lits);
        }
        let lit = Lit::from_dimacs(value)
            .ok_or_else(|| SatError::parse(line_no, format!("literal {} out of range", value)))?;
        lits.push(lit);
    }
    Err(SatError::parse(line_no, "clause is not terminated by 0"))
}

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars(), cnf.clauses().len()));
    for clause in cnf.clauses() {
        for &lit in clause.lits() {
            out.push_str(&format!("{} ", lit));
        }
        out.push_str("0\n");
    }
    out
}

pub fn write_cnf(path: impl AsRef<Path>, cnf: &Cnf) -> Result<(), SatError> {
    std::fs::write(path, to_dimacs(cnf))?;
    Ok(())
}

pub fn verdict_word(result: &SatResult) -> &'static str {
    match result {
        SatResult::Sat(_) => "SATISFIABLE",
        SatResult::Unsat => "UNSATISFIABLE",
    }
}

/// `v <lit_1> ... <lit_n> 0`, one literal per variable in increasing order.
pub fn model_line(model: &Model) -> String {
    let mut out = String::from("v");
    for lit in model.lits() {
        out.push_str(&format!(" {}", lit));
    }
    out.push_str(" 0");
    out
}

pub fn write_result(w: &mut impl Write, result: &SatResult) -> std::io::Result<()> {
    writeln!(w, "s {}", verdict_word(result))?;
    if let SatResult::Sat(model) = result {
        writeln!(w, "{}", model_line(model))?;
    }
    Ok(())
}

pub fn write_error(w: &mut impl Write) -> std::io::Result<()> {
    writeln!(w, "s ERROR")
}
