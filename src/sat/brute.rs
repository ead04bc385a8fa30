use crate::cnf::cnf::Cnf;
use crate::error::SatError;

use super::dpll::{Model, SatResult};

pub const MAX_BRUTE_VARS: u32 = 24;

/// Enumerates every total assignment in counting order, variable 1 being the
/// lowest bit. Used as a reference verdict for small instances.
pub fn brute_force(cnf: &Cnf) -> Result<SatResult, SatError> {
    cnf.ensure_nondegenerate()?;
    let n = cnf.num_vars();
    if n > MAX_BRUTE_VARS {
        return Err(SatError::TooLarge {
            num_vars: n,
            limit: MAX_BRUTE_VARS,
        });
    }

    let mut values = vec![false; n as usize];
    for bits in 0u64..(1u64 << n) {
        for (i, v) in values.iter_mut().enumerate() {
            *v = (bits >> i) & 1 == 1;
        }
        if cnf.is_satisfied_by(&values) {
            return Ok(SatResult::Sat(Model::from_values(values)));
        }
    }
    Ok(SatResult::Unsat)
}

