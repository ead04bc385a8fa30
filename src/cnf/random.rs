use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::cnf::{Cnf, Lit};

/// Draws a clause width: 1 with probability 0.01, 2 with 0.30, otherwise 3.
fn sample_width<R: Rng + ?Sized>(rng: &mut R) -> usize {
    let x = rng.random::<f64>();
    if x < 0.01 {
        1
    } else if x < 0.31 {
        2
    } else {
        3
    }
}

/// Random mixed-width CNF over distinct variables per clause. Widths are
/// capped at `num_vars`, so a zero-variable instance gets empty clauses.
pub fn generate_random_cnf<R: Rng + ?Sized>(
    num_vars: u32,
    num_clauses: usize,
    rng: &mut R,
) -> Cnf {
    let mut cnf = Cnf::new(num_vars);
    for _ in 0..num_clauses {
        let width = sample_width(rng).min(num_vars as usize);
        let picked = rand::seq::index::sample(rng, num_vars as usize, width);
        let clause = picked
            .iter()
            .map(|idx| Lit::new(idx as u32 + 1, rng.random::<bool>()))
            .collect::<Vec<_>>();
        cnf.add_clause(clause);
    }
    cnf
}

pub fn generate_seeded(num_vars: u32, num_clauses: usize, seed: u64) -> Cnf {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_random_cnf(num_vars, num_clauses, &mut rng)
}
