//! Property tests for the search engine on small random formulas.

use dpllsat::cnf::cnf::{Cnf, Lit};
use dpllsat::sat::assignment::{Assignment, Value};
use dpllsat::sat::brute::brute_force;
use dpllsat::sat::dpll::{
    PropagationMode, SatResult, Search, SolveOptions, has_conflict, solve, solve_with,
};
use proptest::prelude::*;

fn build_cnf(num_vars: u32, clauses: Vec<Vec<(u32, bool)>>) -> Cnf {
    let mut cnf = Cnf::new(num_vars);
    for clause in clauses {
        cnf.add_clause(clause.into_iter().map(|(v, s)| Lit::new(v, s)).collect());
    }
    cnf
}

/// Formulas over at most 8 variables with clauses of width 1..=3.
fn cnf_strategy() -> impl Strategy<Value = Cnf> {
    (1u32..=8).prop_flat_map(|n| {
        prop::collection::vec(
            prop::collection::vec((1..=n, any::<bool>()), 1..=3),
            0..=24,
        )
        .prop_map(move |clauses| build_cnf(n, clauses))
    })
}

/// A formula, a partial assignment over its variables and a search cursor.
fn cnf_with_partial() -> impl Strategy<Value = (Cnf, Vec<Option<bool>>, u32)> {
    cnf_strategy().prop_flat_map(|cnf| {
        let n = cnf.num_vars();
        (
            Just(cnf),
            prop::collection::vec(prop::option::weighted(0.3, any::<bool>()), n as usize),
            1..=n + 1,
        )
    })
}

fn to_assignment(values: &[Option<bool>]) -> Assignment {
    let mut asg = Assignment::new(values.len() as u32);
    for (idx, v) in values.iter().enumerate() {
        if let Some(b) = v {
            asg.set(idx as u32 + 1, Value::from_bool(*b));
        }
    }
    asg
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reported_models_satisfy_every_clause(cnf in cnf_strategy()) {
        if let SatResult::Sat(model) = solve(&cnf).expect("solve") {
            prop_assert_eq!(model.num_vars(), cnf.num_vars());
            prop_assert!(cnf.is_satisfied_by(model.values()));
        }
    }

    #[test]
    fn verdict_matches_exhaustive_search(cnf in cnf_strategy()) {
        let expected = matches!(brute_force(&cnf).expect("brute"), SatResult::Sat(_));
        let mut asg = Assignment::new(cnf.num_vars());
        let mut search = Search::new(&cnf, PropagationMode::SinglePass);
        prop_assert_eq!(search.run(&mut asg, 1), expected);
    }

    #[test]
    fn fixed_point_mode_agrees_with_single_pass(cnf in cnf_strategy()) {
        let opts = SolveOptions {
            propagation: PropagationMode::FixedPoint,
            stack_size: 8 * 1024 * 1024,
        };
        let fixed = solve_with(&cnf, &opts).expect("solve");
        let single = solve(&cnf).expect("solve");
        prop_assert_eq!(
            matches!(fixed.result, SatResult::Sat(_)),
            matches!(single, SatResult::Sat(_))
        );
        if let SatResult::Sat(model) = &fixed.result {
            prop_assert!(cnf.is_satisfied_by(model.values()));
        }
    }

    #[test]
    fn conflict_check_is_idempotent((cnf, partial, _cursor) in cnf_with_partial()) {
        let asg = to_assignment(&partial);
        let before = asg.clone();
        let first = has_conflict(&cnf, &asg);
        prop_assert_eq!(first, has_conflict(&cnf, &asg));
        prop_assert_eq!(asg, before);
    }

    #[test]
    fn failed_search_leaves_assignment_untouched((cnf, partial, cursor) in cnf_with_partial()) {
        let mut asg = to_assignment(&partial);
        let before = asg.clone();
        let mut search = Search::new(&cnf, PropagationMode::SinglePass);
        if search.run(&mut asg, cursor) {
            prop_assert!(!has_conflict(&cnf, &asg));
        } else {
            prop_assert_eq!(asg, before);
        }
    }

    #[test]
    fn failed_fixed_point_search_leaves_assignment_untouched(
        (cnf, partial, cursor) in cnf_with_partial()
    ) {
        let mut asg = to_assignment(&partial);
        let before = asg.clone();
        let mut search = Search::new(&cnf, PropagationMode::FixedPoint);
        if !search.run(&mut asg, cursor) {
            prop_assert_eq!(asg, before);
        }
    }

    #[test]
    fn tautologies_never_change_the_verdict(
        cnf in cnf_strategy(),
        var_seed in any::<u32>(),
    ) {
        let var = var_seed % cnf.num_vars() + 1;
        let mut with_taut = cnf.clone();
        prop_assert!(!with_taut.add_clause(vec![Lit::new(var, true), Lit::new(var, false)]));
        prop_assert_eq!(with_taut.clauses(), cnf.clauses());
        prop_assert_eq!(
            matches!(solve(&with_taut).expect("solve"), SatResult::Sat(_)),
            matches!(solve(&cnf).expect("solve"), SatResult::Sat(_))
        );
    }
}
