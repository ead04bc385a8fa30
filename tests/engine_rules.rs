use dpllsat::cnf::cnf::{Cnf, Lit};
use dpllsat::sat::assignment::{Assignment, Value};
use dpllsat::sat::dpll::{
    PropagationMode, Search, SolveOptions, find_pure_literals, find_unit_literals, has_conflict,
    solve_with,
};

fn lit(v: i64) -> Lit {
    Lit::from_dimacs(v).expect("nonzero literal")
}

fn cnf_from(num_vars: u32, clauses: &[&[i64]]) -> Cnf {
    let mut cnf = Cnf::new(num_vars);
    for clause in clauses {
        cnf.add_clause(clause.iter().map(|&v| lit(v)).collect());
    }
    cnf
}

#[test]
fn conflict_needs_every_literal_false() {
    let cnf = cnf_from(2, &[&[1, 2]]);
    let mut asg = Assignment::new(2);
    assert!(!has_conflict(&cnf, &asg));

    asg.set(1, Value::False);
    assert!(!has_conflict(&cnf, &asg));

    asg.set(2, Value::False);
    assert!(has_conflict(&cnf, &asg));
    assert!(has_conflict(&cnf, &asg));

    asg.set(2, Value::True);
    assert!(!has_conflict(&cnf, &asg));
}

#[test]
fn empty_clause_is_always_a_conflict() {
    let cnf = cnf_from(1, &[&[1], &[]]);
    assert!(has_conflict(&cnf, &Assignment::new(1)));
}

#[test]
fn unit_literals_keep_clause_order_and_repeats() {
    let cnf = cnf_from(5, &[&[1, 2], &[1, -2], &[3, 4, 5], &[1, 2, 3], &[2, 1]]);
    let mut asg = Assignment::new(5);
    asg.set(1, Value::False);

    let units = find_unit_literals(&cnf, &asg);
    assert_eq!(units, vec![lit(2), lit(-2), lit(2)]);
}

#[test]
fn satisfied_clauses_yield_no_units() {
    let cnf = cnf_from(2, &[&[1, 2]]);
    let mut asg = Assignment::new(2);
    asg.set(2, Value::True);
    assert!(find_unit_literals(&cnf, &asg).is_empty());
}

#[test]
fn pure_literals_track_open_occurrences() {
    let cnf = cnf_from(4, &[&[1, 2], &[1, -3], &[-2, -3]]);
    let mut asg = Assignment::new(4);
    // var 4 never occurs and is not reported
    assert_eq!(find_pure_literals(&cnf, &asg), vec![lit(1), lit(-3)]);

    asg.set(2, Value::True);
    assert_eq!(find_pure_literals(&cnf, &asg), vec![lit(1), lit(-3)]);

    asg.set(2, Value::Unassigned);
    asg.set(3, Value::False);
    assert_eq!(find_pure_literals(&cnf, &asg), vec![lit(1), lit(2)]);
}

#[test]
fn pure_literal_is_fixed_before_branching() {
    let cnf = cnf_from(2, &[&[1, 2], &[1, -2]]);
    let mut asg = Assignment::new(2);
    let mut search = Search::new(&cnf, PropagationMode::SinglePass);
    assert!(search.run(&mut asg, 1));
    assert_eq!(asg.get(1), Value::True);
    assert_eq!(search.stats().pure_assignments, 1);
    assert_eq!(search.stats().decisions, 1);
}

#[test]
fn unit_is_propagated_before_branching() {
    let cnf = cnf_from(2, &[&[1]]);
    let mut asg = Assignment::new(2);
    let mut search = Search::new(&cnf, PropagationMode::SinglePass);
    assert!(search.run(&mut asg, 1));
    assert_eq!(asg.get(1), Value::True);
    assert_eq!(search.stats().propagations, 1);
}

#[test]
fn failing_search_restores_assignment() {
    let cnf = cnf_from(4, &[&[1, 2], &[1, -2], &[-1, 3], &[-1, -3], &[2, 4]]);
    let mut asg = Assignment::new(4);
    asg.set(4, Value::False);
    let before = asg.clone();

    let mut search = Search::new(&cnf, PropagationMode::SinglePass);
    assert!(!search.run(&mut asg, 1));
    assert_eq!(asg, before);
}

#[test]
fn conflicting_units_roll_back() {
    let cnf = cnf_from(3, &[&[1], &[-1], &[2, 3]]);
    let mut asg = Assignment::new(3);
    let mut search = Search::new(&cnf, PropagationMode::SinglePass);
    assert!(!search.run(&mut asg, 1));
    assert_eq!(asg, Assignment::new(3));
    assert_eq!(search.stats().decisions, 0);
}

#[test]
fn cursor_past_last_var_checks_conflict_only() {
    let cnf = cnf_from(2, &[&[1, 2]]);
    let mut asg = Assignment::new(2);
    asg.set(1, Value::False);
    asg.set(2, Value::True);
    let mut search = Search::new(&cnf, PropagationMode::SinglePass);
    assert!(search.run(&mut asg, 3));

    asg.set(2, Value::False);
    let before = asg.clone();
    assert!(!search.run(&mut asg, 3));
    assert_eq!(asg, before);
}

#[test]
fn fixed_point_propagation_resolves_chain_without_decisions() {
    let cnf = cnf_from(4, &[&[1], &[-1, 2], &[-2, 3], &[-3, 4]]);

    let single = solve_with(
        &cnf,
        &SolveOptions {
            propagation: PropagationMode::SinglePass,
            ..SolveOptions::default()
        },
    )
    .expect("solve");
    let fixed = solve_with(
        &cnf,
        &SolveOptions {
            propagation: PropagationMode::FixedPoint,
            ..SolveOptions::default()
        },
    )
    .expect("solve");

    assert_eq!(single.stats.decisions, 1);
    assert_eq!(fixed.stats.decisions, 0);
    assert_eq!(fixed.stats.propagations, 4);
    assert_eq!(single.result, fixed.result);
}
