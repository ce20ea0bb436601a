//! 1-UIP conflict analysis.
//!
//! Walks the trail backwards from the conflicting clause, resolving away
//! every literal assigned at the current decision level until exactly one
//! remains (the "first unique implication point"). That literal's negation
//! becomes the asserting literal of the learned clause, and the learned
//! clause backjumps to the second-highest decision level among its other
//! literals.
//!
//! Every clause resolved through during the walk — not only the initial
//! conflict clause — contributes its lower-level literals to the learned
//! clause, since any of them may be the only reason a later resolution step
//! was needed.
use satkit_formula::Lit;

use super::assignment::{Assignment, Reason};
use super::clause::ClauseDb;
use super::vsids::Vsids;

/// Returns the learned clause (asserting literal first) and the decision
/// level to backjump to.
pub fn analyze(
    assignment: &Assignment,
    clauses: &mut ClauseDb,
    vsids: &mut Vsids,
    conflict: usize,
) -> (Vec<Lit>, usize) {
    let current_level = assignment.decision_level();
    let mut seen = vec![false; assignment.var_count()];
    let mut learned: Vec<Lit> = vec![Lit::from_index(0, true)];
    let mut counter = 0usize;
    let mut trail_cursor = assignment.trail.len();
    let mut reason_clause = conflict;
    let mut resolving_lit: Option<Lit> = None;

    loop {
        clauses.bump(reason_clause);
        for &lit in &clauses.get(reason_clause).literals {
            if Some(lit) == resolving_lit {
                continue;
            }
            let var = lit.var();
            if seen[var.index()] {
                continue;
            }
            seen[var.index()] = true;
            vsids.bump(var);

            let level = assignment.level(var);
            if level == current_level {
                counter += 1;
            } else if level > 0 {
                learned.push(lit);
            }
        }

        loop {
            trail_cursor -= 1;
            let lit = assignment.trail[trail_cursor];
            if seen[lit.var().index()] {
                resolving_lit = Some(lit);
                break;
            }
        }
        let uip_var = resolving_lit.unwrap().var();
        seen[uip_var.index()] = false;
        counter -= 1;
        if counter == 0 {
            break;
        }
        reason_clause = match assignment.reason(uip_var) {
            Reason::Clause(index) => index,
            Reason::Decision => unreachable!("1-UIP stops before resolving a decision"),
        };
    }

    let asserting = !resolving_lit.unwrap();
    learned[0] = asserting;

    let backjump_level = move_second_watch(&mut learned, assignment);
    (learned, backjump_level)
}

/// Finds the literal with the highest decision level among `learned[1..]`,
/// swaps it into position 1 (so the learned clause's two watches are its
/// asserting literal and the literal that will become unassigned last), and
/// returns that level as the backjump target. Returns `0` for a unit
/// learned clause.
fn move_second_watch(learned: &mut [Lit], assignment: &Assignment) -> usize {
    if learned.len() <= 1 {
        return 0;
    }
    let (max_offset, _) = learned[1..]
        .iter()
        .enumerate()
        .max_by_key(|&(_, &lit)| assignment.level(lit.var()))
        .expect("learned.len() > 1");
    let max_index = max_offset + 1;
    learned.swap(1, max_index);
    assignment.level(learned[1].var())
}
