//! Learned-clause database reduction.
//!
//! Once the number of learned clauses crosses the configured limit, the
//! least-active half is deleted. Deletion is lazy: clauses are only marked
//! `deleted` and skipped by propagation, since removing them outright would
//! invalidate the clause indices stored as [`super::assignment::Reason::Clause`]
//! antecedents on the trail.
//!
//! Only *learned* clauses are ever candidates — original clauses are
//! collected into a separate, never-sorted set first, so a run of unlucky
//! activity values can never cause an original clause to be deleted.
use super::assignment::{Assignment, Reason};
use super::clause::ClauseDb;

pub fn reduce(clauses: &mut ClauseDb, assignment: &Assignment) {
    let mut learned_indices: Vec<usize> = clauses
        .iter()
        .filter(|&(_, clause)| clause.learned && !clause.deleted)
        .map(|(index, _)| index)
        .collect();

    learned_indices.sort_by(|&a, &b| {
        clauses
            .get(a)
            .activity
            .partial_cmp(&clauses.get(b).activity)
            .expect("clause activities are never NaN")
    });

    let target = learned_indices.len() / 2;
    let mut removed = 0;
    for index in learned_indices {
        if removed >= target {
            break;
        }
        if is_locked(clauses, assignment, index) {
            continue;
        }
        clauses.get_mut(index).deleted = true;
        removed += 1;
    }
}

/// A clause is locked if it is the reason some currently-assigned variable
/// holds its value; deleting it would leave that assignment unexplained.
fn is_locked(clauses: &ClauseDb, assignment: &Assignment, index: usize) -> bool {
    let clause = clauses.get(index);
    let Some(&first) = clause.literals.first() else {
        return false;
    };
    let var = first.var();
    assignment.is_assigned(var) && assignment.reason(var) == Reason::Clause(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdcl::clause::Clause;
    use satkit_formula::Lit;

    fn lit(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn deletes_low_activity_half_but_keeps_originals() {
        let mut clauses = ClauseDb::default();
        let original = clauses.add(Clause::original(vec![lit(1), lit(2)]));
        let low = clauses.add(Clause::learned(vec![lit(1), lit(3)]));
        let high = clauses.add(Clause::learned(vec![lit(2), lit(3)]));
        clauses.bump(high);
        clauses.bump(high);
        clauses.bump(low);

        let assignment = Assignment::default();
        reduce(&mut clauses, &assignment);

        assert!(!clauses.get(original).deleted);
        assert!(clauses.get(low).deleted);
        assert!(!clauses.get(high).deleted);
    }

    #[test]
    fn never_deletes_a_locked_clause() {
        let mut clauses = ClauseDb::default();
        let locked = clauses.add(Clause::learned(vec![lit(1), lit(2)]));

        let mut assignment = Assignment::default();
        assignment.set_var_count(2);
        assignment.assign(lit(1), Reason::Clause(locked));

        reduce(&mut clauses, &assignment);
        assert!(!clauses.get(locked).deleted);
    }
}
