//! The Davis-Putnam backend: kernel preprocessing alternated with
//! best-scored binary resolution until a fixed point.
use satkit_formula::Lit;

use crate::dpll::complete_assignment;
use crate::kernel::{FormulaKernel, PropOutcome};

/// Solves `clauses` with the Davis-Putnam procedure.
pub fn solve(clauses: Vec<Vec<Lit>>, var_count: usize) -> Option<Vec<Lit>> {
    let mut kernel = FormulaKernel::new(clauses);

    loop {
        let count_before = kernel.clauses().len();

        if kernel.unit_propagate() == PropOutcome::Conflict {
            return None;
        }
        if kernel.clauses().is_empty() {
            return Some(complete_assignment(kernel.assignment(), var_count));
        }

        if kernel.eliminate_pure_literals() == PropOutcome::Conflict {
            return None;
        }
        if kernel.clauses().is_empty() {
            return Some(complete_assignment(kernel.assignment(), var_count));
        }

        if kernel.clauses().len() == count_before {
            match resolution_step(kernel.clauses()) {
                Some(resolvent) => kernel.add_clause(resolvent),
                None => return Some(finish_unconstrained(&kernel, var_count)),
            }
        }
    }
}

/// Picks the lowest-scored clause pair sharing a complementary literal and
/// returns their resolvent, skipping tautologies and duplicates of
/// existing clauses. Returns `None` once no candidate pair yields a new
/// clause, meaning the set is closed under resolution.
fn resolution_step(clauses: &[Vec<Lit>]) -> Option<Vec<Lit>> {
    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
    for i in 0..clauses.len() {
        for j in (i + 1)..clauses.len() {
            if clauses[i].iter().any(|&l| clauses[j].contains(&!l)) {
                candidates.push((clauses[i].len() + clauses[j].len(), i, j));
            }
        }
    }
    candidates.sort_by_key(|&(score, i, j)| (score, i, j));

    for (_, i, j) in candidates {
        let ci = &clauses[i];
        let cj = &clauses[j];

        let Some(pivot) = ci.iter().copied().find(|&l| cj.contains(&!l)) else {
            continue;
        };

        let mut resolvent: Vec<Lit> = Vec::new();
        for &l in ci {
            if l != pivot && !resolvent.contains(&l) {
                resolvent.push(l);
            }
        }
        for &l in cj {
            if l != !pivot && !resolvent.contains(&l) {
                resolvent.push(l);
            }
        }

        if resolvent.iter().any(|&l| resolvent.contains(&!l)) {
            continue;
        }
        if clauses.iter().any(|c| is_permutation(c, &resolvent)) {
            continue;
        }

        return Some(resolvent);
    }
    None
}

fn is_permutation(a: &[Lit], b: &[Lit]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a_sorted = a.to_vec();
    let mut b_sorted = b.to_vec();
    a_sorted.sort();
    b_sorted.sort();
    a_sorted == b_sorted
}

/// Completes the assignment when the clause set closed under resolution
/// without emptying: every variable still appearing gets the polarity of
/// the first literal of its remaining clause, everything else left
/// unconstrained defaults to positive.
fn finish_unconstrained(kernel: &FormulaKernel, var_count: usize) -> Vec<Lit> {
    let mut partial: Vec<Lit> = kernel.assignment().to_vec();
    for clause in kernel.clauses() {
        if let Some(&first) = clause.first() {
            partial.push(first);
        }
    }
    complete_assignment(&partial, var_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn simple_sat() {
        let clauses = vec![
            vec![lit(1), lit(2)],
            vec![lit(-1), lit(2)],
            vec![lit(1), lit(-2)],
        ];
        let assignment = solve(clauses, 2).expect("expected SAT");
        assert!(assignment.contains(&lit(2)));
    }

    #[test]
    fn simple_unsat() {
        let clauses = vec![vec![lit(1)], vec![lit(-1)]];
        assert_eq!(solve(clauses, 1), None);
    }

    #[test]
    fn resolution_needed() {
        // (x1 v x2), (-x1 v x2), (x1 v -x2), (-x1 v -x2) is UNSAT but needs
        // resolution since unit propagation and pure elimination do nothing.
        let clauses = vec![
            vec![lit(1), lit(2)],
            vec![lit(-1), lit(2)],
            vec![lit(1), lit(-2)],
            vec![lit(-1), lit(-2)],
        ];
        assert_eq!(solve(clauses, 2), None);
    }

    #[test]
    fn closure_without_conflict_is_sat() {
        let clauses = vec![vec![lit(1), lit(2)], vec![lit(1), lit(-2)]];
        let assignment = solve(clauses, 2).expect("expected SAT");
        assert_eq!(assignment.len(), 2);
    }
}
