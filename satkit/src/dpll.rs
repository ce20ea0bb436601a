//! The DPLL backend: recursive splitting over the [`FormulaKernel`].
use std::collections::HashMap;

use satkit_formula::{Lit, Var};

use crate::kernel::{FormulaKernel, PropOutcome};

/// Solves `clauses` by recursive DPLL splitting.
///
/// Returns `None` for UNSAT or `Some(assignment)` for SAT, where
/// `assignment` covers every variable `1..=var_count` (unconstrained
/// variables are fixed to an arbitrary value so the result is total).
pub fn solve(clauses: Vec<Vec<Lit>>, var_count: usize) -> Option<Vec<Lit>> {
    let mut kernel = FormulaKernel::new(clauses);
    if !solve_rec(&mut kernel) {
        return None;
    }
    Some(complete_assignment(kernel.assignment(), var_count))
}

/// Fills in any variable `1..=var_count` missing from `partial` with an
/// arbitrary (positive) value, so the returned assignment is total.
pub(crate) fn complete_assignment(partial: &[Lit], var_count: usize) -> Vec<Lit> {
    let mut seen = vec![false; var_count];
    let mut assignment: Vec<Lit> = Vec::with_capacity(var_count);
    for &lit in partial {
        let index = lit.index();
        if index < var_count && !seen[index] {
            seen[index] = true;
            assignment.push(lit);
        }
    }
    for index in 0..var_count {
        if !seen[index] {
            assignment.push(Lit::from_index(index, true));
        }
    }
    assignment
}

fn solve_rec(kernel: &mut FormulaKernel) -> bool {
    loop {
        let before = kernel.assignment().len();
        if kernel.unit_propagate() == PropOutcome::Conflict {
            return false;
        }
        if kernel.eliminate_pure_literals() == PropOutcome::Conflict {
            return false;
        }
        if kernel.assignment().len() == before {
            break;
        }
    }

    if kernel.has_empty_clause() {
        return false;
    }
    if kernel.clauses().is_empty() {
        return true;
    }

    let Some(lit) = choose_literal(kernel.clauses()) else {
        return false;
    };

    let snapshot = kernel.clone();

    kernel.add_literal_true(lit);
    if solve_rec(kernel) {
        return true;
    }

    *kernel = snapshot.clone();
    kernel.add_literal_true(!lit);
    if solve_rec(kernel) {
        return true;
    }

    *kernel = snapshot;
    false
}

/// MOM-like literal choice: rank variables by total literal frequency among
/// the remaining clauses, branch on the higher-frequency polarity of the
/// top-ranked variable. Ties go to whichever variable was seen first.
fn choose_literal(clauses: &[Vec<Lit>]) -> Option<Lit> {
    let mut counts: HashMap<Var, (usize, usize)> = HashMap::new();
    let mut order: Vec<Var> = Vec::new();

    for clause in clauses {
        for &lit in clause {
            let var = lit.var();
            let entry = counts.entry(var).or_insert_with(|| {
                order.push(var);
                (0, 0)
            });
            if lit.is_positive() {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    let mut best: Option<(Var, bool, usize)> = None;
    for var in order {
        let (pos, neg) = counts[&var];
        let score = pos + neg;
        let polarity = pos >= neg;
        let better = match best {
            Some((_, _, best_score)) => score > best_score,
            None => true,
        };
        if better {
            best = Some((var, polarity, score));
        }
    }

    best.map(|(var, polarity, _)| var.lit(polarity))
}
