//! The formula kernel shared by the DPLL and DP backends.
//!
//! Implements unit propagation, pure-literal elimination and
//! clause simplification over a plain `Vec<Vec<Lit>>` clause set. The CDCL
//! backend does not use this kernel: it needs two-watched-literal
//! propagation and an implication graph, which live in [`crate::cdcl`].
use satkit_formula::Lit;

/// Outcome of a kernel operation that can detect unsatisfiability.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropOutcome {
    /// No empty clause was produced.
    Done,
    /// An empty clause was produced; the formula is unsatisfiable.
    Conflict,
}

/// A CNF clause set together with the partial assignment accumulated while
/// simplifying it.
#[derive(Clone, Debug, Default)]
pub struct FormulaKernel {
    clauses: Vec<Vec<Lit>>,
    assignment: Vec<Lit>,
}

impl FormulaKernel {
    /// Builds a kernel from an initial clause set.
    pub fn new(clauses: Vec<Vec<Lit>>) -> FormulaKernel {
        FormulaKernel {
            clauses,
            assignment: Vec::new(),
        }
    }

    /// The current clauses.
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// The literals assigned true so far, in the order they were fixed.
    pub fn assignment(&self) -> &[Lit] {
        &self.assignment
    }

    /// Whether any clause has become empty, i.e. the formula is refuted
    /// under the current assignment.
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|clause| clause.is_empty())
    }

    /// Appends a clause produced outside the kernel (e.g. a DP resolvent)
    /// without touching the assignment.
    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    /// Records `lit` as true and removes it from the clause set, as in
    /// [`Self::simplify_under`], without running propagation.
    pub fn add_literal_true(&mut self, lit: Lit) {
        self.assignment.push(lit);
        self.simplify_under(lit);
    }

    /// Removes every clause containing `lit` (satisfied) and strikes `-lit`
    /// from the rest. Clauses that become empty are kept as conflict
    /// sentinels rather than dropped.
    pub fn simplify_under(&mut self, lit: Lit) {
        let neg = !lit;
        self.clauses.retain(|clause| !clause.contains(&lit));
        for clause in &mut self.clauses {
            clause.retain(|&l| l != neg);
        }
    }

    /// Repeats unit propagation to a fixed point.
    ///
    /// A clause with exactly one literal `u` forces `u` true: `u` is
    /// recorded in the assignment, every clause containing `u` is dropped,
    /// and `-u` is struck from the rest. If this produces an empty clause
    /// the formula is unsatisfiable and propagation stops immediately,
    /// leaving the empty clause in place as a sentinel.
    pub fn unit_propagate(&mut self) -> PropOutcome {
        loop {
            let unit = self.clauses.iter().position(|clause| clause.len() == 1);
            let Some(index) = unit else {
                return PropOutcome::Done;
            };
            let u = self.clauses[index][0];
            self.assignment.push(u);
            self.simplify_under(u);
            if self.has_empty_clause() {
                return PropOutcome::Conflict;
            }
        }
    }

    /// Repeats pure-literal elimination to a fixed point.
    ///
    /// A variable is pure if every occurrence across the remaining clauses
    /// shares one polarity. Tracked with two independent counters per
    /// variable (not a single collapsed key — see `DESIGN.md`), so both
    /// pure-positive and pure-negative variables are found.
    pub fn eliminate_pure_literals(&mut self) -> PropOutcome {
        loop {
            let max_index = self
                .clauses
                .iter()
                .flat_map(|clause| clause.iter())
                .map(|lit| lit.index())
                .max();
            let Some(max_index) = max_index else {
                return PropOutcome::Done;
            };

            let mut positive = vec![0usize; max_index + 1];
            let mut negative = vec![0usize; max_index + 1];
            for clause in &self.clauses {
                for &lit in clause {
                    if lit.is_positive() {
                        positive[lit.index()] += 1;
                    } else {
                        negative[lit.index()] += 1;
                    }
                }
            }

            let mut found = false;
            for index in 0..=max_index {
                if positive[index] > 0 && negative[index] == 0 {
                    let lit = Lit::from_index(index, true);
                    self.assignment.push(lit);
                    self.simplify_under(lit);
                    found = true;
                } else if negative[index] > 0 && positive[index] == 0 {
                    let lit = Lit::from_index(index, false);
                    self.assignment.push(lit);
                    self.simplify_under(lit);
                    found = true;
                }
            }

            if !found {
                return PropOutcome::Done;
            }
            if self.has_empty_clause() {
                return PropOutcome::Conflict;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn unit_propagation_chains() {
        let mut kernel = FormulaKernel::new(vec![
            vec![lit(1)],
            vec![lit(-1), lit(2)],
            vec![lit(-2), lit(3)],
        ]);
        assert_eq!(kernel.unit_propagate(), PropOutcome::Done);
        assert!(kernel.clauses().is_empty());
        assert!(kernel.assignment().contains(&lit(1)));
        assert!(kernel.assignment().contains(&lit(2)));
        assert!(kernel.assignment().contains(&lit(3)));
    }

    #[test]
    fn unit_propagation_detects_conflict() {
        let mut kernel = FormulaKernel::new(vec![vec![lit(1)], vec![lit(-1)]]);
        assert_eq!(kernel.unit_propagate(), PropOutcome::Conflict);
        assert!(kernel.has_empty_clause());
    }

    #[test]
    fn unit_propagation_is_idempotent() {
        let mut kernel = FormulaKernel::new(vec![
            vec![lit(1)],
            vec![lit(-1), lit(2)],
            vec![lit(3), lit(4)],
        ]);
        kernel.unit_propagate();
        let clauses_once = kernel.clauses().to_vec();
        let assignment_once = kernel.assignment().to_vec();
        kernel.unit_propagate();
        assert_eq!(kernel.clauses(), clauses_once.as_slice());
        assert_eq!(kernel.assignment(), assignment_once.as_slice());
    }

    #[test]
    fn pure_literal_detects_both_polarities() {
        let mut kernel = FormulaKernel::new(vec![
            vec![lit(1), lit(2)],
            vec![lit(1), lit(-2)],
            vec![lit(-3), lit(2)],
        ]);
        // var 1 is pure positive, var 3 is pure negative.
        assert_eq!(kernel.eliminate_pure_literals(), PropOutcome::Done);
        assert!(kernel.clauses().is_empty());
        assert!(kernel.assignment().contains(&lit(1)));
        assert!(kernel.assignment().contains(&lit(-3)));
    }

    #[test]
    fn pure_literal_elimination_is_idempotent() {
        let mut kernel = FormulaKernel::new(vec![vec![lit(1), lit(2)], vec![lit(1), lit(-2)]]);
        kernel.eliminate_pure_literals();
        let clauses_once = kernel.clauses().to_vec();
        kernel.eliminate_pure_literals();
        assert_eq!(kernel.clauses(), clauses_once.as_slice());
    }

    #[test]
    fn simplify_under_keeps_empty_clause_as_sentinel() {
        let mut kernel = FormulaKernel::new(vec![vec![lit(1)], vec![lit(-1)]]);
        kernel.simplify_under(lit(1));
        assert!(kernel.has_empty_clause());
    }

    #[test]
    fn add_literal_true_records_and_simplifies() {
        let mut kernel = FormulaKernel::new(vec![vec![lit(1), lit(2)], vec![lit(-1)]]);
        kernel.add_literal_true(lit(1));
        assert_eq!(kernel.assignment(), &[lit(1)]);
        assert!(kernel.has_empty_clause());
    }
}
