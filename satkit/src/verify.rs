//! Verifies a claimed satisfying assignment against the original clauses.
use satkit_formula::Lit;

/// Checks a SAT result: the assignment must be consistent (no variable
/// assigned both polarities) and must satisfy every clause.
pub fn verify(clauses: &[Vec<Lit>], assignment: &[Lit]) -> bool {
    let mut seen = vec![None; assignment.iter().map(|l| l.index() + 1).max().unwrap_or(0)];
    for &lit in assignment {
        let index = lit.index();
        match seen[index] {
            None => seen[index] = Some(lit.is_positive()),
            Some(prev) if prev != lit.is_positive() => return false,
            Some(_) => {}
        }
    }

    clauses
        .iter()
        .all(|clause| clause.iter().any(|lit| assignment.contains(lit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn accepts_satisfying_assignment() {
        let clauses = vec![vec![lit(1), lit(2)], vec![lit(-1), lit(2)]];
        assert!(verify(&clauses, &[lit(1), lit(2)]));
    }

    #[test]
    fn rejects_unsatisfied_clause() {
        let clauses = vec![vec![lit(1), lit(2)]];
        assert!(!verify(&clauses, &[lit(-1), lit(-2)]));
    }

    #[test]
    fn rejects_conflicting_assignment() {
        let clauses = vec![vec![lit(1)]];
        assert!(!verify(&clauses, &[lit(1), lit(-1)]));
    }
}
