//! Clause storage for the CDCL engine.
//!
//! Clauses are kept in a flat, append-only database indexed by `usize`.
//! Nothing is ever physically removed: [`super::reduce::reduce`] marks
//! low-activity learned clauses `deleted` and propagation skips them. This
//! keeps clause indices (used as [`super::assignment::Reason::Clause`]
//! antecedents and trail metadata) stable for the life of the solver.
use satkit_formula::Lit;

/// A single clause, original or learned.
#[derive(Clone, Debug)]
pub struct Clause {
    pub literals: Vec<Lit>,
    pub learned: bool,
    pub activity: f64,
    pub deleted: bool,
}

impl Clause {
    pub fn original(literals: Vec<Lit>) -> Clause {
        Clause {
            literals,
            learned: false,
            activity: 0.0,
            deleted: false,
        }
    }

    pub fn learned(literals: Vec<Lit>) -> Clause {
        Clause {
            literals,
            learned: true,
            activity: 0.0,
            deleted: false,
        }
    }
}

/// The clause database, plus the shared activity-bump bookkeeping used for
/// the clause-reduction heuristic.
///
/// Uses the same "scale the bump instead of decaying every clause" trick as
/// [`super::vsids::Vsids`]: cheaper than walking every clause on each
/// conflict, and only the relative order of activities matters.
pub struct ClauseDb {
    clauses: Vec<Clause>,
    activity_increment: f64,
}

impl Default for ClauseDb {
    fn default() -> ClauseDb {
        ClauseDb {
            clauses: Vec::new(),
            activity_increment: 1.0,
        }
    }
}

impl ClauseDb {
    pub fn add(&mut self, clause: Clause) -> usize {
        let index = self.clauses.len();
        self.clauses.push(clause);
        index
    }

    pub fn get(&self, index: usize) -> &Clause {
        &self.clauses[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Clause {
        &mut self.clauses[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Clause)> {
        self.clauses.iter().enumerate()
    }

    pub fn learned_count(&self) -> usize {
        self.clauses.iter().filter(|c| c.learned && !c.deleted).count()
    }

    /// Bumps a clause's activity, rescaling the whole database if any value
    /// would otherwise overflow.
    pub fn bump(&mut self, index: usize) {
        self.clauses[index].activity += self.activity_increment;
        if self.clauses[index].activity > 1e100 {
            for clause in &mut self.clauses {
                clause.activity *= 1e-100;
            }
            self.activity_increment *= 1e-100;
        }
    }

    /// Scales up the bump increment for the next conflict's activity bumps.
    pub fn decay(&mut self, decay: f64) {
        self.activity_increment /= decay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn bump_raises_activity_relative_order() {
        let mut db = ClauseDb::default();
        let a = db.add(Clause::learned(vec![lit(1), lit(2)]));
        let b = db.add(Clause::learned(vec![lit(-1), lit(2)]));
        db.bump(a);
        db.bump(a);
        db.bump(b);
        assert!(db.get(a).activity > db.get(b).activity);
    }

    #[test]
    fn learned_count_ignores_originals_and_deleted() {
        let mut db = ClauseDb::default();
        db.add(Clause::original(vec![lit(1)]));
        let learned = db.add(Clause::learned(vec![lit(1), lit(2)]));
        db.add(Clause::learned(vec![lit(-1), lit(-2)]));
        assert_eq!(db.learned_count(), 2);
        db.get_mut(learned).deleted = true;
        assert_eq!(db.learned_count(), 1);
    }
}
