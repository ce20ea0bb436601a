//! Two-watched-literal propagation.
//!
//! Each clause of length two or more keeps two of its literals in positions
//! `0` and `1` as its watched literals. A clause is registered in the
//! watchlist of the *negation* of each watched literal, so the list at
//! `watches[lit.code()]` holds exactly the clauses that need re-checking
//! once `lit` is assigned true (because one of their watched literals just
//! went false). Unlike `varisat`'s watchlists this does not carry a
//! blocking literal; the clause is always re-read to find the other watch.
use satkit_formula::Lit;

use super::assignment::{Assignment, Reason};
use super::clause::ClauseDb;

#[derive(Default)]
pub struct Watchlists {
    watches: Vec<Vec<usize>>,
}

impl Watchlists {
    pub fn set_var_count(&mut self, count: usize) {
        self.watches.resize(count * 2, Vec::new());
    }

    /// Registers `clause` as watched on `watched`, which must be one of the
    /// clause's first two literals.
    pub fn watch(&mut self, watched: Lit, clause: usize) {
        self.watches[(!watched).code()].push(clause);
    }
}

/// The clause with no remaining non-false literal.
pub struct Conflict(pub usize);

/// Propagates every consequence of the literals already on the trail,
/// starting at `*queue_head`, until a fixed point or a conflicting clause is
/// found. `*queue_head` is advanced past every literal processed.
pub fn propagate(
    assignment: &mut Assignment,
    watches: &mut Watchlists,
    clauses: &mut ClauseDb,
    queue_head: &mut usize,
) -> Option<Conflict> {
    while *queue_head < assignment.trail.len() {
        let lit = assignment.trail[*queue_head];
        *queue_head += 1;
        let false_watched = !lit;

        let slot = lit.code();
        let pending = std::mem::take(&mut watches.watches[slot]);
        let mut retained = Vec::with_capacity(pending.len());
        let mut pending = pending.into_iter();
        let mut conflict = None;

        for clause_index in pending.by_ref() {
            if clauses.get(clause_index).deleted {
                continue;
            }

            {
                let clause = clauses.get_mut(clause_index);
                if clause.literals[0] != false_watched {
                    clause.literals.swap(0, 1);
                }
            }

            let len = clauses.get(clause_index).literals.len();
            let other = clauses.get(clause_index).literals[1];

            if assignment.lit_value(other) == Some(true) {
                retained.push(clause_index);
                continue;
            }

            let mut relocated = false;
            for k in 2..len {
                let candidate = clauses.get(clause_index).literals[k];
                if assignment.lit_value(candidate) != Some(false) {
                    let clause = clauses.get_mut(clause_index);
                    clause.literals.swap(0, k);
                    let new_watch = clause.literals[0];
                    watches.watch(new_watch, clause_index);
                    relocated = true;
                    break;
                }
            }
            if relocated {
                continue;
            }

            retained.push(clause_index);
            match assignment.lit_value(other) {
                Some(false) => {
                    conflict = Some(Conflict(clause_index));
                    break;
                }
                None => assignment.assign(other, Reason::Clause(clause_index)),
                Some(true) => unreachable!("satisfied clauses are filtered above"),
            }
        }

        retained.extend(pending);
        watches.watches[slot] = retained;

        if let Some(conflict) = conflict {
            return Some(conflict);
        }
    }
    None
}
