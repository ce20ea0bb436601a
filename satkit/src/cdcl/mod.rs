//! The CDCL (Conflict-Driven Clause Learning) backend.
//!
//! Unlike [`crate::kernel`]'s plain clause vectors, this backend keeps an
//! explicit trail and implication graph so it can backjump non-chronologically
//! instead of re-splitting from scratch on every conflict. [`CdclSolver`]
//! owns every piece of state directly — there is no capability-splitting
//! context object here, since a single solver never needs to hand out
//! disjoint mutable views of itself to unrelated callers.
pub mod analyze;
pub mod assignment;
pub mod clause;
pub mod reduce;
pub mod vsids;
pub mod watch;

use satkit_formula::{CnfFormula, Lit, Var};

use crate::config::SolverConfig;
use assignment::{Assignment, Reason};
use clause::{Clause, ClauseDb};
use vsids::Vsids;
use watch::Watchlists;

/// A self-contained CDCL solver instance for one formula.
pub struct CdclSolver {
    clauses: ClauseDb,
    assignment: Assignment,
    watches: Watchlists,
    vsids: Vsids,
    queue_head: usize,
    var_count: usize,
    config: SolverConfig,
    root_unsat: bool,
}

impl CdclSolver {
    pub fn new(formula: &CnfFormula, config: SolverConfig) -> CdclSolver {
        let var_count = formula.var_count();

        let mut solver = CdclSolver {
            clauses: ClauseDb::default(),
            assignment: Assignment::default(),
            watches: Watchlists::default(),
            vsids: Vsids::default(),
            queue_head: 0,
            var_count,
            config,
            root_unsat: false,
        };
        solver.assignment.set_var_count(var_count);
        solver.watches.set_var_count(var_count);
        solver.vsids.set_var_count(var_count);
        solver.vsids.set_decay(config.vsids_decay);

        for clause in formula.iter() {
            solver.install_original_clause(clause.to_vec());
        }
        solver
    }

    fn install_original_clause(&mut self, literals: Vec<Lit>) {
        match literals.len() {
            0 => self.root_unsat = true,
            1 => {
                let lit = literals[0];
                let index = self.clauses.add(Clause::original(literals));
                match self.assignment.lit_value(lit) {
                    Some(true) => {}
                    Some(false) => self.root_unsat = true,
                    None => self.assignment.assign(lit, Reason::Clause(index)),
                }
            }
            _ => {
                let index = self.clauses.add(Clause::original(literals));
                self.watch_first_two(index);
            }
        }
    }

    fn watch_first_two(&mut self, index: usize) {
        let l0 = self.clauses.get(index).literals[0];
        let l1 = self.clauses.get(index).literals[1];
        self.watches.watch(l0, index);
        self.watches.watch(l1, index);
    }

    /// Runs to completion. Consumes `self` since a solved instance has no
    /// further use for its own trail.
    pub fn solve(mut self) -> Option<Vec<Lit>> {
        if self.root_unsat {
            return None;
        }

        loop {
            match watch::propagate(
                &mut self.assignment,
                &mut self.watches,
                &mut self.clauses,
                &mut self.queue_head,
            ) {
                Some(conflict) => {
                    if !self.resolve_conflict(conflict.0) {
                        return None;
                    }
                }
                None => match self.pick_decision_variable() {
                    Some(var) => {
                        self.assignment.new_decision_level();
                        self.assignment.assign(var.positive(), Reason::Decision);
                    }
                    None => return Some(self.extract_assignment()),
                },
            }
        }
    }

    /// Learns a clause from `conflict` and backjumps. Returns `false` if the
    /// conflict occurred at decision level 0, meaning the formula is UNSAT.
    fn resolve_conflict(&mut self, conflict: usize) -> bool {
        if self.assignment.decision_level() == 0 {
            return false;
        }

        let (learned, backjump_level) =
            analyze::analyze(&self.assignment, &mut self.clauses, &mut self.vsids, conflict);
        self.clauses.decay(self.config.clause_activity_decay);
        self.vsids.decay();

        self.backjump(backjump_level);
        self.learn(learned);

        if self.clauses.learned_count() > self.config.learned_limit {
            reduce::reduce(&mut self.clauses, &self.assignment);
        }
        true
    }

    fn backjump(&mut self, level: usize) {
        let vsids = &mut self.vsids;
        self.assignment.backtrack_to(level, |var| vsids.make_available(var));
        self.queue_head = self.assignment.trail.len();
    }

    fn learn(&mut self, literals: Vec<Lit>) {
        let asserting = literals[0];
        let needs_watch = literals.len() >= 2;
        let index = self.clauses.add(Clause::learned(literals));
        if needs_watch {
            self.watch_first_two(index);
        }
        self.assignment.assign(asserting, Reason::Clause(index));
    }

    /// Pops variables off the VSIDS heap until finding one that is still
    /// unassigned. Variables assigned by propagation are never explicitly
    /// removed from the heap, so this filters them out lazily instead.
    fn pick_decision_variable(&mut self) -> Option<Var> {
        loop {
            let var = self.vsids.next()?;
            if !self.assignment.is_assigned(var) {
                return Some(var);
            }
        }
    }

    fn extract_assignment(&self) -> Vec<Lit> {
        (0..self.var_count)
            .map(|index| {
                let var = Var::from_index(index);
                match self.assignment.var_value(var) {
                    Some(false) => var.negative(),
                    Some(true) | None => var.positive(),
                }
            })
            .collect()
    }
}

/// Solves `formula` with the CDCL backend.
pub fn solve(formula: &CnfFormula, config: SolverConfig) -> Option<Vec<Lit>> {
    CdclSolver::new(formula, config).solve()
}
