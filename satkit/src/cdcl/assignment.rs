//! The trail and per-variable assignment state for the CDCL engine.
use satkit_formula::{Lit, Var};

/// Why a variable was forced to its current value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    /// Chosen by the decision heuristic.
    Decision,
    /// Forced because every other literal of this clause was false.
    Clause(usize),
}

#[derive(Copy, Clone, Debug)]
struct VarState {
    value: Option<bool>,
    level: usize,
    reason: Reason,
}

impl Default for VarState {
    fn default() -> VarState {
        VarState {
            value: None,
            level: 0,
            reason: Reason::Decision,
        }
    }
}

/// The assignment trail: every currently-assigned literal in the order it
/// was fixed, plus the per-variable value/level/reason needed to undo or
/// explain an assignment.
#[derive(Default)]
pub struct Assignment {
    vars: Vec<VarState>,
    pub trail: Vec<Lit>,
    trail_lim: Vec<usize>,
}

impl Assignment {
    pub fn set_var_count(&mut self, count: usize) {
        self.vars.resize(count, VarState::default());
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// `Some(true)` if `lit` is satisfied, `Some(false)` if falsified,
    /// `None` if its variable is unassigned.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.vars[lit.var().index()]
            .value
            .map(|value| value == lit.is_positive())
    }

    pub fn var_value(&self, var: Var) -> Option<bool> {
        self.vars[var.index()].value
    }

    pub fn is_assigned(&self, var: Var) -> bool {
        self.vars[var.index()].value.is_some()
    }

    pub fn level(&self, var: Var) -> usize {
        self.vars[var.index()].level
    }

    pub fn reason(&self, var: Var) -> Reason {
        self.vars[var.index()].reason
    }

    pub fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }

    pub fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    /// Assigns `lit` true at the current decision level and pushes it to the
    /// trail. The variable must be unassigned.
    pub fn assign(&mut self, lit: Lit, reason: Reason) {
        let var = lit.var();
        debug_assert!(self.vars[var.index()].value.is_none());
        self.vars[var.index()] = VarState {
            value: Some(lit.is_positive()),
            level: self.decision_level(),
            reason,
        };
        self.trail.push(lit);
    }

    /// Undoes every assignment made at a decision level deeper than `level`,
    /// calling `on_unassign` for each variable that becomes unassigned again
    /// (the caller uses this to return the variable to the decision heap).
    pub fn backtrack_to(&mut self, level: usize, mut on_unassign: impl FnMut(Var)) {
        if level >= self.decision_level() {
            return;
        }
        let target_len = self.trail_lim[level];
        for &lit in &self.trail[target_len..] {
            let var = lit.var();
            self.vars[var.index()] = VarState::default();
            on_unassign(var);
        }
        self.trail.truncate(target_len);
        self.trail_lim.truncate(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: isize) -> Lit {
        Lit::from_dimacs(n)
    }

    #[test]
    fn assign_and_read_back() {
        let mut assignment = Assignment::default();
        assignment.set_var_count(2);
        assignment.assign(lit(1), Reason::Decision);
        assert_eq!(assignment.lit_value(lit(1)), Some(true));
        assert_eq!(assignment.lit_value(lit(-1)), Some(false));
        assert_eq!(assignment.lit_value(lit(2)), None);
    }

    #[test]
    fn backtrack_undoes_later_levels_only() {
        let mut assignment = Assignment::default();
        assignment.set_var_count(3);
        assignment.assign(lit(1), Reason::Decision);
        assignment.new_decision_level();
        assignment.assign(lit(2), Reason::Decision);
        assignment.new_decision_level();
        assignment.assign(lit(3), Reason::Decision);

        let mut returned = Vec::new();
        assignment.backtrack_to(1, |var| returned.push(var));

        assert_eq!(assignment.lit_value(lit(1)), Some(true));
        assert_eq!(assignment.lit_value(lit(2)), Some(true));
        assert_eq!(assignment.lit_value(lit(3)), None);
        assert_eq!(returned, vec![lit(3).var()]);
        assert_eq!(assignment.decision_level(), 1);
    }

    #[test]
    fn backtrack_to_zero_clears_everything() {
        let mut assignment = Assignment::default();
        assignment.set_var_count(2);
        assignment.assign(lit(1), Reason::Decision);
        assignment.new_decision_level();
        assignment.assign(lit(2), Reason::Decision);
        assignment.backtrack_to(0, |_| {});
        assert_eq!(assignment.decision_level(), 0);
        assert!(assignment.trail.is_empty());
    }
}
