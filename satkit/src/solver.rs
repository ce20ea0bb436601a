//! The top-level solver facade tying every backend together behind one
//! entry point.
use log::debug;
use satkit_formula::{CnfFormula, Lit};

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::verify::verify;
use crate::{cdcl, dp, dpll, resolution};

/// Which procedure decides satisfiability.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Recursive DPLL splitting.
    Dpll,
    /// Davis-Putnam: kernel preprocessing interleaved with resolution.
    Dp,
    /// Pure binary-resolution saturation. Reports satisfiability only, no
    /// witness assignment.
    Resolution,
    /// Conflict-driven clause learning.
    Cdcl,
}

/// The outcome of solving a formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Satisfiable, with a total assignment covering every declared
    /// variable. Absent for [`Backend::Resolution`], which never produces
    /// a witness.
    Sat(Option<Vec<Lit>>),
    Unsat,
}

/// Solves `formula` with the chosen `backend`.
///
/// For every backend but [`Backend::Resolution`] a returned SAT verdict is
/// re-checked against the original clauses with [`verify`]; a mismatch is a
/// solver bug and is reported as [`SolveError::InternalInvariant`] rather
/// than silently returned to the caller.
pub fn solve(formula: &CnfFormula, backend: Backend, config: SolverConfig) -> Result<Verdict, SolveError> {
    let clauses: Vec<Vec<Lit>> = formula.iter().map(|clause| clause.to_vec()).collect();
    let var_count = formula.var_count();

    debug!("solving {} clauses over {} variables with {:?}", clauses.len(), var_count, backend);

    let verdict = match backend {
        Backend::Dpll => match dpll::solve(clauses.clone(), var_count) {
            Some(assignment) => Verdict::Sat(Some(assignment)),
            None => Verdict::Unsat,
        },
        Backend::Dp => match dp::solve(clauses.clone(), var_count) {
            Some(assignment) => Verdict::Sat(Some(assignment)),
            None => Verdict::Unsat,
        },
        Backend::Resolution => {
            if resolution::is_satisfiable(clauses.clone()) {
                Verdict::Sat(None)
            } else {
                Verdict::Unsat
            }
        }
        Backend::Cdcl => match cdcl::solve(formula, config) {
            Some(assignment) => Verdict::Sat(Some(assignment)),
            None => Verdict::Unsat,
        },
    };

    if let Verdict::Sat(Some(assignment)) = &verdict {
        if !verify(&clauses, assignment) {
            return Err(SolveError::InternalInvariant(
                "backend reported SAT with an assignment that does not satisfy the input clauses",
            ));
        }
    }

    Ok(verdict)
}
