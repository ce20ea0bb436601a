//! Solver-level errors.
//!
//! Parsing and I/O errors are reported by [`satkit_dimacs::ParserError`] and
//! `std::io::Error`; this module only covers the kinds that arise once a
//! well-formed formula is already being solved. SAT and UNSAT are results,
//! not errors: a backend returning [`crate::solver::Verdict::Unsat`] is a
//! perfectly normal outcome.
use thiserror::Error;

/// Errors that can occur while solving, as opposed to while parsing input.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The solver ran out of memory while growing a data structure.
    #[error("out of memory while solving")]
    OutOfMemory,

    /// The solver reached a state its own invariants say is impossible.
    ///
    /// This is always a bug. The most important case is a backend
    /// reporting SAT with an assignment that the verifier then rejects
    /// (spec-level invariant 1); callers must not silently ignore this.
    #[error("internal solver invariant violated: {0}")]
    InternalInvariant(&'static str),
}
