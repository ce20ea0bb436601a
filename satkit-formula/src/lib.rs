//! Variable, literal and CNF formula types shared by the `satkit` solver
//! crates.

pub mod cnf;
pub mod lit;

pub use cnf::CnfFormula;
pub use lit::{Lit, Var};
