mod assignment;
mod clause;
mod cnf;
mod config;
mod dp;
mod error;
pub mod format;
mod lit;
pub mod peg;

pub use assignment::Assignment;
pub use clause::Clause;
pub use cnf::Cnf;
pub use config::{SolverConfig, Strategy};
pub use dp::{dp, Outcome, PartialSolution, Solver, Stats};
pub use error::{Error, Result};
pub use lit::{Lit, Var};
