//! Peg solitaire as a planning problem: a board is encoded as a formula whose satisfying
//! assignments are the winning games, and a solved assignment is decoded back into jumps.

mod board;
mod decode;
mod encode;
mod fluent;

pub use board::{Board, Hole, Move, Puzzle};
pub use decode::{decode, Plan};
pub use encode::{encode, Encoding};
pub use fluent::{Fluent, Jump, SymbolTable};

use crate::{format::ResultFile, Result, Solver};

/// Encodes, solves and decodes in memory, through the same file layouts the separate stages use.
///
/// `None` when the board cannot be won. A winnable board may still have an empty plan, when it
/// starts with a single peg.
pub fn plan(board: &Board, solver: &mut Solver) -> Result<Option<Plan>> {
    let file = encode(board).into_clause_file();
    let outcome = solver.solve(&file.cnf)?;
    if !outcome.is_sat() {
        return Ok(None);
    }
    decode(&ResultFile::new(outcome, file.aux)).map(Some)
}
