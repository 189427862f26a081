//! Error types shared by the file formats, the peg-solitaire layer and the solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token or line that does not have the expected shape.
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// `0` is the clause section delimiter, never a literal.
    #[error("line {line}: literal 0 inside a clause")]
    ZeroLiteral { line: usize },

    /// A puzzle description that cannot be encoded.
    #[error("invalid puzzle: {0}")]
    Puzzle(String),

    /// A symbol table entry the decoder cannot read.
    #[error("invalid symbol `{0}`")]
    Symbol(String),

    /// The search went deeper than the configured limit.
    #[error("search depth exhausted: more than {limit} nested case splits")]
    DepthExhausted { limit: usize },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
