//! The text files passed between the encoder, the solver and the decoder.
//!
//! Both files have a section of lines ended by a standalone `0` line. Whatever follows that
//! line is a payload (the symbol table) which is carried through byte for byte.

use std::{fmt, fs, path::Path};

use crate::{Assignment, Clause, Cnf, Error, Lit, Outcome, Result, Var};

/// Delimiter line between the leading section and the payload.
pub const DELIMITER: &str = "0";

/// Splits `text` at the first standalone delimiter line.
/// Yields the numbered lines before it and the raw payload after it, or `None` when the
/// delimiter is missing.
fn split_sections(text: &str) -> (Vec<(usize, &str)>, Option<&str>) {
    let mut lines = Vec::new();
    let mut offset = 0;
    for (i, raw) in text.split_inclusive('\n').enumerate() {
        offset += raw.len();
        let line = raw.trim();
        if line == DELIMITER {
            return (lines, Some(&text[offset..]));
        }
        lines.push((i + 1, line));
    }
    (lines, None)
}

/// A formula plus the payload that followed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseFile {
    pub cnf: Cnf,
    pub aux: String,
}

impl ClauseFile {
    pub fn new(cnf: Cnf, aux: impl Into<String>) -> ClauseFile {
        ClauseFile {
            cnf,
            aux: aux.into(),
        }
    }

    /// Reads the clause section line by line. Blank lines are skipped and a missing delimiter
    /// leaves the payload empty.
    pub fn parse(text: &str) -> Result<ClauseFile> {
        let (lines, aux) = split_sections(text);
        let mut cnf = Cnf::new();
        for (line_no, line) in lines {
            if line.is_empty() {
                continue;
            }
            let clause = line
                .split_whitespace()
                .map(|token| parse_lit(line_no, token))
                .collect::<Result<Clause>>()?;
            cnf.add_clause(clause);
        }
        log::debug!("parsed {} clauses", cnf.num_clause());
        Ok(ClauseFile {
            cnf,
            aux: aux.unwrap_or_default().to_owned(),
        })
    }

    pub fn read(path: impl AsRef<Path>) -> Result<ClauseFile> {
        ClauseFile::parse(&fs::read_to_string(path)?)
    }
}

fn parse_lit(line: usize, token: &str) -> Result<Lit> {
    let lit: i32 = token.parse().map_err(|e| Error::Parse {
        line,
        msg: format!("invalid literal `{}`: {}", token, e),
    })?;
    if lit == 0 {
        return Err(Error::ZeroLiteral { line });
    }
    if lit == i32::MIN {
        return Err(Error::Parse {
            line,
            msg: format!("literal `{}` out of range", token),
        });
    }
    Ok(Lit::from_dimacs(lit))
}

impl fmt::Display for ClauseFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cnf)?;
        writeln!(f, "{}", DELIMITER)?;
        write!(f, "{}", self.aux)
    }
}

/// A solver verdict plus the payload carried over from its clause file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFile {
    pub outcome: Outcome,
    pub aux: String,
}

impl ResultFile {
    pub fn new(outcome: Outcome, aux: impl Into<String>) -> ResultFile {
        ResultFile {
            outcome,
            aux: aux.into(),
        }
    }

    /// Reads `<variable> <T|F>` lines up to the delimiter.
    ///
    /// A file with no assignment line reads back as [`Outcome::Unsatisfiable`]: the format does
    /// not tell it apart from a satisfiable formula without variables.
    pub fn parse(text: &str) -> Result<ResultFile> {
        let (lines, aux) = split_sections(text);
        let aux = aux.ok_or_else(|| Error::Parse {
            line: lines.len(),
            msg: "missing `0` delimiter line".to_owned(),
        })?;

        let mut assignment = Assignment::new();
        for (line_no, line) in lines {
            if line.is_empty() {
                continue;
            }
            let parse_err = |msg: String| Error::Parse { line: line_no, msg };
            let mut parts = line.split_whitespace();
            let (Some(var), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(parse_err(format!("expected `<variable> <T|F>`, got `{}`", line)));
            };
            let var: u32 = var
                .parse()
                .map_err(|e| parse_err(format!("invalid variable `{}`: {}", var, e)))?;
            if var == 0 {
                return Err(parse_err("variable 0 is not a variable".to_owned()));
            }
            if var > Var::MAX_ID {
                return Err(parse_err(format!("variable `{}` out of range", var)));
            }
            let value = match value {
                "T" => true,
                "F" => false,
                other => return Err(parse_err(format!("invalid value `{}`", other))),
            };
            if assignment.value(Var::new(var)).is_some() {
                return Err(parse_err(format!("variable {} assigned twice", var)));
            }
            assignment.assign(Var::new(var), value);
        }

        let outcome = if assignment.is_empty() {
            Outcome::Unsatisfiable
        } else {
            Outcome::Satisfiable(assignment)
        };
        Ok(ResultFile {
            outcome,
            aux: aux.to_owned(),
        })
    }

    pub fn read(path: impl AsRef<Path>) -> Result<ResultFile> {
        ResultFile::parse(&fs::read_to_string(path)?)
    }
}

impl fmt::Display for ResultFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Outcome::Satisfiable(assignment) = &self.outcome {
            for (var, value) in assignment.iter() {
                writeln!(f, "{} {}", var, if value { 'T' } else { 'F' })?;
            }
        }
        writeln!(f, "{}", DELIMITER)?;
        write!(f, "{}", self.aux)
    }
}
