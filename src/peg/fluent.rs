use std::{collections::HashMap, fmt, str::FromStr};

use crate::{
    peg::{Hole, Move},
    Error, Result, Var,
};

/// A move made at a given time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Jump {
    pub mv: Move,
    pub time: u32,
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Jump({},{},{},{})",
            self.mv.from, self.mv.over, self.mv.to, self.time
        )
    }
}

/// A time-indexed proposition of the planning problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fluent {
    /// `hole` holds a peg at `time`.
    Peg { hole: Hole, time: u32 },
    Jump(Jump),
}

impl fmt::Display for Fluent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fluent::Peg { hole, time } => write!(f, "Peg({},{})", hole, time),
            Fluent::Jump(jump) => write!(f, "{}", jump),
        }
    }
}

impl FromStr for Fluent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let err = || Error::Symbol(s.to_owned());
        let (name, args) = s
            .trim()
            .strip_suffix(')')
            .and_then(|s| s.split_once('('))
            .ok_or_else(err)?;
        let args: Vec<u32> = args
            .split(',')
            .map(|arg| arg.trim().parse())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| err())?;
        match (name, args.as_slice()) {
            ("Peg", &[hole, time]) => Ok(Fluent::Peg { hole, time }),
            ("Jump", &[from, over, to, time]) => Ok(Fluent::Jump(Jump {
                mv: Move { from, over, to },
                time,
            })),
            _ => Err(err()),
        }
    }
}

/// Numbering of fluents as clause-file variables, in both directions.
///
/// Entries keep the order they were inserted or read in.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<(Var, Fluent)>,
    by_var: HashMap<Var, usize>,
    by_fluent: HashMap<Fluent, Var>,
    last: u32,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// The variable of `fluent`, numbering it after the last one if it is new.
    pub fn insert(&mut self, fluent: Fluent) -> Var {
        if let Some(&var) = self.by_fluent.get(&fluent) {
            return var;
        }
        let var = Var::new(self.last + 1);
        self.push(var, fluent);
        var
    }

    fn push(&mut self, var: Var, fluent: Fluent) {
        self.by_var.insert(var, self.entries.len());
        self.by_fluent.insert(fluent, var);
        self.entries.push((var, fluent));
        self.last = self.last.max(var.id());
    }

    pub fn var(&self, fluent: &Fluent) -> Option<Var> {
        self.by_fluent.get(fluent).copied()
    }

    pub fn fluent(&self, var: Var) -> Option<&Fluent> {
        self.by_var.get(&var).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, which for a parsed table is line order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, &Fluent)> + '_ {
        self.entries.iter().map(|(var, fluent)| (*var, fluent))
    }

    /// Reads `<number> <fluent>` lines. Both sides must be unique.
    pub fn parse(text: &str) -> Result<SymbolTable> {
        let mut table = SymbolTable::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let err = || Error::Symbol(line.to_owned());
            let (num, name) = line.split_once(char::is_whitespace).ok_or_else(err)?;
            let id: u32 = num.parse().map_err(|_| err())?;
            if id == 0 || id > Var::MAX_ID {
                return Err(err());
            }
            let (var, fluent) = (Var::new(id), name.parse::<Fluent>()?);
            if table.by_var.contains_key(&var) || table.by_fluent.contains_key(&fluent) {
                return Err(err());
            }
            table.push(var, fluent);
        }
        Ok(table)
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (var, fluent) in self.iter() {
            writeln!(f, "{} {}", var, fluent)?;
        }
        Ok(())
    }
}
