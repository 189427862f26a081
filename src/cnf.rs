use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::{Clause, Lit, Var};

// record the cnf clauses of one search frame
// a cnf is never changed in place: propagation derives a new one, so frames never alias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    pub(crate) clauses: Vec<Clause>,
}

impl From<Vec<Clause>> for Cnf {
    fn from(clauses: Vec<Clause>) -> Self {
        Cnf { clauses }
    }
}

impl From<Vec<Vec<i32>>> for Cnf {
    fn from(value: Vec<Vec<i32>>) -> Self {
        value.into_iter().map(Clause::from).collect()
    }
}

impl From<&[Vec<i32>]> for Cnf {
    fn from(value: &[Vec<i32>]) -> Self {
        value.iter().map(|c| Clause::from(c.as_slice())).collect()
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Cnf {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl Cnf {
    pub fn new() -> Cnf {
        Cnf::default()
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_clause(&self) -> usize {
        self.clauses.len()
    }

    /// No clause left: every clause has been satisfied.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Some clause lost all of its literals.
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    pub fn num_lit(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Every variable mentioned by a surviving clause.
    pub fn vars(&self) -> BTreeSet<Var> {
        self.clauses.iter().flat_map(Clause::vars).collect()
    }

    /// The literals of the unit clauses, in formula order.
    pub fn units(&self) -> Vec<Lit> {
        self.clauses.iter().filter_map(Clause::unit).collect()
    }

    // based on lit is true
    // drop the clauses that contain lit, strip !lit from the others
    pub fn propagation(&self, lit: Lit) -> Cnf {
        let neg = !lit;
        let clauses = self
            .clauses
            .iter()
            .filter(|clause| !clause.0.contains(&lit))
            .map(|clause| clause.0.iter().copied().filter(|&l| l != neg).collect())
            .collect();
        log::trace!("propagation of {}: {:?}", lit, clauses);
        Cnf { clauses }
    }

    /// Propagates unit clauses until none is left.
    ///
    /// Every unit found by one scan is applied, in formula order, before the formula is scanned
    /// again. A unit whose variable was already forced during the same scan is skipped; if it had
    /// the opposite sign, the earlier propagation has already emptied it and the conflict stays
    /// visible through [`Cnf::has_empty_clause`].
    ///
    /// Returns the simplified formula and the forced literals in the order they were applied.
    pub fn unit_propagations(self) -> (Cnf, Vec<Lit>) {
        let mut cnf = self;
        let mut lits = Vec::new();
        loop {
            let units = cnf.units();
            if units.is_empty() {
                break;
            }
            let mut forced = HashSet::with_capacity(units.len());
            for lit in units {
                if !forced.insert(lit.var()) {
                    continue;
                }
                cnf = cnf.propagation(lit);
                lits.push(lit);
            }
        }
        (cnf, lits)
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.clauses {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}
