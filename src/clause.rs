use std::fmt;

use crate::lit::{Lit, Var};

/// A disjunction of literals. An empty clause is falsity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause(pub(crate) Vec<Lit>);

impl Clause {
    pub fn inner(&self) -> &[Lit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// If the clause contains exactly one literal, return it, None otherwise
    pub fn unit(&self) -> Option<Lit> {
        match self.0.as_slice() {
            [lit] => Some(*lit),
            _ => None,
        }
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.0.iter().map(|lit| lit.var())
    }
}

impl From<&[i32]> for Clause {
    fn from(value: &[i32]) -> Self {
        Clause(value.iter().map(|&lit| Lit::from_dimacs(lit)).collect())
    }
}

impl From<Vec<i32>> for Clause {
    fn from(value: Vec<i32>) -> Self {
        Clause::from(value.as_slice())
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Clause(iter.into_iter().collect())
    }
}

// one clause line of the clause file
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for lit in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", lit)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_detection() {
        assert_eq!(Clause::from(vec![-4]).unit(), Some(Lit::from_dimacs(-4)));
        assert_eq!(Clause::from(vec![1, 2]).unit(), None);
        assert_eq!(Clause::default().unit(), None);
        assert!(Clause::default().is_empty());
    }

    #[test]
    fn display_as_line() {
        assert_eq!(Clause::from(vec![1, -2, 3]).to_string(), "1 -2 3");
        assert_eq!(Clause::default().to_string(), "");
    }
}
