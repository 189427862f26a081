use std::collections::BTreeMap;

use crate::{Cnf, Lit, Var};

/// Variable values of a witness, kept in ascending variable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment(BTreeMap<Var, bool>);

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    pub fn assign(&mut self, var: Var, value: bool) {
        let previous = self.0.insert(var, value);
        debug_assert!(previous.is_none(), "{} assigned twice", var);
    }

    pub fn assign_lit(&mut self, lit: Lit) {
        self.assign(lit.var(), lit.is_positive());
    }

    pub fn value(&self, var: Var) -> Option<bool> {
        self.0.get(&var).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.0.iter().map(|(&var, &value)| (var, value))
    }

    pub fn true_vars(&self) -> Vec<Var> {
        self.vars(true)
    }

    pub fn false_vars(&self) -> Vec<Var> {
        self.vars(false)
    }

    fn vars(&self, val: bool) -> Vec<Var> {
        self.iter()
            .filter(|&(_, v)| v == val)
            .map(|(var, _)| var)
            .collect()
    }

    /// Whether every clause of `cnf` has a literal made true by this assignment.
    /// Unassigned variables satisfy nothing.
    pub fn satisfies(&self, cnf: &Cnf) -> bool {
        cnf.clauses().iter().all(|clause| {
            clause
                .inner()
                .iter()
                .any(|lit| self.value(lit.var()).map_or(false, |v| lit.eval(v)))
        })
    }
}

impl FromIterator<(Var, bool)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (Var, bool)>>(iter: T) -> Self {
        Assignment(iter.into_iter().collect())
    }
}
