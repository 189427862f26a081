use std::{fmt, ops::Not};

/// A boolean variable, numbered from 1 as in the clause file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(u32);

impl Var {
    /// Largest id whose literals fit the signed clause file form.
    pub const MAX_ID: u32 = i32::MAX as u32;

    pub fn new(id: u32) -> Var {
        debug_assert!(id > 0, "variable 0 is the clause delimiter");
        debug_assert!(id <= Var::MAX_ID, "variable {} has no signed form", id);
        Var(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }

    /// The literal asserting this variable has `value`.
    pub fn lit(self, value: bool) -> Lit {
        Lit {
            var: self,
            positive: value,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    var: Var,
    positive: bool,
}

impl Lit {
    /// Builds a literal from its signed integer form. `0` is not a literal.
    pub fn from_dimacs(lit: i32) -> Lit {
        Lit {
            var: Var::new(lit.unsigned_abs()),
            positive: lit > 0,
        }
    }

    pub fn to_dimacs(self) -> i32 {
        let id = self.var.0 as i32;
        if self.positive {
            id
        } else {
            -id
        }
    }

    pub fn var(self) -> Var {
        self.var
    }

    pub fn is_positive(self) -> bool {
        self.positive
    }

    /// Truth value of the literal when its variable takes `value`.
    pub fn eval(self, value: bool) -> bool {
        self.positive == value
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit {
            var: self.var,
            positive: !self.positive,
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.positive {
            f.write_str("-")?;
        }
        write!(f, "{}", self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_polarity() {
        let lit = Lit::from_dimacs(-7);
        assert_eq!(lit.var(), Var::new(7));
        assert!(!lit.is_positive());
        assert!(lit.eval(false));
        assert!(!lit.eval(true));
        assert_eq!((!lit).to_dimacs(), 7);
        assert_eq!(lit.to_string(), "-7");
    }

    #[test]
    fn largest_literals_print() {
        let lit = Lit::from_dimacs(i32::MAX);
        assert_eq!(lit.var().id(), Var::MAX_ID);
        assert_eq!(lit.to_string(), "2147483647");
        assert_eq!((!lit).to_string(), "-2147483647");
        assert_eq!((!lit).to_dimacs(), -i32::MAX);
    }

    #[test]
    fn var_lit() {
        let var = Var::new(3);
        assert_eq!(var.lit(true), Lit::from_dimacs(3));
        assert_eq!(var.lit(false), Lit::from_dimacs(-3));
    }
}
