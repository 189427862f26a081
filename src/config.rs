use std::{fmt, str::FromStr};

/// How the next case-split variable is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// The smallest unassigned variable.
    #[default]
    Direct,
    /// A uniformly chosen unassigned variable, drawn from an rng seeded with
    /// [`SolverConfig::seed`].
    Random,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Strategy::Direct),
            "random" => Ok(Strategy::Random),
            _ => Err(format!("unknown strategy `{}` (expected direct or random)", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct => write!(f, "direct"),
            Strategy::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub seed: u64,
    /// Maximum number of nested case splits, unlimited when `None`.
    pub max_depth: Option<usize>,
}

impl SolverConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strategy() {
        assert_eq!("direct".parse::<Strategy>(), Ok(Strategy::Direct));
        assert_eq!("Random".parse::<Strategy>(), Ok(Strategy::Random));
        assert!("vsids".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Random.to_string(), "random");
    }

    #[test]
    fn defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.strategy, Strategy::Direct);
        assert_eq!(config.seed, 0);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.with_max_depth(4).max_depth, Some(4));
    }
}
