use std::collections::BTreeSet;

use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

use crate::{Assignment, Cnf, Error, Lit, Result, SolverConfig, Strategy, Var};

/// The assignment of one search frame together with the variables still open in its formula.
#[derive(Debug, Clone)]
pub struct PartialSolution {
    solution: Assignment,
    un_solved: BTreeSet<Var>,
}

impl PartialSolution {
    pub fn new(cnf: &Cnf) -> PartialSolution {
        PartialSolution {
            solution: Assignment::new(),
            un_solved: cnf.vars(),
        }
    }

    pub fn assign_lit(&mut self, lit: Lit) {
        self.solution.assign_lit(lit);
        self.un_solved.remove(&lit.var());
    }

    pub fn is_solved(&self) -> bool {
        self.un_solved.is_empty()
    }

    pub fn solution(&self) -> &Assignment {
        &self.solution
    }

    pub fn un_solved(&self) -> &BTreeSet<Var> {
        &self.un_solved
    }

    /// Forgets the open variables that no surviving clause mentions any more.
    /// They are left out of the witness.
    fn retain_in(&mut self, cnf: &Cnf) {
        let vars = cnf.vars();
        self.un_solved.retain(|var| vars.contains(var));
    }

    pub fn into_assignment(self) -> Assignment {
        self.solution
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl Outcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, Outcome::Satisfiable(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Outcome::Satisfiable(assignment) => Some(assignment),
            Outcome::Unsatisfiable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Search frames visited.
    pub nodes: usize,
    /// Case splits.
    pub decisions: usize,
    /// Literals propagated, guesses and forced units alike.
    pub propagations: usize,
    /// Frames that ended with an empty clause.
    pub conflicts: usize,
    /// Frames that ended with a verdict, SAT or conflict.
    pub leaves: usize,
    pub max_depth: usize,
}

// one pending branch: the parent's formula and assignment, and the guess to apply on top of them
struct Frame {
    cnf: Cnf,
    solution: PartialSolution,
    guess: Option<Lit>,
    depth: usize,
}

/// Davis–Putnam search: unit propagation to a fixed point, then a case split on one open
/// variable, `true` first.
///
/// Branches are kept on an explicit stack rather than the call stack. Every branch owns its own
/// copy of the formula and the assignment, so backtracking is just popping the next frame.
pub struct Solver {
    config: SolverConfig,
    rng: StdRng,
    stats: Stats,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(SolverConfig::default())
    }
}

impl Solver {
    pub fn new(config: SolverConfig) -> Solver {
        Solver {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Statistics of the last call to [`Solver::solve`].
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Decides `cnf`. Fails only when [`SolverConfig::max_depth`] is exceeded.
    pub fn solve(&mut self, cnf: &Cnf) -> Result<Outcome> {
        self.stats = Stats::default();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        log::info!(
            "solving {} clauses over {} variables with the {} strategy",
            cnf.num_clause(),
            cnf.vars().len(),
            self.config.strategy
        );

        let outcome = self.search(cnf)?;
        log::info!(
            "{} after {} decisions, {} conflicts ({:?})",
            if outcome.is_sat() { "SAT" } else { "UNSAT" },
            self.stats.decisions,
            self.stats.conflicts,
            self.stats
        );
        debug_assert!(outcome.assignment().map_or(true, |a| a.satisfies(cnf)));
        Ok(outcome)
    }

    fn search(&mut self, cnf: &Cnf) -> Result<Outcome> {
        let mut stack = vec![Frame {
            cnf: cnf.clone(),
            solution: PartialSolution::new(cnf),
            guess: None,
            depth: 0,
        }];

        while let Some(Frame {
            cnf,
            mut solution,
            guess,
            depth,
        }) = stack.pop()
        {
            self.stats.nodes += 1;
            self.stats.max_depth = self.stats.max_depth.max(depth);

            let cnf = match guess {
                Some(lit) => {
                    solution.assign_lit(lit);
                    self.stats.propagations += 1;
                    cnf.propagation(lit)
                }
                None => cnf,
            };

            // 1. unit propagation to a fixed point
            let (cnf, unit_lits) = cnf.unit_propagations();
            self.stats.propagations += unit_lits.len();
            for &lit in &unit_lits {
                solution.assign_lit(lit);
            }

            // 2. every clause is satisfied
            if cnf.is_empty() {
                self.stats.leaves += 1;
                return Ok(Outcome::Satisfiable(solution.into_assignment()));
            }

            // 3. conflict on this branch
            if cnf.has_empty_clause() {
                self.stats.leaves += 1;
                self.stats.conflicts += 1;
                log::debug!("conflict at depth {} after {:?}", depth, guess);
                continue;
            }

            // 4. now that we must make a guess
            solution.retain_in(&cnf);
            let Some(var) = self.next_guess(&solution) else {
                continue;
            };
            if let Some(limit) = self.config.max_depth {
                if depth >= limit {
                    return Err(Error::DepthExhausted { limit });
                }
            }
            self.stats.decisions += 1;
            log::debug!(
                "depth {}: guess {} with {} clauses left",
                depth,
                var,
                cnf.num_clause()
            );

            // the false branch waits under the true branch with its own copy
            stack.push(Frame {
                cnf: cnf.clone(),
                solution: solution.clone(),
                guess: Some(var.lit(false)),
                depth: depth + 1,
            });
            stack.push(Frame {
                cnf,
                solution,
                guess: Some(var.lit(true)),
                depth: depth + 1,
            });
        }

        Ok(Outcome::Unsatisfiable)
    }

    fn next_guess(&mut self, solution: &PartialSolution) -> Option<Var> {
        match self.config.strategy {
            Strategy::Direct => solution.un_solved.iter().next().copied(),
            Strategy::Random => solution.un_solved.iter().choose(&mut self.rng).copied(),
        }
    }
}

/// Solves `cnf` with the default configuration.
pub fn dp(cnf: &Cnf) -> Result<Outcome> {
    Solver::default().solve(cnf)
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn witness(pairs: &[(u32, bool)]) -> Assignment {
        pairs.iter().map(|&(v, b)| (Var::new(v), b)).collect()
    }

    #[test]
    fn test_unit_chain() {
        let cnf = Cnf::from(vec![vec![1, 2], vec![-1]]);
        let outcome = dp(&cnf).unwrap();
        assert_eq!(
            outcome,
            Outcome::Satisfiable(witness(&[(1, false), (2, true)]))
        );
    }

    #[test]
    fn test_contradiction() {
        let cnf = Cnf::from(vec![vec![1], vec![-1]]);
        assert_eq!(dp(&cnf).unwrap(), Outcome::Unsatisfiable);
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(
            dp(&Cnf::new()).unwrap(),
            Outcome::Satisfiable(Assignment::new())
        );
    }

    #[test]
    fn test_empty_clause() {
        let cnf = Cnf::from(vec![vec![1, 2], vec![]]);
        assert_eq!(dp(&cnf).unwrap(), Outcome::Unsatisfiable);
    }

    #[test]
    fn test_ok() {
        let clauses = vec![
            vec![1, -2, -3],
            vec![-1, 2, -3],
            vec![-1, -2, 3],
            vec![1],
            vec![2],
        ];
        let cnf = Cnf::from(clauses);
        let outcome = dp(&cnf).unwrap();
        assert_eq!(
            outcome,
            Outcome::Satisfiable(witness(&[(1, true), (2, true), (3, true)]))
        );
    }

    #[test]
    fn test_conflict() {
        let clauses = vec![
            vec![-2, -3, -4, 5],
            vec![-1, -5, 6],
            vec![-5, 7],
            vec![-1, -6, -7],
            vec![-1, -2, 5],
            vec![-1, -3, 5],
            vec![-1, -4, 5],
            vec![1, 4],
            vec![-1, 2, 3, 4, 5, -6],
        ];
        let cnf = Cnf::from(clauses);
        let outcome = dp(&cnf).unwrap();
        let assignment = outcome.assignment().unwrap();
        assert!(assignment.satisfies(&cnf));
    }

    #[test]
    fn split_on_smallest_var_true_first() {
        let cnf = Cnf::from(vec![vec![1, 2], vec![-1, 3]]);
        let mut solver = Solver::default();
        let outcome = solver.solve(&cnf).unwrap();
        // 2 drops out with the first clause and stays unassigned
        assert_eq!(outcome, Outcome::Satisfiable(witness(&[(1, true), (3, true)])));
        assert_eq!(solver.stats().decisions, 1);
        assert_eq!(solver.stats().conflicts, 0);
    }

    #[test]
    fn backtrack_to_false_branch() {
        let cnf = Cnf::from(vec![vec![-1, 2], vec![-1, -2], vec![1, 3]]);
        let mut solver = Solver::default();
        let outcome = solver.solve(&cnf).unwrap();
        assert_eq!(outcome, Outcome::Satisfiable(witness(&[(1, false), (3, true)])));
        let stats = solver.stats();
        assert_eq!(stats.decisions, 1);
        assert_eq!(stats.conflicts, 1);
        assert_eq!(stats.leaves, 2);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn leaves_bounded_by_two_to_the_n() {
        // every sign combination over 3 variables
        let mut clauses = vec![];
        for signs in 0..8 {
            let lit = |v: i32| if signs & (1 << (v - 1)) == 0 { v } else { -v };
            clauses.push(vec![lit(1), lit(2), lit(3)]);
        }
        let cnf = Cnf::from(clauses);
        let mut solver = Solver::default();
        assert_eq!(solver.solve(&cnf).unwrap(), Outcome::Unsatisfiable);
        assert!(solver.stats().leaves <= 1 << 3);
        assert_eq!(solver.stats().leaves, solver.stats().conflicts);
    }

    #[test]
    fn repeated_runs_agree() {
        let cnf = Cnf::from(vec![
            vec![1, 2, 3],
            vec![-1, -2],
            vec![-2, -3],
            vec![2, 4],
            vec![-4, 5, -1],
            vec![3, -5],
        ]);
        let first = dp(&cnf).unwrap();
        assert!(first.assignment().unwrap().satisfies(&cnf));
        for _ in 0..5 {
            assert_eq!(dp(&cnf).unwrap(), first);
        }

        let config = SolverConfig::default()
            .with_strategy(Strategy::Random)
            .with_seed(7);
        let random = Solver::new(config.clone()).solve(&cnf).unwrap();
        assert!(random.assignment().unwrap().satisfies(&cnf));
        let mut solver = Solver::new(config);
        assert_eq!(solver.solve(&cnf).unwrap(), random);
        assert_eq!(solver.solve(&cnf).unwrap(), random);
    }

    #[test]
    fn depth_limit_is_reported() {
        let cnf = Cnf::from(vec![vec![-1, 2], vec![-1, -2], vec![1, 3]]);
        let mut solver = Solver::new(SolverConfig::default().with_max_depth(0));
        match solver.solve(&cnf) {
            Err(Error::DepthExhausted { limit }) => assert_eq!(limit, 0),
            other => panic!("unexpected {:?}", other),
        }

        // no split needed: the limit is never hit
        let cnf = Cnf::from(vec![vec![1, 2], vec![-1]]);
        assert!(solver.solve(&cnf).unwrap().is_sat());
    }

    #[test]
    fn partial_solution_tracks_open_vars() {
        let cnf = Cnf::from(vec![vec![1, 2], vec![-3]]);
        let mut solution = PartialSolution::new(&cnf);
        assert_eq!(solution.un_solved().len(), 3);
        solution.assign_lit(Lit::from_dimacs(-3));
        assert!(!solution.un_solved().contains(&Var::new(3)));
        assert_eq!(solution.solution().value(Var::new(3)), Some(false));
        assert!(!solution.is_solved());
    }
}
