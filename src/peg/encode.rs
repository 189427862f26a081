use std::collections::BTreeSet;

use crate::{
    format::ClauseFile,
    peg::{Board, Fluent, Hole, Jump, Move, SymbolTable},
    Clause, Cnf, Lit, Var,
};

/// The planning problem of a board as a formula, with the meaning of its variables.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub cnf: Cnf,
    pub symbols: SymbolTable,
}

impl Encoding {
    /// The clause file: the formula, then the symbol table as payload.
    pub fn into_clause_file(self) -> ClauseFile {
        let aux = self.symbols.to_string();
        ClauseFile::new(self.cnf, aux)
    }
}

struct Encoder<'a> {
    board: &'a Board,
    symbols: SymbolTable,
    cnf: Cnf,
}

impl Encoder<'_> {
    fn peg(&mut self, hole: Hole, time: u32) -> Var {
        self.symbols.insert(Fluent::Peg { hole, time })
    }

    fn jump(&mut self, mv: Move, time: u32) -> Var {
        self.symbols.insert(Fluent::Jump(Jump { mv, time }))
    }

    fn push(&mut self, lits: impl IntoIterator<Item = Lit>) {
        self.cnf.add_clause(lits.into_iter().collect::<Clause>());
    }

    // jumps happen at 1..=n-2, pegs exist at 1..=n-1
    fn jump_times(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.board.hole_count().saturating_sub(2)
    }

    fn last_time(&self) -> u32 {
        self.board.hole_count() - 1
    }

    // every jump, row by row, each row's jumps time by time
    fn jumps(&self) -> Vec<(Move, u32)> {
        let moves = self.board.moves();
        let mut jumps = vec![];
        for row in moves.chunks(2) {
            for time in self.jump_times() {
                jumps.extend(row.iter().map(|&mv| (mv, time)));
            }
        }
        jumps
    }

    fn number_fluents(&mut self) {
        for (mv, time) in self.jumps() {
            self.jump(mv, time);
        }
        for time in 1..=self.last_time() {
            for hole in self.board.holes() {
                self.peg(hole, time);
            }
        }
    }

    // a jump needs pegs at from and over and a free to, and swaps all three
    fn preconditions_and_effects(&mut self) {
        for (mv, t) in self.jumps() {
            let jump = !self.jump(mv, t).lit(true);
            let facts = [
                (mv.from, t, true),
                (mv.over, t, true),
                (mv.to, t, false),
                (mv.from, t + 1, false),
                (mv.over, t + 1, false),
                (mv.to, t + 1, true),
            ];
            for (hole, time, value) in facts {
                let peg = self.peg(hole, time).lit(value);
                self.push([jump, peg]);
            }
        }
    }

    // a hole only changes when a jump at that time touches it
    fn frame_axioms(&mut self) {
        for hole in self.board.holes() {
            let vacating = self.board.vacating(hole);
            let filling = self.board.filling(hole);
            for t in self.jump_times() {
                if !vacating.is_empty() {
                    let mut clause = vec![
                        self.peg(hole, t).lit(false),
                        self.peg(hole, t + 1).lit(true),
                    ];
                    for &mv in &vacating {
                        clause.push(self.jump(mv, t).lit(true));
                    }
                    self.push(clause);
                }
                if !filling.is_empty() {
                    let mut clause = vec![
                        self.peg(hole, t).lit(true),
                        self.peg(hole, t + 1).lit(false),
                    ];
                    for &mv in &filling {
                        clause.push(self.jump(mv, t).lit(true));
                    }
                    self.push(clause);
                }
            }
        }
    }

    // at most one jump per time step
    fn one_action(&mut self) {
        let moves = self.board.moves();
        let mut pairs = BTreeSet::new();
        for t in self.jump_times() {
            let vars: Vec<Var> = moves.iter().map(|&mv| self.jump(mv, t)).collect();
            for (i, &a) in vars.iter().enumerate() {
                for &b in &vars[i + 1..] {
                    pairs.insert((a.min(b), a.max(b)));
                }
            }
        }
        for (a, b) in pairs {
            self.push([a.lit(false), b.lit(false)]);
        }
    }

    fn initial_state(&mut self) {
        let empty = self.board.empty();
        let lit = self.peg(empty, 1).lit(false);
        self.push([lit]);
        for hole in self.board.holes().filter(|&hole| hole != empty) {
            let lit = self.peg(hole, 1).lit(true);
            self.push([lit]);
        }
    }

    // exactly one peg is left at the end
    fn goal_state(&mut self) {
        let last = self.last_time();
        let holes: Vec<Hole> = self.board.holes().collect();
        let pegs: Vec<Var> = holes.iter().map(|&hole| self.peg(hole, last)).collect();
        self.push(pegs.iter().map(|var| var.lit(true)));
        for (i, &a) in pegs.iter().enumerate() {
            for &b in &pegs[i + 1..] {
                self.push([a.lit(false), b.lit(false)]);
            }
        }
    }
}

/// Encodes the board as a planning problem of `hole_count - 2` time steps ending with a single
/// peg.
pub fn encode(board: &Board) -> Encoding {
    let mut encoder = Encoder {
        board,
        symbols: SymbolTable::new(),
        cnf: Cnf::new(),
    };
    encoder.number_fluents();
    let num_fluents = encoder.symbols.len();

    encoder.preconditions_and_effects();
    encoder.frame_axioms();
    encoder.one_action();
    encoder.initial_state();
    encoder.goal_state();
    debug_assert_eq!(encoder.symbols.len(), num_fluents);

    log::info!(
        "encoded {} holes and {} rows: {} fluents, {} clauses",
        board.hole_count(),
        board.num_rows(),
        num_fluents,
        encoder.cnf.num_clause()
    );
    Encoding {
        cnf: encoder.cnf,
        symbols: encoder.symbols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peg::Puzzle;

    fn board(text: &str) -> Board {
        Board::new(&text.parse::<Puzzle>().unwrap()).unwrap()
    }

    fn var_of(encoding: &Encoding, name: &str) -> i32 {
        let fluent: Fluent = name.parse().unwrap();
        encoding.symbols.var(&fluent).unwrap().id() as i32
    }

    #[test]
    fn numbering_jumps_then_pegs() {
        let encoding = encode(&board("3 3\n1 2 3\n"));
        let names: Vec<String> = encoding
            .symbols
            .iter()
            .map(|(_, f)| f.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Jump(1,2,3,1)",
                "Jump(3,2,1,1)",
                "Peg(1,1)",
                "Peg(2,1)",
                "Peg(3,1)",
                "Peg(1,2)",
                "Peg(2,2)",
                "Peg(3,2)",
            ]
        );
    }

    #[test]
    fn three_hole_line() {
        let encoding = encode(&board("3 3\n1 2 3\n"));
        let v = |name: &str| var_of(&encoding, name);
        let j = v("Jump(1,2,3,1)");
        let clauses = encoding.cnf.clauses();

        // six precondition/effect clauses per jump
        assert_eq!(clauses[0], Clause::from(vec![-j, v("Peg(1,1)")]));
        assert_eq!(clauses[2], Clause::from(vec![-j, -v("Peg(3,1)")]));
        assert_eq!(clauses[5], Clause::from(vec![-j, v("Peg(3,2)")]));

        // frame axioms of hole 1: vacated by Jump(1,2,3), filled by Jump(3,2,1)
        assert_eq!(
            clauses[12],
            Clause::from(vec![-v("Peg(1,1)"), v("Peg(1,2)"), j])
        );
        assert_eq!(
            clauses[13],
            Clause::from(vec![v("Peg(1,1)"), -v("Peg(1,2)"), v("Jump(3,2,1,1)")])
        );

        let cnf = &encoding.cnf;
        let units: Vec<i32> = cnf.units().into_iter().map(Lit::to_dimacs).collect();
        assert_eq!(units, vec![-v("Peg(3,1)"), v("Peg(1,1)"), v("Peg(2,1)")]);
        assert!(cnf
            .clauses()
            .contains(&Clause::from(vec![-j, -v("Jump(3,2,1,1)")])));
        assert!(cnf
            .clauses()
            .contains(&Clause::from(vec![v("Peg(1,2)"), v("Peg(2,2)"), v("Peg(3,2)")])));
    }

    #[test]
    fn clause_counts() {
        // 3 holes, 1 row, 1 jump time:
        // 12 precondition, 2 + 1 + 2 frame (hole 2 is never filled), 1 mutex,
        // 3 initial, 1 + 3 goal
        let encoding = encode(&board("3 3\n1 2 3\n"));
        assert_eq!(encoding.cnf.num_clause(), 12 + 5 + 1 + 3 + 4);
        assert_eq!(encoding.symbols.len(), 8);
    }

    #[test]
    fn payload_is_symbol_table() {
        let file = encode(&board("3 3\n1 2 3\n")).into_clause_file();
        assert!(file.aux.starts_with("1 Jump(1,2,3,1)\n2 Jump(3,2,1,1)\n3 Peg(1,1)\n"));
        let text = file.to_string();
        assert_eq!(ClauseFile::parse(&text).unwrap(), file);
    }
}
