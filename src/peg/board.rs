use std::{collections::HashSet, fs, ops::RangeInclusive, path::Path, str::FromStr};

use petgraph::{
    graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex},
    visit::EdgeRef,
    Direction,
};

use crate::{Error, Result};

pub type Hole = u32;

/// A peg jumping from `from` over `over` into `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Hole,
    pub over: Hole,
    pub to: Hole,
}

/// A puzzle file: hole count and initially empty hole, then one line of three holes per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub hole_count: u32,
    pub empty: Hole,
    pub rows: Vec<[Hole; 3]>,
}

impl Puzzle {
    pub fn read(path: impl AsRef<Path>) -> Result<Puzzle> {
        fs::read_to_string(path)?.parse()
    }
}

fn parse_numbers(line_no: usize, line: &str) -> Result<Vec<u32>> {
    line.split_whitespace()
        .map(|token| {
            token.parse().map_err(|e| Error::Parse {
                line: line_no,
                msg: format!("invalid hole `{}`: {}", token, e),
            })
        })
        .collect()
}

impl FromStr for Puzzle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line_no, header) = lines
            .next()
            .ok_or_else(|| Error::Puzzle("empty puzzle file".to_owned()))?;
        let numbers = parse_numbers(line_no, header)?;
        let [hole_count, empty] = numbers[..] else {
            return Err(Error::Parse {
                line: line_no,
                msg: "expected `<hole count> <empty hole>`".to_owned(),
            });
        };

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            let numbers = parse_numbers(line_no, line)?;
            let [a, b, c] = numbers[..] else {
                return Err(Error::Parse {
                    line: line_no,
                    msg: "expected a row of three holes".to_owned(),
                });
            };
            rows.push([a, b, c]);
        }

        Ok(Puzzle {
            hole_count,
            empty,
            rows,
        })
    }
}

/// The holes and the moves between them.
///
/// Every hole is a node; every row contributes an edge in each direction between its end
/// holes, weighted with the middle hole that gets jumped over.
#[derive(Debug, Clone)]
pub struct Board {
    hole_count: u32,
    empty: Hole,
    graph: DiGraph<Hole, Hole>,
    // hole - 1 -> node
    nodes: Vec<NodeIndex>,
}

impl Board {
    pub fn new(puzzle: &Puzzle) -> Result<Board> {
        let n = puzzle.hole_count;
        if n < 2 {
            return Err(Error::Puzzle(format!("{} holes, at least 2 needed", n)));
        }
        if !(1..=n).contains(&puzzle.empty) {
            return Err(Error::Puzzle(format!(
                "empty hole {} is not on the board",
                puzzle.empty
            )));
        }

        let mut graph = DiGraph::with_capacity(n as usize, 2 * puzzle.rows.len());
        let nodes: Vec<_> = (1..=n).map(|hole| graph.add_node(hole)).collect();

        let mut seen = HashSet::new();
        for &[a, b, c] in &puzzle.rows {
            if [a, b, c].iter().any(|hole| !(1..=n).contains(hole)) {
                return Err(Error::Puzzle(format!("row {} {} {} leaves the board", a, b, c)));
            }
            if a == b || b == c || a == c {
                return Err(Error::Puzzle(format!("row {} {} {} repeats a hole", a, b, c)));
            }
            // the same row read backwards is the same row
            if !seen.insert((a.min(c), b, a.max(c))) {
                log::warn!("ignoring duplicate row {} {} {}", a, b, c);
                continue;
            }
            let (a, c) = (nodes[a as usize - 1], nodes[c as usize - 1]);
            graph.add_edge(a, c, b);
            graph.add_edge(c, a, b);
        }

        Ok(Board {
            hole_count: n,
            empty: puzzle.empty,
            graph,
            nodes,
        })
    }

    pub fn hole_count(&self) -> u32 {
        self.hole_count
    }

    pub fn empty(&self) -> Hole {
        self.empty
    }

    pub fn holes(&self) -> RangeInclusive<Hole> {
        1..=self.hole_count
    }

    /// Number of distinct rows.
    pub fn num_rows(&self) -> usize {
        self.graph.edge_count() / 2
    }

    /// Every move, row by row, the forward direction of a row first.
    pub fn moves(&self) -> Vec<Move> {
        self.graph
            .edge_references()
            .map(|edge| self.edge_move(edge).1)
            .collect()
    }

    /// Moves that leave `hole` empty: it is the source or the jumped-over hole.
    pub fn vacating(&self, hole: Hole) -> Vec<Move> {
        let outgoing = self
            .graph
            .edges_directed(self.node(hole), Direction::Outgoing);
        let over = self
            .graph
            .edge_references()
            .filter(|edge| *edge.weight() == hole);
        self.in_row_order(outgoing.chain(over))
    }

    /// Moves that put a peg into `hole`.
    pub fn filling(&self, hole: Hole) -> Vec<Move> {
        let incoming = self
            .graph
            .edges_directed(self.node(hole), Direction::Incoming);
        self.in_row_order(incoming)
    }

    fn node(&self, hole: Hole) -> NodeIndex {
        self.nodes[hole as usize - 1]
    }

    fn edge_move(&self, edge: EdgeReference<'_, Hole>) -> (EdgeIndex, Move) {
        let mv = Move {
            from: self.graph[edge.source()],
            over: *edge.weight(),
            to: self.graph[edge.target()],
        };
        (edge.id(), mv)
    }

    // petgraph walks adjacency lists newest edge first
    fn in_row_order<'a>(&self, edges: impl Iterator<Item = EdgeReference<'a, Hole>>) -> Vec<Move> {
        let mut moves: Vec<_> = edges.map(|edge| self.edge_move(edge)).collect();
        moves.sort_by_key(|&(id, _)| id);
        moves.dedup_by_key(|&mut (id, _)| id);
        moves.into_iter().map(|(_, mv)| mv).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: Hole, over: Hole, to: Hole) -> Move {
        Move { from, over, to }
    }

    // 1
    // 2 3
    // 4 5 6
    const TRIANGLE: &str = "6 1\n1 2 4\n1 3 6\n4 5 6\n";

    #[test]
    fn parse_puzzle() {
        let puzzle: Puzzle = TRIANGLE.parse().unwrap();
        assert_eq!(puzzle.hole_count, 6);
        assert_eq!(puzzle.empty, 1);
        assert_eq!(puzzle.rows, vec![[1, 2, 4], [1, 3, 6], [4, 5, 6]]);
    }

    #[test]
    fn reject_bad_puzzles() {
        assert!(matches!("".parse::<Puzzle>(), Err(Error::Puzzle(_))));
        assert!(matches!("6".parse::<Puzzle>(), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(
            "6 1\n1 2\n".parse::<Puzzle>(),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!("6 a".parse::<Puzzle>(), Err(Error::Parse { .. })));

        for text in ["1 1\n", "3 4\n", "3 1\n1 2 4\n", "3 1\n1 1 3\n"] {
            let puzzle: Puzzle = text.parse().unwrap();
            assert!(
                matches!(Board::new(&puzzle), Err(Error::Puzzle(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn moves_in_row_order() {
        let board = Board::new(&TRIANGLE.parse().unwrap()).unwrap();
        assert_eq!(board.num_rows(), 3);
        assert_eq!(
            board.moves(),
            vec![
                mv(1, 2, 4),
                mv(4, 2, 1),
                mv(1, 3, 6),
                mv(6, 3, 1),
                mv(4, 5, 6),
                mv(6, 5, 4),
            ]
        );
    }

    #[test]
    fn vacating_and_filling() {
        let board = Board::new(&TRIANGLE.parse().unwrap()).unwrap();
        assert_eq!(board.vacating(1), vec![mv(1, 2, 4), mv(1, 3, 6)]);
        assert_eq!(board.filling(1), vec![mv(4, 2, 1), mv(6, 3, 1)]);
        assert_eq!(board.vacating(2), vec![mv(1, 2, 4), mv(4, 2, 1)]);
        assert!(board.filling(2).is_empty());
        assert_eq!(board.vacating(4), vec![mv(4, 2, 1), mv(4, 5, 6)]);
    }

    #[test]
    fn duplicate_rows_are_dropped() {
        let board = Board::new(&"3 1\n1 2 3\n3 2 1\n1 2 3\n".parse().unwrap()).unwrap();
        assert_eq!(board.num_rows(), 1);
        assert_eq!(board.moves(), vec![mv(1, 2, 3), mv(3, 2, 1)]);
    }
}
