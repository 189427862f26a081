use std::{collections::BTreeSet, fmt};

use crate::{
    format::ResultFile,
    peg::{Board, Fluent, Hole, Jump, SymbolTable},
    Result,
};

/// Jumps in the order they are played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan(pub Vec<Jump>);

impl Plan {
    pub fn jumps(&self) -> &[Jump] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plays the jumps on `board` and returns the hole of the last peg standing, if the plan is
    /// legal and leaves exactly one peg.
    pub fn replay(&self, board: &Board) -> Option<Hole> {
        let moves = board.moves();
        let mut pegs: BTreeSet<Hole> = board.holes().filter(|&h| h != board.empty()).collect();
        for jump in &self.0 {
            let mv = jump.mv;
            if !moves.contains(&mv)
                || !pegs.contains(&mv.from)
                || !pegs.contains(&mv.over)
                || pegs.contains(&mv.to)
            {
                log::debug!("illegal {}", jump);
                return None;
            }
            pegs.remove(&mv.from);
            pegs.remove(&mv.over);
            pegs.insert(mv.to);
        }
        match pegs.len() {
            1 => pegs.into_iter().next(),
            _ => None,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for jump in &self.0 {
            writeln!(f, "{}", jump)?;
        }
        Ok(())
    }
}

/// Reads the jumps assigned true out of a result file, ordered by time step. Jumps of the same
/// step keep their payload line order.
///
/// An unsatisfiable result decodes to the empty plan.
pub fn decode(result: &ResultFile) -> Result<Plan> {
    let Some(assignment) = result.outcome.assignment() else {
        log::info!("no satisfying assignment, empty plan");
        return Ok(Plan::default());
    };
    let symbols = SymbolTable::parse(&result.aux)?;
    let mut jumps: Vec<Jump> = symbols
        .iter()
        .filter_map(|(var, fluent)| match fluent {
            Fluent::Jump(jump) if assignment.value(var) == Some(true) => Some(*jump),
            _ => None,
        })
        .collect();
    jumps.sort_by_key(|jump| jump.time);
    log::info!("decoded {} jumps", jumps.len());
    Ok(Plan(jumps))
}
