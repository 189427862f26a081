//! peg-dp - peg solitaire planning through a Davis-Putnam SAT solver.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use peg_dp::{
    format::{ClauseFile, ResultFile},
    peg::{self, Board, Plan, Puzzle},
    Outcome, Solver, SolverConfig, Strategy,
};

#[derive(Parser)]
#[command(name = "peg-dp")]
#[command(version, about = "Peg solitaire planning with a Davis-Putnam SAT solver", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a puzzle file as a clause file
    Encode(IoArgs),
    /// Solve a clause file into a result file
    Solve {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        solver: SolverArgs,
        /// Check the satisfying assignment against the formula
        #[arg(long)]
        check: bool,
    },
    /// Decode a result file into the list of jumps
    Decode(IoArgs),
    /// Encode, solve and decode a puzzle file in one go
    Run {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        solver: SolverArgs,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file path
    input: PathBuf,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SolverArgs {
    /// Case split variable selection: direct or random
    #[arg(long, default_value_t = Strategy::Direct)]
    strategy: Strategy,

    /// Seed of the random strategy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Give up beyond this many nested case splits
    #[arg(long)]
    max_depth: Option<usize>,
}

impl From<&SolverArgs> for SolverConfig {
    fn from(args: &SolverArgs) -> Self {
        SolverConfig {
            strategy: args.strategy,
            seed: args.seed,
            max_depth: args.max_depth,
        }
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            io::stdout().write_all(text.as_bytes())?;
            Ok(())
        }
    }
}

fn board(path: &Path) -> anyhow::Result<Board> {
    let puzzle: Puzzle = read(path)?
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Board::new(&puzzle)?)
}

fn encode(io: IoArgs) -> anyhow::Result<()> {
    let board = board(&io.input)?;
    let file = peg::encode(&board).into_clause_file();
    write(io.output.as_deref(), &file.to_string())
}

fn solve(io: IoArgs, solver: SolverArgs, check: bool) -> anyhow::Result<()> {
    let file = ClauseFile::parse(&read(&io.input)?)
        .with_context(|| format!("parsing {}", io.input.display()))?;
    let mut solver = Solver::new(SolverConfig::from(&solver));
    let outcome = solver.solve(&file.cnf)?;

    match &outcome {
        Outcome::Satisfiable(assignment) => {
            if check && !assignment.satisfies(&file.cnf) {
                bail!("assignment does not satisfy {}", io.input.display());
            }
            log::info!("satisfiable, {} variables assigned", assignment.len());
        }
        Outcome::Unsatisfiable => log::info!("unsatisfiable"),
    }
    write(
        io.output.as_deref(),
        &ResultFile::new(outcome, file.aux).to_string(),
    )
}

fn decode(io: IoArgs) -> anyhow::Result<()> {
    let result = ResultFile::parse(&read(&io.input)?)
        .with_context(|| format!("parsing {}", io.input.display()))?;
    let plan = peg::decode(&result)?;
    write(io.output.as_deref(), &plan.to_string())
}

fn run(io: IoArgs, solver: SolverArgs) -> anyhow::Result<()> {
    let board = board(&io.input)?;
    let mut solver = Solver::new(SolverConfig::from(&solver));
    let plan = match peg::plan(&board, &mut solver)? {
        Some(plan) if plan.replay(&board).is_none() => {
            bail!("decoded plan does not solve {}", io.input.display())
        }
        Some(plan) => plan,
        None => {
            log::warn!("{} has no solution", io.input.display());
            Plan::default()
        }
    };
    write(io.output.as_deref(), &plan.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging, RUST_LOG wins over -v
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Encode(io) => encode(io),
        Commands::Solve { io, solver, check } => solve(io, solver, check),
        Commands::Decode(io) => decode(io),
        Commands::Run { io, solver } => run(io, solver),
    }
}
