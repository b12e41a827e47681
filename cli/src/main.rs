use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use minefall_core::{
    Board, BoardConfig, GameError, SolveOutcome, Solver, SolverConfig, from_seed, generate,
};
use rand::Rng;

mod render;

#[derive(Parser)]
#[command(
    name = "minefall",
    version,
    about = "Seeded minesweeper boards with a rule-based auto-solver"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a random board and solve it.
    New(NewArgs),
    /// Rebuild the board a seed token describes and solve it.
    Seed(SeedArgs),
}

#[derive(Args)]
struct NewArgs {
    /// Board width, 9 to 30.
    #[arg(long, default_value_t = 30)]
    width: u8,

    /// Board height, 9 to 30.
    #[arg(long, default_value_t = 16)]
    height: u8,

    /// Mine count, at least 10 and below 93% of the board area.
    #[arg(long, default_value_t = 99)]
    mines: u16,

    #[command(flatten)]
    solve: SolveArgs,
}

#[derive(Args)]
struct SeedArgs {
    /// Seed token produced by a previous run.
    token: String,

    #[command(flatten)]
    solve: SolveArgs,
}

#[derive(Args)]
struct SolveArgs {
    /// Never reveal a random cell to break an early stall.
    #[arg(long)]
    no_probe: bool,

    /// Emit a JSON summary instead of the rendered board.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    let mut rng = rand::rng();
    match command {
        Command::New(args) => {
            let config = BoardConfig::new(args.width, args.height, args.mines);
            let board = generate(config, &mut rng).context("board generation failed")?;
            solve_and_report(board, &args.solve, &mut rng)
        }
        Command::Seed(args) => {
            let board = from_seed(&args.token, &mut rng)
                .with_context(|| format!("seed token {:?} rejected", args.token))?;
            solve_and_report(board, &args.solve, &mut rng)
        }
    }
}

fn solve_and_report<R: Rng>(mut board: Board, args: &SolveArgs, rng: &mut R) -> anyhow::Result<()> {
    let mut solver = Solver::new(SolverConfig {
        random_probe: !args.no_probe,
    });

    let started = Instant::now();
    let result = solver.run(&mut board, rng);
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(outcome) => {
            if args.json {
                print_json(&board, Some(outcome), elapsed)?;
            } else {
                render::clear_screen();
                render::print_board(&board, false);
                println!("outcome: {}", outcome_label(outcome));
                println!("time: {elapsed:.6}s");
            }
            Ok(())
        }
        // A detonation still gets the diagnostic render, mines included,
        // before the nonzero exit. No screen clear so earlier output stays
        // visible.
        Err(err @ GameError::MineDetonated { .. }) => {
            if args.json {
                print_json(&board, None, elapsed)?;
            } else {
                render::print_board(&board, true);
                println!("time: {elapsed:.6}s");
            }
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn outcome_label(outcome: SolveOutcome) -> &'static str {
    match outcome {
        SolveOutcome::Complete => "complete",
        SolveOutcome::Stalled => "stalled",
    }
}

fn print_json(board: &Board, outcome: Option<SolveOutcome>, elapsed: f64) -> anyhow::Result<()> {
    let summary = serde_json::json!({
        "seed": board.seed(),
        "width": board.width(),
        "height": board.height(),
        "mines": board.mine_count(),
        "flagged": board.flagged_count(),
        "revealed": board.revealed_count(),
        "outcome": outcome.map(outcome_label),
        "detonated": board.detonated(),
        "time_seconds": elapsed,
        "board": board,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
