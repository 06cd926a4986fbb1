use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use chess::board::{init_attack_tables, Board, START_FEN};
use chess::utils::{divide, perft, perft_bench};

#[derive(Parser)]
#[command(name = "riposte", version, about = "Riposte chess core driver")]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes of the game tree to the given depth
    Perft {
        depth: u32,

        /// Position to search, in FEN
        #[arg(long, default_value = START_FEN)]
        fen: String,
    },
    /// Like perft, but print the node subtotal under every root move
    Divide {
        depth: u32,

        /// Position to search, in FEN
        #[arg(long, default_value = START_FEN)]
        fen: String,
    },
    /// Run the perft conformance battery
    Bench,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .ok();

    init_attack_tables();

    match cli.command {
        Command::Perft { depth, fen } => {
            let mut board = match Board::from_fen(&fen) {
                Ok(board) => board,
                Err(err) => {
                    error!("{fen}: {err}");
                    return ExitCode::FAILURE;
                }
            };

            info!("perft({depth}) of {fen}");

            let start = Instant::now();
            let nodes = perft(&mut board, depth);
            let elapsed = start.elapsed();

            println!("Nodes: {nodes}");
            println!("Time:  {:.3}ms", elapsed.as_secs_f64() * 1000.0);
            info!(
                "{:.1} Mnps",
                nodes as f64 / elapsed.as_secs_f64() / 1_000_000.0
            );

            ExitCode::SUCCESS
        }

        Command::Divide { depth, fen } => {
            let mut board = match Board::from_fen(&fen) {
                Ok(board) => board,
                Err(err) => {
                    error!("{fen}: {err}");
                    return ExitCode::FAILURE;
                }
            };

            info!("divide({depth}) of {fen}");
            divide(&mut board, depth);

            ExitCode::SUCCESS
        }

        Command::Bench => {
            info!("running perft conformance battery");

            if perft_bench() {
                info!("bench passed");
                ExitCode::SUCCESS
            } else {
                error!("bench FAILED");
                ExitCode::FAILURE
            }
        }
    }
}
