//! CLI entry point for the river-crossing solver.
//!
//! Usage:
//!   river-crossing missionary-cannibal <request.json> [options]
//!   river-crossing jealous-husbands --stdin [options]
//!
//! Options:
//!   --stdin            Read the request from stdin instead of a file
//!   --format <fmt>     Output format: json (default) or text
//!
//! Exit codes: 0 solved, 1 no solution, 2 bad request.

use std::fmt::Display;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::error;
use serde::Serialize;

use river_crossing::{
    solve_jealous_husbands, solve_missionary_cannibal, JealousRequest, MissionaryRequest,
    Report, SolveError,
};

#[derive(Parser)]
#[command(name = "river-crossing")]
#[command(about = "Solve the Missionaries-and-Cannibals and Jealous Husbands puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve Missionaries and Cannibals
    MissionaryCannibal {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Solve Jealous Husbands
    JealousHusbands {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Path to request JSON file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read request from stdin instead of file
    #[arg(long)]
    stdin: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Output for a rejected request
#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: &'static str,
    message: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::MissionaryCannibal { input } => {
            let json = match read_request(&input) {
                Ok(json) => json,
                Err(e) => return input_error(e),
            };
            let result = MissionaryRequest::from_json(&json)
                .and_then(|request| solve_missionary_cannibal(&request));
            finish(result, input.format)
        }
        Commands::JealousHusbands { input } => {
            let json = match read_request(&input) {
                Ok(json) => json,
                Err(e) => return input_error(e),
            };
            let result = JealousRequest::from_json(&json)
                .and_then(|request| solve_jealous_husbands(&request));
            finish(result, input.format)
        }
    }
}

fn read_request(input: &InputArgs) -> io::Result<String> {
    if input.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = &input.file {
        fs::read_to_string(path)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "must provide either a file path or --stdin",
        ))
    }
}

fn input_error(err: io::Error) -> ExitCode {
    eprintln!("Error reading request: {}", err);
    ExitCode::from(2)
}

fn finish<S: Serialize + Display>(result: Result<Report<S>, SolveError>, format: Format) -> ExitCode {
    match result {
        Ok(report) => {
            let printed = match format {
                Format::Json => print_json(&report),
                Format::Text => {
                    print!("{}", report.to_text());
                    true
                }
            };
            if !printed {
                ExitCode::from(2)
            } else if report.is_solved() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("request rejected: {}", e);
            match format {
                Format::Json => {
                    print_json(&ErrorOutput {
                        error: e.kind(),
                        message: e.to_string(),
                    });
                }
                Format::Text => eprintln!("Error: {}", e),
            }
            ExitCode::from(2)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            false
        }
    }
}
