//! SL interpreter CLI

use clap::{Parser, Subcommand};
use sl::driver::{self, DriverError, RunOptions};
use sl::error::report_error;
use sl::interp::Interpreter;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sl", version, about = "SL - a simple tree-walking interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an SL program
    Run {
        /// Source file to run (stdin when absent)
        file: Option<PathBuf>,
        /// Number of times main is called
        #[arg(short, long, default_value_t = 1)]
        repeat: usize,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() {
    sl::init_tracing();
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Command::Run { file, repeat } => run_file(file.as_deref(), repeat).map_err(Into::into),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn read_program(path: Option<&Path>) -> std::io::Result<(String, String)> {
    match path {
        Some(path) => Ok((path.display().to_string(), std::fs::read_to_string(path)?)),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

fn run_file(path: Option<&Path>, repeats: usize) -> Result<(), DriverError> {
    let (filename, source) = read_program(path)?;

    // With no file the program text came from stdin; readln then sees EOF
    let mut interp = Interpreter::new();
    match driver::run_source(&mut interp, &filename, &source, &RunOptions { repeats }) {
        Ok(_) => Ok(()),
        Err(DriverError::Compile(e)) => {
            report_error(&filename, &source, &e)?;
            Err(DriverError::Compile(e))
        }
        Err(e) => Err(e),
    }
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let tokens = sl::lexer::tokenize(&source)?;
    for (tok, span) in &tokens {
        println!("{span}: {tok:?}");
    }

    println!("\nTotal: {} tokens", tokens.len());
    Ok(())
}
