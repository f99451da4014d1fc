//! Host driver: load a program and run its `main` function

use crate::error::CompileError;
use crate::interp::{Interpreter, RuntimeError, Value, format_runtime_error};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Name of the entry function
pub const ENTRY_POINT: &str = "main";

/// How a program is run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of times `main` is called
    pub repeats: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions { repeats: 1 }
    }
}

/// Failures that stop the driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("No function main() defined in SL source file.")]
    MissingEntryPoint,

    #[error("Function main() must take no arguments, found {arity} parameter(s).")]
    EntryPointParameters { arity: usize },

    /// Writing program output failed
    #[error("{0}")]
    Output(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load `text` and run it
pub fn run_source(
    interp: &mut Interpreter,
    name: &str,
    text: &str,
    options: &RunOptions,
) -> Result<Duration, DriverError> {
    interp.load(name, text)?;
    run(interp, options)
}

/// Call `main` once per repetition and return the total run time.
///
/// A runtime error ends the current repetition only: its message goes to
/// the program output and the next repetition starts.
pub fn run(interp: &mut Interpreter, options: &RunOptions) -> Result<Duration, DriverError> {
    let main = interp
        .registry()
        .lookup(ENTRY_POINT)
        .ok_or(DriverError::MissingEntryPoint)?;
    let arity = main.arity();
    if arity != 0 {
        return Err(DriverError::EntryPointParameters { arity });
    }

    let total = Instant::now();
    for repetition in 1..=options.repeats {
        let start = Instant::now();
        match interp.call(&main, Vec::new()) {
            Ok(Value::Null) => {}
            Ok(value) => print_result(interp, value)?,
            Err(err) => report(interp, &err)?,
        }
        tracing::info!(
            repetition,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "finished run of main"
        );
    }
    Ok(total.elapsed())
}

/// Print through the program's `println` if it has one
fn print_result(interp: &mut Interpreter, value: Value) -> Result<(), DriverError> {
    match interp.registry().lookup("println") {
        Some(println) => {
            if let Err(err) = interp.call(&println, vec![value]) {
                report(interp, &err)?;
            }
        }
        None => interp.write_line(&value.to_string())?,
    }
    Ok(())
}

fn report(interp: &mut Interpreter, err: &RuntimeError) -> Result<(), DriverError> {
    tracing::debug!(error = %err, "main aborted");
    let message = format_runtime_error(err, interp.sources());
    interp.write_line(&message)?;
    Ok(())
}
