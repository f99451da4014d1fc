//! SL: a small dynamically typed language with a tree-walking interpreter
//!
//! Source text is tokenized by [`lexer`], parsed by [`parser`] through the
//! [`ast::NodeBuilder`], and executed by [`interp::Interpreter`]. The
//! [`driver`] runs a program's `main` function.

pub mod ast;
pub mod driver;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;

pub use ast::Span;
pub use error::{CompileError, Result};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=sl=debug` or
/// `RUST_LOG=sl=trace`; events go to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
