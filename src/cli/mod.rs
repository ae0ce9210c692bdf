//! CLI module for the worktimer binary.
//!
//! - `commands`: argument definitions using clap derive
//! - `stdin`: the line-based control surface read from standard input

pub mod commands;
pub mod stdin;

pub use commands::Cli;
pub use stdin::spawn_stdin_reader;
