//! Library side of the `petrol` binary: argument parsing and the subcommand
//! implementations, kept here so they can be tested without spawning a process.

pub mod args;
pub mod commands;

pub use args::{Args, Command, Common};
pub use commands::Out;
