//! Utility primitives shared by the rename steps and the CLI.
//!
//! - `command` - Command execution with streamed output
//! - `io` - File I/O with consistent error handling
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod validation;
