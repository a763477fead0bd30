//! Golden command-line tool.
//!
//! The binary (`golden`) is a thin shell over these modules so that command
//! handlers can be exercised from integration tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
