// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs parses arguments and
// dispatches here.

pub mod build;
pub mod nearest;
pub mod route;
