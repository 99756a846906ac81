//! Backroads CLI library.
//!
//! Terminal styling and output rendering shared by the `backroads-cli`
//! subcommands.

pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
