// crates/renown-cli/src/commands/mod.rs
//
// Command module declarations for the Renown CLI.

pub mod board;
pub mod checkin;
pub mod score;
pub mod snapshot;

use clap::Args;

/// A single account argument.
#[derive(Debug, Args)]
pub struct AccountArg {
    /// Account address (case-insensitive).
    #[arg()]
    pub account: String,
}
