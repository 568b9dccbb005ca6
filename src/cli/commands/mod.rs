//! Command implementations for the recruit decoder CLI
//!
//! This module contains the main command dispatch. Each command is
//! implemented in its own module.

pub mod decode;
pub mod schema;
pub mod shared;
pub mod vocab;

pub use shared::RunSummary;

use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Main command runner
///
/// Dispatches to the subcommand handler:
/// - `decode`: decode CSV exports into typed records
/// - `schema`: print a family's column layout
/// - `vocab`: inspect the shipped vocabularies
pub async fn run(args: Args, token: CancellationToken) -> anyhow::Result<RunSummary> {
    match args.get_command() {
        Some(Commands::Decode(decode_args)) => decode::run_decode(decode_args, token).await,
        Some(Commands::Schema(schema_args)) => schema::run_schema(schema_args).await,
        Some(Commands::Vocab(vocab_args)) => vocab::run_vocab(vocab_args).await,
        None => anyhow::bail!("No command given; run with --help for usage"),
    }
}
