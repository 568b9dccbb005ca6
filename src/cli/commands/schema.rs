//! Schema command implementation

use super::shared::RunSummary;
use crate::app::models::TableFamily;
use crate::app::services::table_decoder::families;
use crate::cli::args::SchemaArgs;
use colored::*;

/// Print the column layout of a table family
pub async fn run_schema(args: SchemaArgs) -> anyhow::Result<RunSummary> {
    let family: TableFamily = args.family.into();
    let schema = families::schema_for(family)?;

    println!("{}", format!("{} layout", family).bright_green().bold());
    print!("{}", schema.describe());

    Ok(RunSummary::default())
}
