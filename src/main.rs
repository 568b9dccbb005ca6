use clap::Parser;
use recruit_decoder::TableFamily;
use recruit_decoder::app::services::table_decoder::families::schema_for;
use recruit_decoder::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

const EXIT_OK: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PARTIAL: i32 = 2;

fn main() {
    let args = Args::parse();

    // Bare invocation prints the overview instead of clap's usage error
    if args.command.is_none() {
        print_overview();
        process::exit(EXIT_OK);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: cannot start the tokio runtime: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    let token = CancellationToken::new();
    let outcome = runtime.block_on(async {
        let interrupt = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted; finishing the current row and stopping");
                interrupt.cancel();
            }
        });

        commands::run(args, token.clone()).await
    });

    let code = match outcome {
        Ok(summary) if summary.has_failures() => EXIT_PARTIAL,
        Ok(_) => EXIT_OK,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            EXIT_ERROR
        }
    };
    process::exit(code);
}

/// Overview shown when no subcommand is given
fn print_overview() {
    println!("recruit-decoder {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Turns recruiting-platform spreadsheet exports into JSON records.");
    println!("Each row becomes one company, job posting, candidate or send-target");
    println!("posting; rows that cannot be decoded are listed by line number.");
    println!();
    println!("Table families (--family):");
    for family in TableFamily::ALL {
        match schema_for(*family) {
            Ok(schema) => println!(
                "    {:<12} {:>3} columns, {} header row(s)",
                family.name(),
                schema.width(),
                schema.header_rows()
            ),
            Err(_) => println!("    {}", family.name()),
        }
    }
    println!();
    println!("Subcommands:");
    println!("    decode    Decode one or more CSV exports (globs allowed)");
    println!("    schema    Show the column-to-field layout of a family");
    println!("    vocab     List label vocabularies or dump one of them");
    println!();
    println!("Try:");
    println!("    recruit-decoder decode -f job-posting postings.csv");
    println!("    recruit-decoder decode -f candidate --format jsonl -o out.jsonl 'exports/*.csv'");
    println!("    recruit-decoder schema -f company");
    println!();
    println!("A table ends after three rows with an empty first column.");
    println!("Set RUST_LOG=debug (or pass -v) to see per-row diagnostics on stderr.");
    println!("Exit status: {} ok, {} error, {} some files failed.", EXIT_OK, EXIT_ERROR, EXIT_PARTIAL);
}
