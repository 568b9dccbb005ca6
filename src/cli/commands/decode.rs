//! Decode command implementation
//!
//! Decodes every input file of one table family. Files are independent
//! sessions run on tokio's blocking pool; results are reported in input
//! order once every file has finished.

use super::shared::{RunSummary, create_progress_bar, expand_inputs, load_configuration, setup_logging};
use crate::app::models::{Aggregate, Candidate, Company, JobPosting, SendTargetJobPosting, TableFamily};
use crate::app::services::record_sink::{JsonLinesSink, PreviewSink, RecordSink};
use crate::app::services::table_decoder::{CsvRowSource, DecodedBatch, TableDecoder};
use crate::cli::args::{DecodeArgs, OutputFormat};
use crate::config::DecoderConfig;
use crate::Error;
use anyhow::Context;
use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Rejected line numbers shown per file in the human summary
const MAX_LISTED_REJECTIONS: usize = 10;

/// One input file's batch as written by `--format json`
#[derive(Serialize)]
struct FileOutput<'a, A> {
    source: String,
    #[serde(flatten)]
    batch: &'a DecodedBatch<A>,
}

/// Run the decode command
pub async fn run_decode(args: DecodeArgs, token: CancellationToken) -> anyhow::Result<RunSummary> {
    setup_logging(args.get_log_level(), args.quiet);
    args.validate()?;

    let config = load_configuration(&args)?;
    let files = expand_inputs(&args.inputs)?;
    let family: TableFamily = args.family.into();

    info!("Decoding {} {} file(s)", files.len(), family);

    match family {
        TableFamily::Company => decode_files::<Company>(&args, config, files, token).await,
        TableFamily::JobPosting => decode_files::<JobPosting>(&args, config, files, token).await,
        TableFamily::Candidate => decode_files::<Candidate>(&args, config, files, token).await,
        TableFamily::SendTarget => {
            decode_files::<SendTargetJobPosting>(&args, config, files, token).await
        }
    }
}

async fn decode_files<A: Aggregate>(
    args: &DecodeArgs,
    config: DecoderConfig,
    files: Vec<PathBuf>,
    token: CancellationToken,
) -> anyhow::Result<RunSummary> {
    let start = Instant::now();
    let concurrency = config.max_concurrent_files;
    let decoder = Arc::new(TableDecoder::<A>::new(config)?);

    let pb = if args.show_progress() && args.format == OutputFormat::Human {
        create_progress_bar(files.len() as u64, "Decoding")
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<(PathBuf, crate::Result<DecodedBatch<A>>)> = stream::iter(files)
        .map(|path| {
            let decoder = Arc::clone(&decoder);
            let token = token.clone();
            let pb = pb.clone();
            async move {
                let task_path = path.clone();
                let result = task::spawn_blocking(move || {
                    let mut source = CsvRowSource::from_path(&task_path, decoder.config())?;
                    decoder.decode_cancellable(&mut source, &token)
                })
                .await
                .unwrap_or_else(|e| {
                    Err(Error::processing_interrupted(format!("decode task failed: {}", e)))
                });
                pb.inc(1);
                (path, result)
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    pb.finish_and_clear();

    if token.is_cancelled() {
        return Err(Error::processing_interrupted("Processing interrupted by user").into());
    }

    let mut summary = RunSummary::default();
    let mut batches: Vec<(PathBuf, DecodedBatch<A>)> = Vec::with_capacity(results.len());

    for (path, result) in results {
        match result {
            Ok(batch) => {
                summary.files_decoded += 1;
                summary.stats.merge(&batch.stats);
                batches.push((path, batch));
            }
            Err(e) => {
                error!("Failed to decode {}: {}", path.display(), e);
                summary.files_failed += 1;
                if matches!(e, Error::ProcessingInterrupted { .. }) {
                    return Err(e.into());
                }
            }
        }
    }

    summary.elapsed = start.elapsed();

    match args.format {
        OutputFormat::Human => {
            print_human_summary(&batches, &summary);
            if let Some(output) = &args.output {
                write_json_lines(&batches, open_output(Some(output))?)?;
                println!("  {} {}", "Records written to".bright_cyan(), output.display());
            }
        }
        OutputFormat::Jsonl => write_json_lines(&batches, open_output(args.output.as_ref())?)?,
        OutputFormat::Json => write_json(&batches, open_output(args.output.as_ref())?)?,
    }

    Ok(summary)
}

fn open_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_json_lines<A: Aggregate>(
    batches: &[(PathBuf, DecodedBatch<A>)],
    writer: Box<dyn Write>,
) -> anyhow::Result<()> {
    let mut sink = JsonLinesSink::new(writer);
    for (_, batch) in batches {
        sink.emit(batch)?;
    }
    Ok(())
}

fn write_json<A: Aggregate>(
    batches: &[(PathBuf, DecodedBatch<A>)],
    mut writer: Box<dyn Write>,
) -> anyhow::Result<()> {
    let outputs: Vec<FileOutput<'_, A>> = batches
        .iter()
        .map(|(path, batch)| FileOutput {
            source: path.display().to_string(),
            batch,
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &outputs).context("Failed to write JSON output")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn print_human_summary<A: Aggregate>(batches: &[(PathBuf, DecodedBatch<A>)], summary: &RunSummary) {
    let mut previews = PreviewSink::default();

    for (path, batch) in batches {
        println!("\n{}", path.display().to_string().bright_white().bold());
        println!(
            "  {} {}  {} {}  {} {}",
            "records:".bright_cyan(),
            batch.aggregates.len().to_string().bright_green(),
            "rejected:".bright_cyan(),
            if batch.rejections.is_empty() {
                "0".normal()
            } else {
                batch.rejections.len().to_string().bright_red()
            },
            "ended:".bright_cyan(),
            batch.termination
        );

        if !batch.rejections.is_empty() {
            let listed: Vec<String> = batch
                .rejections
                .iter()
                .take(MAX_LISTED_REJECTIONS)
                .map(|line| line.to_string())
                .collect();
            let more = batch.rejections.len().saturating_sub(MAX_LISTED_REJECTIONS);
            println!(
                "  {} {}{}",
                "rejected lines:".yellow(),
                listed.join(", "),
                if more > 0 { format!(" (+{} more)", more) } else { String::new() }
            );
        }

        for (vocabulary, labels) in &batch.stats.unrecognized_labels {
            let labels: Vec<String> = labels
                .iter()
                .map(|(label, count)| format!("{} x{}", label, count))
                .collect();
            println!(
                "  {} {}: {}",
                "unrecognized".yellow(),
                vocabulary,
                labels.join(", ")
            );
        }

        if let Err(e) = previews.emit(batch) {
            error!("Failed to build preview: {}", e);
        }
    }

    for preview in previews.previews() {
        if let Some(first) = preview.records.first() {
            println!(
                "\n{} {}",
                format!("First {} record", preview.family).bright_cyan(),
                format!("(of {})", preview.total).dimmed()
            );
            println!("  {}", first);
        }
    }

    println!("\n{}", "Decode Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Files decoded:".bright_cyan(),
        summary.files_decoded.to_string().bright_white().bold()
    );
    if summary.has_failures() {
        println!(
            "  {} {}",
            "Files failed:".bright_cyan(),
            summary.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Records:".bright_cyan(),
        summary.stats.aggregates_decoded.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Rejected rows:".bright_cyan(),
        summary.stats.rows_rejected.to_string().bright_white().bold()
    );
    println!(
        "  {} {:.1}%",
        "Success rate:".bright_cyan(),
        summary.stats.success_rate()
    );
    if summary.stats.total_unrecognized() > 0 {
        println!(
            "  {} {}",
            "Unrecognized labels:".bright_cyan(),
            summary.stats.total_unrecognized().to_string().yellow()
        );
    }
    println!(
        "  {} {:.2}s",
        "Elapsed:".bright_cyan(),
        summary.elapsed.as_secs_f64()
    );
}
