//! Integration tests for decoding spreadsheet exports end to end
//!
//! These tests write CSV files the way spreadsheet tools export them (BOM,
//! quoted cells, trailing blank rows) and run them through the public
//! decoder API and the CLI command runner.

use clap::Parser;
use recruit_decoder::app::services::table_decoder::Termination;
use recruit_decoder::cli::args::Args;
use recruit_decoder::cli::commands;
use recruit_decoder::{Candidate, DecoderConfig, JobPosting, TableDecoder};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tokio_util::sync::CancellationToken;

/// Render one CSV line of `width` cells with the given cells filled in
fn csv_line(width: usize, filled: &[(usize, &str)]) -> String {
    let mut cells = vec![String::new(); width];
    for &(column, value) in filled {
        cells[column] = if value.contains(',') {
            format!("\"{}\"", value)
        } else {
            value.to_string()
        };
    }
    cells.join(",")
}

fn write_csv(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all("\u{feff}".as_bytes()).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn job_posting_export() -> NamedTempFile {
    write_csv(&[
        csv_line(40, &[(0, "基本情報"), (15, "応募条件"), (21, "選考フロー")]),
        csv_line(40, &[(0, "企業名"), (1, "求人名"), (2, "職種")]),
        csv_line(
            40,
            &[
                (0, "株式会社テスト"),
                (1, "法人営業"),
                (2, "営業"),
                (5, "東京都, 大阪府"),
                (6, "3,500,000"),
                (13, "6"),
                (23, "有"),
                (24, "対面"),
                (38, "2024/05/20 14:05:09"),
            ],
        ),
        csv_line(40, &[(0, "株式会社サンプル"), (1, "経理"), (2, "会計士")]),
        csv_line(40, &[]),
        csv_line(40, &[]),
    ])
}

/// Decode a job posting export with two header rows from disk
///
/// Purpose: Validate header skipping, multi-value cells and selection stages end to end
/// Benefit: Ensures exported templates decode without manual cleanup
#[test]
fn test_decode_job_posting_file() {
    let file = job_posting_export();
    let decoder = TableDecoder::<JobPosting>::new(DecoderConfig::default()).unwrap();

    let batch = decoder.decode_path(file.path()).unwrap();

    assert_eq!(batch.len(), 2);
    assert!(batch.rejections.is_empty());
    assert_eq!(batch.termination, Termination::EndOfInput);
    assert_eq!(batch.stats.header_rows_skipped, 2);

    let first = &batch.aggregates[0];
    assert_eq!(first.company_name.as_deref(), Some("株式会社テスト"));
    assert_eq!(first.work_prefectures, vec![13, 27]);
    assert_eq!(first.salary_min, Some(3_500_000));
    assert_eq!(first.requirements.max_job_changes, Some(5));
    let types: Vec<i64> = first.selection_flows.iter().map(|flow| flow.selection_type).collect();
    assert_eq!(types, vec![1, 2]);

    let second = &batch.aggregates[1];
    assert!(second.occupations.is_empty());
    assert_eq!(batch.stats.unrecognized_labels["occupation"]["会計士"], 1);
}

/// Decode a candidate export from an in-memory reader
///
/// Purpose: Validate blank-row termination and rejected line numbers
/// Benefit: Confirms callers can show exactly which rows were skipped
#[test]
fn test_decode_candidate_reader_with_blank_sentinel() {
    let content = [
        csv_line(73, &[(0, "氏名")]),
        csv_line(73, &[(0, "山田太郎"), (3, "1990/04/01"), (20, "株式会社A"), (26, "SE"), (27, "4")]),
        csv_line(73, &[(1, "ふりがなのみ")]),
        csv_line(73, &[(0, "佐藤花子"), (65, "英語"), (66, "ネイティブ")]),
        csv_line(73, &[]),
        csv_line(73, &[]),
        csv_line(73, &[]),
        csv_line(73, &[(0, "読まれない行")]),
    ]
    .join("\n");

    let decoder = TableDecoder::<Candidate>::new(DecoderConfig::default()).unwrap();
    let batch = decoder.decode_reader(content.as_bytes(), "candidates.csv").unwrap();

    let names: Vec<&str> = batch
        .aggregates
        .iter()
        .filter_map(|candidate| candidate.name.as_deref())
        .collect();
    assert_eq!(names, vec!["山田太郎", "佐藤花子"]);
    assert_eq!(batch.rejections, vec![3, 5, 6, 7]);
    assert_eq!(batch.termination, Termination::BlankSentinel { line: 7 });

    let history = &batch.aggregates[0].work_histories[0];
    assert_eq!(history.occupations[0].occupation, Some(8));
    assert_eq!(history.occupations[0].years, Some(4));
    assert_eq!(batch.aggregates[1].languages[0].level, Some(3));
}

/// Run the decode command and read the JSON lines it writes
///
/// Purpose: Validate the CLI path from glob expansion to JSON lines output
/// Benefit: Ensures the command runner wires configuration, decoding and sinks together
#[tokio::test]
async fn test_decode_command_writes_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("postings.csv");
    std::fs::copy(job_posting_export().path(), &input).unwrap();
    let output = temp_dir.path().join("postings.jsonl");

    let args = Args::parse_from([
        "recruit-decoder".to_string(),
        "decode".to_string(),
        "--family".to_string(),
        "job-posting".to_string(),
        "--format".to_string(),
        "jsonl".to_string(),
        "--quiet".to_string(),
        "-o".to_string(),
        output.display().to_string(),
        temp_dir.path().join("*.csv").display().to_string(),
    ]);

    let summary = commands::run(args, CancellationToken::new()).await.unwrap();
    assert_eq!(summary.files_decoded, 1);
    assert!(!summary.has_failures());
    assert_eq!(summary.stats.aggregates_decoded, 2);

    let written = std::fs::read_to_string(&output).unwrap();
    let records: Vec<serde_json::Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "法人営業");
    assert_eq!(records[0]["selection_flows"][1]["selection_type"], 2);
    assert_eq!(records[1]["company_name"], "株式会社サンプル");
}

/// Run the decode command against a missing input
///
/// Purpose: Validate that unreadable inputs fail before any decoding starts
/// Benefit: Gives users an immediate error instead of an empty result
#[tokio::test]
async fn test_decode_command_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.csv");

    let args = Args::parse_from([
        "recruit-decoder".to_string(),
        "decode".to_string(),
        "-f".to_string(),
        "company".to_string(),
        "-q".to_string(),
        missing.display().to_string(),
    ]);

    assert!(commands::run(args, CancellationToken::new()).await.is_err());
}
