//! Tests for the table session state machine

use super::*;
use crate::app::models::SendTargetJobPosting;
use crate::app::services::table_decoder::row_source::VecRowSource;
use crate::app::services::table_decoder::session::SessionState;
use crate::app::services::table_decoder::stats::Termination;
use crate::app::services::table_decoder::TableDecoder;
use crate::config::DecoderConfig;
use tokio_util::sync::CancellationToken;

const HEADER: &[&str] = &["企業名", "求人名", "求人コード"];

fn decoder(config: DecoderConfig) -> TableDecoder<SendTargetJobPosting> {
    TableDecoder::new(config).unwrap().with_decoded_at(decoded_at())
}

fn default_decoder() -> TableDecoder<SendTargetJobPosting> {
    decoder(DecoderConfig::default())
}

fn titles(batch: &crate::app::services::table_decoder::DecodedBatch<SendTargetJobPosting>) -> Vec<&str> {
    batch
        .aggregates
        .iter()
        .filter_map(|posting| posting.job_title.as_deref())
        .collect()
}

#[test]
fn test_trailing_blank_row_is_not_rejected() {
    let mut source = VecRowSource::from_cells(&[
        HEADER,
        &["A社", "営業"],
        &["B社", "経理"],
        &["C社", "SE"],
        &["", ""],
    ]);

    let batch = default_decoder().decode(&mut source).unwrap();

    assert_eq!(batch.aggregates.len(), 3);
    assert_eq!(titles(&batch), vec!["営業", "経理", "SE"]);
    assert!(batch.rejections.is_empty());
    assert_eq!(batch.termination, Termination::EndOfInput);
    assert!(batch.is_complete());
    assert_eq!(batch.stats.rows_read, 5);
    assert_eq!(batch.stats.header_rows_skipped, 1);
    assert_eq!(batch.stats.blank_rows, 1);
}

#[test]
fn test_blank_sentinel_stops_reading() {
    let mut source = VecRowSource::from_cells(&[
        HEADER,
        &["A社", "営業"],
        &["", "x"],
        &["", ""],
        &["", "y"],
        &["D社", "never read"],
        &["E社", "never read"],
    ]);

    let batch = default_decoder().decode(&mut source).unwrap();

    assert_eq!(titles(&batch), vec!["営業"]);
    assert_eq!(batch.rejections, vec![3, 4, 5]);
    assert_eq!(batch.termination, Termination::BlankSentinel { line: 5 });
    assert_eq!(source.consumed(), 5);
    assert_eq!(batch.stats.rows_rejected, 3);
    assert_eq!(batch.stats.errors.len(), 3);
}

#[test]
fn test_interrupted_blank_run_is_rejected() {
    let mut source = VecRowSource::from_cells(&[
        HEADER,
        &["A社", "営業"],
        &["", "stray"],
        &[""],
        &["B社", "経理"],
    ]);

    let batch = default_decoder().decode(&mut source).unwrap();

    assert_eq!(titles(&batch), vec!["営業", "経理"]);
    assert_eq!(batch.rejections, vec![3, 4]);
    assert_eq!(batch.termination, Termination::EndOfInput);
    assert!((batch.stats.success_rate() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_header_rows_are_never_decoded() {
    let mut source = VecRowSource::from_cells(&[&["見出し", "求人名"], &["A社", "営業"]]);
    let batch = default_decoder().decode(&mut source).unwrap();
    assert_eq!(titles(&batch), vec!["営業"]);

    let mut source = VecRowSource::from_cells(&[
        &["セクション"],
        &["見出し", "求人名"],
        &["A社", "営業"],
    ]);
    let batch = decoder(DecoderConfig::default().with_header_rows(2))
        .decode(&mut source)
        .unwrap();
    assert_eq!(titles(&batch), vec!["営業"]);
    assert_eq!(batch.stats.header_rows_skipped, 2);

    let mut source = VecRowSource::from_cells(&[&["A社", "営業"]]);
    let batch = decoder(DecoderConfig::default().with_header_rows(0))
        .decode(&mut source)
        .unwrap();
    assert_eq!(titles(&batch), vec!["営業"]);
}

#[test]
fn test_empty_row_terminates() {
    let mut source = VecRowSource::new(vec![
        cells(HEADER),
        cells(&["A社", "営業"]),
        Vec::new(),
        cells(&["B社", "never read"]),
    ]);

    let batch = default_decoder().decode(&mut source).unwrap();

    assert_eq!(titles(&batch), vec!["営業"]);
    assert_eq!(batch.termination, Termination::EmptyRow { line: 3 });
    assert!(batch.rejections.is_empty());
    assert_eq!(source.consumed(), 3);
}

#[test]
fn test_input_ending_inside_header() {
    let mut source = VecRowSource::new(Vec::new());
    let batch = default_decoder().decode(&mut source).unwrap();

    assert!(batch.is_empty());
    assert_eq!(batch.termination, Termination::EndOfInput);
    assert_eq!(batch.stats.rows_read, 0);
}

#[test]
fn test_source_failure_is_fatal() {
    let mut source = FailingRowSource::new(vec![cells(HEADER), cells(&["A社", "営業"])]);
    let result = default_decoder().decode(&mut source);

    match result {
        Err(e) => {
            assert!(matches!(e, Error::Io { .. }));
            assert!(e.is_source_failure());
        }
        Ok(batch) => panic!("expected an I/O error, got {} aggregates", batch.len()),
    }
}

#[test]
fn test_cancelled_token_interrupts() {
    let token = CancellationToken::new();
    token.cancel();

    let mut source = VecRowSource::from_cells(&[HEADER, &["A社", "営業"]]);
    let result = default_decoder().decode_cancellable(&mut source, &token);

    assert!(matches!(result, Err(Error::ProcessingInterrupted { .. })));
    assert_eq!(source.consumed(), 0);
}

#[test]
fn test_stepping_and_early_finish() {
    let decoder = default_decoder();
    let mut source = VecRowSource::from_cells(&[HEADER, &["A社", "営業"], &["B社", "経理"]]);
    let mut session = decoder.session();

    assert_eq!(session.state(), SessionState::Header { remaining: 1 });
    session.step(&mut source).unwrap();
    assert_eq!(session.state(), SessionState::Scanning);
    session.step(&mut source).unwrap();
    assert_eq!(session.stats().aggregates_decoded, 1);

    let batch = session.finish();
    assert_eq!(batch.termination, Termination::Stopped);
    assert!(!batch.is_complete());
    assert_eq!(titles(&batch), vec!["営業"]);
}

#[test]
fn test_step_after_done_is_a_no_op() {
    let decoder = default_decoder();
    let mut source = VecRowSource::from_cells(&[HEADER]);
    let mut session = decoder.session();

    session.step(&mut source).unwrap();
    session.step(&mut source).unwrap();
    assert!(session.is_done());

    session.step(&mut source).unwrap();
    assert_eq!(session.state(), SessionState::Done(Termination::EndOfInput));
    assert_eq!(session.stats().rows_read, 1);
}

#[test]
fn test_blank_row_limit_of_one() {
    let mut source = VecRowSource::from_cells(&[HEADER, &["A社", "営業"], &["", ""], &["B社", "経理"]]);
    let batch = decoder(DecoderConfig::default().with_blank_row_limit(1))
        .decode(&mut source)
        .unwrap();

    assert_eq!(titles(&batch), vec!["営業"]);
    assert_eq!(batch.rejections, vec![3]);
    assert_eq!(batch.termination, Termination::BlankSentinel { line: 3 });
}

#[test]
fn test_csv_source_with_bom_and_quoted_delimiters() {
    let file = create_test_csv(
        "\u{feff}企業名,求人名\n\"A社, 本店\",営業\nB社,\"経理,財務\"\n,,\n",
    );

    let batch = default_decoder().decode_path(file.path()).unwrap();

    assert_eq!(batch.aggregates.len(), 2);
    assert_eq!(batch.aggregates[0].company_name.as_deref(), Some("A社, 本店"));
    assert_eq!(batch.aggregates[1].job_title.as_deref(), Some("経理,財務"));
    assert!(batch.rejections.is_empty());
}

#[test]
fn test_decode_rows_numbers_from_line_one() {
    let batch = default_decoder()
        .decode_rows(vec![cells(HEADER), cells(&[""]), cells(&["B社", "経理"])])
        .unwrap();

    assert_eq!(batch.rejections, vec![2]);
    assert_eq!(titles(&batch), vec!["経理"]);
}
