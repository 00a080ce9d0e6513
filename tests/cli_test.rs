//! End-to-end tests of command dispatch on the SPED sample.

use std::fs;

use clap::Parser;
use tempfile::TempDir;

use spedtree::cli::{execute_command, Cli, CliError};
use spedtree::exitcode;
use spedtree::infrastructure::{read_text, Encoding};

const SAMPLE: &str = "tests/resources/sped_sample.txt";
const RELATIONS: &str = "tests/resources/relations.json";

fn run(args: &[&str]) -> Result<i32, CliError> {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    execute_command(&cli)
}

#[test]
fn given_sample_when_filtering_to_file_then_dropped_types_are_gone() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("filtered.txt");
    let out_arg = out.to_string_lossy().to_string();

    let code = run(&[
        "spedtree",
        "-r",
        RELATIONS,
        "filter",
        SAMPLE,
        "--drop",
        "C170",
        "0150",
        "-o",
        out_arg.as_str(),
    ])
    .unwrap();

    assert_eq!(code, exitcode::OK);
    let text = read_text(&out, Encoding::Latin1).unwrap();
    assert_eq!(text.lines().count(), 16);
    assert!(!text.contains("|C170|"));
    assert!(!text.contains("|0150|"));
    assert!(text.contains("AÇÃO"));
}

#[test]
fn given_sample_when_rendering_to_file_then_only_signature_differs() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rendered.txt");
    let out_arg = out.to_string_lossy().to_string();

    run(&["spedtree", "-r", RELATIONS, "render", SAMPLE, "-o", out_arg.as_str()]).unwrap();

    let original = read_text(SAMPLE.as_ref(), Encoding::Latin1).unwrap();
    let rendered = fs::read(&out).unwrap();
    let expected: String = original
        .lines()
        .take(21)
        .map(|l| format!("{}\n", l))
        .collect();
    assert_eq!(rendered, expected.chars().map(|c| c as u8).collect::<Vec<u8>>());
}

#[test]
fn given_sample_when_checking_then_exit_ok() {
    let code = run(&["spedtree", "-r", RELATIONS, "check", SAMPLE]).unwrap();

    assert_eq!(code, exitcode::OK);
}

#[test]
fn given_absent_type_when_finding_then_no_match_exit_code() {
    let err = run(&["spedtree", "-r", RELATIONS, "find", SAMPLE, "-t", "H010"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NO_MATCH);
}

#[test]
fn given_missing_file_when_counting_then_noinput_exit_code() {
    let err = run(&["spedtree", "-r", RELATIONS, "count", "tests/resources/none.txt"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}
