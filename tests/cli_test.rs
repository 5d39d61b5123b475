//! Tests for CLI command dispatch against on-disk fixtures

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use zoompack::cli::commands::execute_command;
use zoompack::cli::{Cli, CliError};
use zoompack::exitcode;
use zoompack::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn run(args: &[&str]) -> Result<(), CliError> {
    let cli = Cli::try_parse_from(args).unwrap();
    execute_command(&cli)
}

#[test]
fn given_basic_fixture_when_layout_then_succeeds() {
    run(&["zoompack", "layout", "tests/resources/hierarchies/basic.json"]).unwrap();
}

#[test]
fn given_basic_fixture_when_layout_json_then_succeeds() {
    run(&[
        "zoompack",
        "layout",
        "tests/resources/hierarchies/basic.json",
        "--json",
    ])
    .unwrap();
}

#[test]
fn given_nested_fixture_when_tree_then_succeeds() {
    run(&["zoompack", "tree", "tests/resources/hierarchies/nested.json"]).unwrap();
}

#[test]
fn given_leaf_focus_when_zoom_then_succeeds() {
    run(&[
        "zoompack",
        "zoom",
        "tests/resources/hierarchies/basic.json",
        "--focus",
        "B",
    ])
    .unwrap();
}

#[test]
fn given_unknown_focus_when_zoom_then_usage_error() {
    let err = run(&[
        "zoompack",
        "zoom",
        "tests/resources/hierarchies/basic.json",
        "--focus",
        "nope",
    ])
    .unwrap_err();
    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_zero_steps_when_zoom_then_usage_error() {
    let err = run(&[
        "zoompack",
        "zoom",
        "tests/resources/hierarchies/basic.json",
        "--focus",
        "B",
        "--steps",
        "0",
    ])
    .unwrap_err();
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_missing_file_when_layout_then_noinput_exit_code() {
    let err = run(&["zoompack", "layout", "does-not-exist.json"]).unwrap_err();
    assert!(matches!(err, CliError::Input { .. }));
    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_invalid_hierarchy_when_layout_then_dataerr_exit_code() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"name": "root", "children": [{{"name": "bad", "size": -2}}]}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let err = run(&["zoompack", "layout", &path]).unwrap_err();
    assert!(matches!(err, CliError::Layout(_)));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_scratch_hierarchy_when_slow_zoom_then_succeeds() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"name": "root", "children": [
            {{"name": "x", "size": 5}},
            {{"name": "y", "size": 3, "sectors": [2, 1]}}
        ]}}"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    run(&["zoompack", "zoom", &path, "--focus", "y", "--slow", "--steps", "4"]).unwrap();
}

#[test]
fn given_no_subcommand_then_succeeds_quietly() {
    run(&["zoompack"]).unwrap();
}
