//! Inspect command against capture files on disk.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;
use triumph_cli::handlers::inspect::{filter_for, inspect};
use triumph_cli::presentation::service_lines;
use triumph_cli::{Cli, CliError, Commands};

const CAPTURE: &str = r#"{
  "service": "org.example.lamp",
  "objects": {
    "/": "<node><node name=\"lamp\"/><node name=\"hidden\"/></node>",
    "/lamp": "<node><interface name=\"org.example.Lamp\"><method name=\"Toggle\"/><method name=\"SetLevel\"><arg name=\"level\" type=\"y\"/></method><property name=\"Level\" type=\"y\" access=\"read\"/></interface></node>",
    "/hidden": "<node><interface name=\"org.example.Hidden\"/></node>"
  }
}"#;

fn write_temp(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

fn inspect_args(argv: &[&str]) -> triumph_cli::commands::InspectArgs {
    let cli = Cli::parse_from(argv);
    let Some(Commands::Inspect(args)) = cli.command else {
        panic!("expected inspect");
    };
    args
}

#[tokio::test]
async fn inspect_capture_file() {
    let capture = write_temp(CAPTURE);
    let path = capture.path().to_str().unwrap();
    let args = inspect_args(&["triumph", "inspect", path]);

    let service = inspect(&args).await.unwrap();
    assert_eq!(service.name(), "org.example.lamp");
    assert_eq!(service.objects().len(), 2);

    let lines = service_lines(&service, &filter_for(&args));
    assert!(lines.contains(&"      method SetLevel(byte level)".to_string()));
    assert!(lines.contains(&"      property byte Level [read]".to_string()));
}

#[tokio::test]
async fn inspect_with_overrides_and_filter() {
    let capture = write_temp(CAPTURE);
    let config = write_temp(r#"{ "register_interfaces": false }"#);
    let args = inspect_args(&[
        "triumph",
        "inspect",
        capture.path().to_str().unwrap(),
        "--config",
        config.path().to_str().unwrap(),
        "--exclude",
        "/hidden",
        "--service",
        "org.example.renamed",
        "--filter",
        "set",
    ]);

    let service = inspect(&args).await.unwrap();
    assert_eq!(service.name(), "org.example.renamed");
    assert_eq!(service.objects().len(), 1);

    let lines = service_lines(&service, &filter_for(&args));
    assert_eq!(
        lines,
        vec![
            "org.example.renamed (remote)",
            "  /lamp",
            "    org.example.Lamp",
            "      method SetLevel(byte level)",
        ]
    );
}

#[tokio::test]
async fn exclude_flag_accepts_trailing_slash() {
    let capture = write_temp(CAPTURE);
    let args = inspect_args(&[
        "triumph",
        "inspect",
        capture.path().to_str().unwrap(),
        "--exclude",
        "/hidden/",
    ]);
    let service = inspect(&args).await.unwrap();
    let paths: Vec<_> = service.objects().iter().map(|o| o.path()).collect();
    assert_eq!(paths, vec!["/lamp"]);
}

#[tokio::test]
async fn capture_missing_object_fails() {
    let capture = write_temp(r#"{ "service": "a.b", "objects": { "/": "<node><node name=\"x\"/></node>" } }"#);
    let args = inspect_args(&["triumph", "inspect", capture.path().to_str().unwrap()]);
    let err = inspect(&args).await.unwrap_err();
    assert!(matches!(err, CliError::Inspection(_)));
    assert_eq!(err.exit_code(), 69);
}

#[tokio::test]
async fn missing_capture_file_is_io_error() {
    let mut args = inspect_args(&["triumph", "inspect", "placeholder.json"]);
    args.capture = PathBuf::from("/nonexistent/capture.json");
    let err = inspect(&args).await.unwrap_err();
    assert_eq!(err.exit_code(), 74);
}

#[tokio::test]
async fn invalid_depth_flag_is_config_error() {
    let capture = write_temp(CAPTURE);
    let args = inspect_args(&[
        "triumph",
        "inspect",
        capture.path().to_str().unwrap(),
        "--max-depth",
        "0",
    ]);
    let err = inspect(&args).await.unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}
