#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

const BIN: &str = env!("CARGO_BIN_EXE_doctail");

#[test]
fn missing_config_prints_usage() {
    let output = Command::new(BIN).output().expect("run doctail");
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: doctail <config.yaml>"));
    assert!(stderr.contains("not kept between runs"));
}

#[test]
fn each_run_starts_without_a_bookmark() {
    let mut config = NamedTempFile::new().expect("temp file");
    config
        .write_all(b"version: \"1.0\"\ntail_tracking:\n  increasing_field: \"seq\"\n  persistent: true\n")
        .expect("write config");

    for _ in 0..2 {
        let mut child = Command::new(BIN)
            .arg(config.path())
            .env("RUST_LOG", "info")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn doctail");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(b"{\"seq\": 1}\nnot json\n{\"seq\": 2}\n")
            .expect("write stdin");
        let output = child.wait_with_output().expect("wait");
        assert!(output.status.success());

        // Nothing is recovered, so both runs see the same fresh start.
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.lines().count(), 2);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("tail_tracking_recovered"));
        assert!(stderr.contains("tailer_finished"));
    }
}
