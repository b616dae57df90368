//! Integration tests for the unitcapture-cli binary.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

const CLI: &str = env!("CARGO_BIN_EXE_unitcapture-cli");

const STILL: &str = "[[0,[0,0,0],[0,1,0],[0,0,1],[0,0,0]],\
                      [1,[0,0,0],[0,1,0],[0,0,1],[0,0,0]],\
                      [2,[0,0,0],[0,1,0],[0,0,1],[0,0,0]]]";

#[test]
fn test_reduce_to_output_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("capture.sqf");
    let output = dir.path().join("capture.small.sqf");
    fs::write(&input, STILL).unwrap();

    let status = Command::new(CLI)
        .args(["-q", "reduce"])
        .arg(&input)
        .arg("0.1")
        .arg("-o")
        .arg(&output)
        .status()
        .expect("Failed to run cli");
    assert!(status.success());

    let reduced = fs::read_to_string(&output).unwrap();
    let seq = unitcapture::capture::parse_capture(&reduced).unwrap();
    assert_eq!(seq.len(), 2);
}

#[test]
fn test_reduce_json_summary() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("capture.sqf");
    fs::write(&input, STILL).unwrap();

    let out = Command::new(CLI)
        .args(["-q", "reduce"])
        .arg(&input)
        .args(["0.1", "--json"])
        .output()
        .expect("Failed to run cli");
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["frames_before"], 3);
    assert_eq!(summary["frames_after"], 2);
    assert_eq!(summary["metric"]["kind"], "gaussian_density");
    assert!(summary["reduced"].as_str().unwrap().starts_with("[["));
}

#[test]
fn test_invalid_capture_message() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("broken.sqf");
    fs::write(&input, "{not an array}").unwrap();

    let out = Command::new(CLI)
        .args(["-q", "reduce"])
        .arg(&input)
        .arg("0.1")
        .output()
        .expect("Failed to run cli");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid UnitCapture Output"));
}

#[test]
fn test_invalid_threshold_message() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("capture.sqf");
    fs::write(&input, STILL).unwrap();

    let out = Command::new(CLI)
        .args(["-q", "reduce"])
        .arg(&input)
        .arg("ten")
        .output()
        .expect("Failed to run cli");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid error threshold"));
}

#[test]
fn test_batch_reports_failures() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let good = dir.path().join("good.sqf");
    let bad = dir.path().join("bad.sqf");
    let out_dir = dir.path().join("out");
    fs::write(&good, STILL).unwrap();
    fs::write(&bad, "[[0,[0,0,0],[0,0,0],[0,0,0],[0,0,0]]]").unwrap();

    let status = Command::new(CLI)
        .args(["-q", "batch", "0.1"])
        .arg(&good)
        .arg(&bad)
        .arg("--out-dir")
        .arg(&out_dir)
        .status()
        .expect("Failed to run cli");
    assert!(!status.success(), "one capture had too few frames");

    let reduced = fs::read_to_string(out_dir.join("good.reduced.sqf")).unwrap();
    assert_eq!(unitcapture::capture::parse_capture(&reduced).unwrap().len(), 2);
    assert!(!out_dir.join("bad.reduced.sqf").exists());
}

#[test]
fn test_reduce_from_stdin() {
    let mut child = Command::new(CLI)
        .args(["-q", "reduce", "-", "0.1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run cli");
    child.stdin.take().unwrap().write_all(STILL.as_bytes()).unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());

    let reduced = String::from_utf8(out.stdout).unwrap();
    let seq = unitcapture::capture::parse_capture(reduced.trim()).unwrap();
    assert_eq!(seq.len(), 2);
}

#[test]
fn test_info_report() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("capture.sqf");
    fs::write(&input, STILL).unwrap();

    let out = Command::new(CLI)
        .args(["-q", "info"])
        .arg(&input)
        .output()
        .expect("Failed to run cli");
    assert!(out.status.success());

    let report = String::from_utf8_lossy(&out.stdout);
    assert!(report.contains("Frames:  3"));
    assert!(report.contains("Time:    0 .. 2 (2.000s)"));
    assert!(report.contains("Path:    0.000 m"));
}

#[test]
fn test_batch_rejects_shared_output() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (a, b) = (dir.path().join("a"), dir.path().join("b"));
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("x.sqf"), STILL).unwrap();
    fs::write(b.join("x.sqf"), STILL).unwrap();
    let out_dir = dir.path().join("out");

    let out = Command::new(CLI)
        .args(["-q", "batch", "0.1"])
        .arg(a.join("x.sqf"))
        .arg(b.join("x.sqf"))
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .expect("Failed to run cli");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("would both be written to"));
    assert!(!out_dir.join("x.reduced.sqf").exists());
}

#[test]
fn test_quiet_reduce_prints_nothing_to_stderr() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("capture.sqf");
    fs::write(&input, STILL).unwrap();

    let out = Command::new(CLI)
        .args(["-q", "reduce"])
        .arg(&input)
        .arg("0.1")
        .output()
        .expect("Failed to run cli");
    assert!(out.status.success());
    assert!(out.stderr.is_empty(), "{}", String::from_utf8_lossy(&out.stderr));
}
