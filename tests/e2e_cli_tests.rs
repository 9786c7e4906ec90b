//! End-to-end tests for the `ulaw-prompts` binary: report shape and exit status

mod common;

use common::*;
use serde_json::json;

fn convert_args<'a>(manifest: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "convert",
        "--manifest",
        manifest,
        "--source-dir",
        SOURCE_DIR,
        "--output-dir",
        OUTPUT_DIR,
        "--fallback-only",
    ];
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_convert_wav_reports_fallback() {
    let ws = TestWorkspace::new();
    ws.add_wav("welcome.wav");
    let manifest = ws.write_manifest(&[("welcome.wav", "billing/welcome.ulaw")]);

    let run = run_cli(ws.root(), &convert_args(manifest.to_str().unwrap(), &[]));

    assert_eq!(run.exit_code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(
        run.json(),
        json!({
            "converted": [{
                "source": "welcome.wav",
                "output": "billing/welcome.ulaw",
                "backend": FALLBACK_BACKEND,
            }],
            "skipped": [],
            "failed": [],
        })
    );
    assert_eq!(
        std::fs::read(ws.output("billing/welcome.ulaw")).unwrap().len(),
        FIXTURE_ULAW_BYTES
    );
}

#[test]
fn test_inline_manifest_and_second_run() {
    let ws = TestWorkspace::new();
    ws.add_wav("a.wav");
    let manifest = manifest_json(&[("a.wav", "a.ulaw"), ("missing.wav", "missing.ulaw")]);

    let first = run_cli(ws.root(), &convert_args(&manifest, &[]));
    assert_eq!(first.exit_code, Some(0), "stderr: {}", first.stderr);
    let report = first.json();
    assert_eq!(report["converted"].as_array().unwrap().len(), 1);
    assert_eq!(
        report["skipped"],
        json!([{"source": "missing.wav", "reason": "source_missing"}])
    );

    let second = run_cli(ws.root(), &convert_args(&manifest, &["--pretty"]));
    assert_eq!(second.exit_code, Some(0));
    assert!(second.stdout.contains("\n  \"converted\": []"));
    assert_eq!(
        second.json()["skipped"],
        json!([
            {"source": "a.wav", "reason": "already_exists"},
            {"source": "missing.wav", "reason": "source_missing"},
        ])
    );
}

#[test]
fn test_failed_item_sets_exit_status() {
    let ws = TestWorkspace::new();
    ws.add_wav("1.wav");
    ws.add_file("2.mp3", b"not audio");
    ws.add_wav("3.wav");
    let manifest = ws.write_manifest(&[
        ("1.wav", "1.ulaw"),
        ("2.mp3", "2.ulaw"),
        ("3.wav", "3.ulaw"),
    ]);

    let run = run_cli(ws.root(), &convert_args(manifest.to_str().unwrap(), &[]));

    assert_eq!(run.exit_code, Some(1));
    let report = run.json();
    assert_eq!(report["converted"].as_array().unwrap().len(), 2);
    assert_eq!(report["failed"][0]["source"], "2.mp3");
    assert!(ws.output("1.ulaw").exists());
    assert!(ws.output("3.ulaw").exists());
    assert!(!ws.output("2.ulaw").exists());
}

#[test]
fn test_bad_manifest_is_fatal() {
    let ws = TestWorkspace::new();

    let run = run_cli(ws.root(), &convert_args("[{\"source\": \"a.wav\"}]", &[]));
    assert_eq!(run.exit_code, Some(2));
    assert!(run.stdout.is_empty());

    let run = run_cli(
        ws.root(),
        &convert_args(r#"[{"source": "../a.wav", "output": "a.ulaw"}]"#, &[]),
    );
    assert_eq!(run.exit_code, Some(2));

    let run = run_cli(ws.root(), &convert_args("no-such-manifest.json", &[]));
    assert_eq!(run.exit_code, Some(2));
}

#[test]
fn test_missing_manifest_is_fatal() {
    let ws = TestWorkspace::new();
    let run = run_cli(ws.root(), &["convert", "--fallback-only"]);
    assert_eq!(run.exit_code, Some(2));
    assert!(run.stderr.contains("manifest must be specified"));
}

#[test]
fn test_config_file_overrides_cli() {
    let ws = TestWorkspace::new();
    ws.add_wav("a.wav");
    std::fs::write(
        ws.root().join("config.toml"),
        format!(
            "source_dir = {:?}\noutput_dir = {:?}\nfallback_only = true\nconcurrency = 1\n",
            ws.source_dir().to_string_lossy(),
            ws.root().join("from-config").to_string_lossy(),
        ),
    )
    .unwrap();

    let manifest = manifest_json(&[("a.wav", "a.ulaw")]);
    let run = run_cli(
        ws.root(),
        &convert_args(&manifest, &["--config", "config.toml"]),
    );

    assert_eq!(run.exit_code, Some(0), "stderr: {}", run.stderr);
    assert!(ws.root().join("from-config/a.ulaw").exists());
    assert!(!ws.output("a.ulaw").exists());
}

#[test]
fn test_scan_builds_manifest() {
    let ws = TestWorkspace::new();
    ws.add_wav("billing/Enter The Account Number.wav");
    ws.add_file("surveys/0 welcome.mp3", b"mp3");
    ws.add_file("notes.txt", b"text");

    let run = run_cli(ws.root(), &["scan", SOURCE_DIR]);

    assert_eq!(run.exit_code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(
        run.json(),
        json!([
            {
                "source": "billing/Enter The Account Number.wav",
                "output": "billing/enter_the_account_number.ulaw",
            },
            {"source": "surveys/0 welcome.mp3", "output": "surveys/0_welcome.ulaw"},
        ])
    );
}

#[test]
fn test_scan_output_feeds_convert() {
    let ws = TestWorkspace::new();
    ws.add_wav("Main Menu.wav");

    let scan = run_cli(ws.root(), &["scan", SOURCE_DIR, "--out", "manifest.json"]);
    assert_eq!(scan.exit_code, Some(0), "stderr: {}", scan.stderr);
    assert!(scan.stdout.is_empty());

    let run = run_cli(ws.root(), &convert_args("manifest.json", &[]));
    assert_eq!(run.exit_code, Some(0), "stderr: {}", run.stderr);
    assert!(ws.output("main_menu.ulaw").exists());
}

#[test]
fn test_scan_missing_dir_is_fatal() {
    let ws = TestWorkspace::new();
    let run = run_cli(ws.root(), &["scan", "does-not-exist"]);
    assert_eq!(run.exit_code, Some(2));
}

#[test]
fn test_missing_source_dir_skips_every_entry() {
    let ws = TestWorkspace::new();
    let manifest = manifest_json(&[("a.wav", "out/a.ulaw")]);

    let run = run_cli(
        ws.root(),
        &[
            "convert",
            "--manifest",
            manifest.as_str(),
            "--source-dir",
            "no-such-dir",
            "--output-dir",
            OUTPUT_DIR,
            "--fallback-only",
        ],
    );

    assert_eq!(run.exit_code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(
        run.json(),
        json!({
            "converted": [],
            "skipped": [{"source": "a.wav", "reason": "source_missing"}],
            "failed": [],
        })
    );
    assert!(!ws.output("out").exists());
}

#[test]
fn test_output_dir_that_is_a_file_fails_per_item() {
    let ws = TestWorkspace::new();
    ws.add_wav("a.wav");
    std::fs::write(ws.root().join("taken"), b"not a directory").unwrap();
    let manifest = manifest_json(&[("a.wav", "a.ulaw")]);

    let run = run_cli(
        ws.root(),
        &[
            "convert",
            "--manifest",
            manifest.as_str(),
            "--source-dir",
            SOURCE_DIR,
            "--output-dir",
            "taken",
            "--fallback-only",
        ],
    );

    assert_eq!(run.exit_code, Some(1), "stderr: {}", run.stderr);
    let report = run.json();
    assert_eq!(report["failed"][0]["source"], "a.wav");
    assert!(report["converted"].as_array().unwrap().is_empty());
}
