// ==========================================
// 命令行集成测试
// ==========================================
// 测试目标: 子命令、退出码、状态输出
// ==========================================


use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use test_helpers::{sample_rows, sample_xlsx, write_xlsx};

/// 以隔离的配置目录运行 CLI（避免读取用户的 profiles.json）
fn run_cli(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cnc-cutlist"))
        .args(args)
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_convert_success_prints_status() {
    let dir = TempDir::new().unwrap();
    let input = sample_xlsx(&dir);
    let out = dir.path().join("lijst.tap");

    let output = run_cli(
        &dir,
        &["convert", path_str(&input), "--out", path_str(&out), "--locale", "en"],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Converted 4 records"));
    assert!(fs::read_to_string(&out).unwrap().contains("(PROJECT: cutlist)"));
}

#[test]
fn test_missing_input_exits_with_file_access_code() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("bestaat-niet.xlsx");

    let output = run_cli(&dir, &["convert", path_str(&missing)]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bestaat-niet.xlsx"));
}

#[test]
fn test_domain_error_exit_code_and_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lijst.xlsx");
    let mut rows = sample_rows();
    rows[1][4] = "0";
    write_xlsx(&input, "Lijst", &rows);

    let output = run_cli(&dir, &["convert", path_str(&input)]);

    assert_eq!(output.status.code(), Some(5));
    assert!(!dir.path().join("lijst.tap").exists());
}

#[test]
fn test_invalid_settings_exit_code() {
    let dir = TempDir::new().unwrap();
    let input = sample_xlsx(&dir);
    let settings = dir.path().join("machine.json");
    fs::write(&settings, r#"{"peck_step": 0}"#).unwrap();

    let output = run_cli(
        &dir,
        &["convert", path_str(&input), "--settings", path_str(&settings)],
    );

    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = sample_xlsx(&dir);

    let output = run_cli(
        &dir,
        &["convert", path_str(&input), "--format", "csv", "--dry-run", "--locale", "nl"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Proefrun: 4 regels"));
    assert!(stdout.contains("\"by_profile_code\""));
    assert!(!dir.path().join("lijst.csv").exists());
}

#[test]
fn test_inspect_shows_columns_and_preview() {
    let dir = TempDir::new().unwrap();
    let input = sample_xlsx(&dir);

    let output = run_cli(&dir, &["inspect", path_str(&input), "--limit", "2", "--locale", "en"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sheet: Lijst"));
    assert!(stdout.contains("First 2 rows:"));
    assert!(stdout.contains("gaten_x@d_mm"));
    assert!(stdout.contains("\"rows\": 4"));
}

#[test]
fn test_json_logs_carry_rejected_row() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lijst.xlsx");
    let mut rows = sample_rows();
    rows[4][4] = "0";
    write_xlsx(&input, "Lijst", &rows);

    let output = run_cli(&dir, &["--log-json", "convert", path_str(&input)]);

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"level\":\"WARN\""));
    assert!(stderr.contains("\"kind\":\"DomainConstraint\""));
    assert!(stderr.contains("\"row\":\"Some(5)\""));
}
