#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_folio") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "folio.exe" } else { "folio" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve folio binary path for integration test"),
    }
}

/// Run the binary with an isolated config location under `home`, so the
/// developer's own `~/.config/folio` never leaks into a test.
pub fn run_cli_case(case_name: &str, home: &Path, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("folio-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let output = Command::new(&bin_path)
        .args(args)
        .env("HOME", home)
        .env("FOLIO_CONFIG", home.join("config.toml"))
        .env("FOLIO_OUTPUT_FORMAT", "json")
        .env_remove("FOLIO_CATALOG_FILE")
        .env_remove("FOLIO_STORAGE_PATH")
        .env_remove("FOLIO_STORAGE_THEME_KEY")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute folio command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Parse every stdout line as a JSON document.
pub fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

pub const SAMPLE_CATALOG: &str = r#"
[[project]]
title = "Zeta"
description = "Streaming pipeline for event data"
tools = "Rust, Kafka"
impact = "Cut latency in half"
image = "img/zeta.png"
category = "data"
bullets = ["Designed the ingest path", "Owned on-call"]

[[project]]
title = "Alpha"
description = "Personal portfolio site"
tools = "HTML, CSS"
impact = "Landed interviews"
image = "img/alpha.png"
category = "web"

[[project]]
title = "Mid"
description = "Churn model for subscriptions"
tools = "Python"
impact = "Reduced churn"
image = "img/mid.png"
category = "ml"

[[project]]
title = "Beta"
description = "Operations dashboard"
tools = "Rust, SQL"
impact = "Replaced spreadsheets"
image = "img/beta.png"
category = "web"
"#;
