use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn binary_path() -> String {
    let raw = PathBuf::from(env!("CARGO_BIN_EXE_ganttview"));
    if raw.is_absolute() {
        return raw.to_string_lossy().to_string();
    }
    let from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(&raw);
    if from_manifest.exists() {
        return from_manifest.to_string_lossy().to_string();
    }
    raw.to_string_lossy().to_string()
}

pub fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn make_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "{prefix}-{}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = fs::create_dir_all(&dir);
    dir
}

pub fn write_config(dir: &Path, granularity: &str, file_logging: bool) {
    let cfg = format!(
        r#"{{
      "granularity": {{ "value": "{granularity}", "description": "grid" }},
      "cell_width": {{ "value": 30, "description": "width" }},
      "show_now_marker": {{ "value": "False", "description": "now" }},
      "minimum_days": {{ "value": 1, "description": "min" }},
      "file_logging_enabled": {{ "value": "{}", "description": "file logging" }}
    }}"#,
        if file_logging { "True" } else { "False" }
    );
    fs::write(dir.join("config.json"), cfg).unwrap();
}

pub fn copy_demo_schedule(dir: &Path) {
    fs::copy(demo_path("schedule.json"), dir.join("schedule.json")).unwrap();
}

pub fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run binary")
}

fn strip_ansi_and_control(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut bytes = s.bytes().peekable();

    while let Some(b) = bytes.next() {
        if b == 0x1B && matches!(bytes.peek(), Some(b'[')) {
            let _ = bytes.next();
            for nb in bytes.by_ref() {
                if nb.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if b.is_ascii_control() {
            continue;
        }

        out.push(b as char);
    }

    out
}

pub fn normalized_lines(buf: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(buf)
        .lines()
        .map(|l| strip_ansi_and_control(l).trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

pub fn read_log_contents(dir: &Path) -> Option<String> {
    let logs_dir = dir.join("logs");
    let mut entries = fs::read_dir(&logs_dir).ok()?;
    let entry = entries.find_map(|e| e.ok())?;
    fs::read_to_string(entry.path()).ok()
}
