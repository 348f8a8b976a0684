use crate::common::{
    copy_demo_schedule, make_temp_dir, normalized_lines, read_log_contents, run_in, write_config,
};

#[test]
fn prints_every_section_for_the_demo_schedule() {
    let dir = make_temp_dir("cli");
    write_config(&dir, "day", false);
    copy_demo_schedule(&dir);

    let output = run_in(&dir, &[]);
    assert!(output.status.success(), "run should succeed");
    let lines = normalized_lines(&output.stdout);
    for title in ["CONFIG", "ROWS", "BARS"] {
        assert!(lines.iter().any(|l| l == title), "missing {title}");
    }
    assert!(
        lines
            .iter()
            .any(|l| l == "CHART [2024-03-01 00:00, 2024-03-15 00:00)"),
        "stdout: {lines:?}"
    );
    assert!(lines.iter().any(|l| l.starts_with("Platform / Backend")));
    assert!(lines.iter().any(|l| l.starts_with("Ops / No tasks")));
    assert!(!dir.join("logs").exists(), "file logging was off");
}

#[test]
fn explicit_paths_and_file_logging() {
    let dir = make_temp_dir("cli");
    write_config(&dir, "hour", true);
    copy_demo_schedule(&dir);
    std::fs::rename(dir.join("schedule.json"), dir.join("plan.json")).unwrap();

    let output = run_in(
        &dir,
        &["--config", "config.json", "--data", "plan.json", "--logs", "logs"],
    );
    assert!(output.status.success(), "run should succeed");
    let lines = normalized_lines(&output.stdout);
    assert!(
        lines
            .iter()
            .any(|l| l == "CHART [2024-03-01 00:00, 2024-03-15 23:59)"),
        "stdout: {lines:?}"
    );

    let log = read_log_contents(&dir).expect("log file should exist");
    assert!(log.contains("rows from 'plan.json'"), "log: {log}");
}

#[test]
fn missing_config_fails_with_message() {
    let dir = make_temp_dir("cli");
    copy_demo_schedule(&dir);

    let output = run_in(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = normalized_lines(&output.stderr).join("\n");
    assert!(stderr.contains("config.json"), "stderr: {stderr}");
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn unknown_flag_fails() {
    let dir = make_temp_dir("cli");
    let output = run_in(&dir, &["--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = normalized_lines(&output.stderr);
    assert_eq!(stderr, vec!["Unknown argument: --bogus".to_string()]);
}

#[test]
fn bad_schedule_json_fails() {
    let dir = make_temp_dir("cli");
    write_config(&dir, "day", false);
    std::fs::write(dir.join("schedule.json"), "{ not json").unwrap();

    let output = run_in(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = normalized_lines(&output.stderr).join("\n");
    assert!(stderr.contains("schedule.json"), "stderr: {stderr}");
}
