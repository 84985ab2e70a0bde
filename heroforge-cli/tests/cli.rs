use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "heroforge-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_catalog_writes_output() {
    let exe = env!("CARGO_BIN_EXE_heroforge");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-catalog", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Cultures:"));
    assert!(content.contains("barbarian"));
}

#[test]
fn cli_flags_build_json_sheet() {
    let exe = env!("CARGO_BIN_EXE_heroforge");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--seed",
            "7",
            "--culture",
            "barbarian",
            "--career",
            "warrior",
            "--age",
            "adult",
            "--social-class",
            "Freeman",
            "--format",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let snapshot = &report["snapshot"];
    assert_eq!(snapshot["seed"], 7);
    assert_eq!(snapshot["culture"]["key"], "barbarian");
    assert_eq!(snapshot["career"]["key"], "warrior");
    assert_eq!(snapshot["age"]["skill_cap"], 15);
    assert_eq!(snapshot["social_class"], "Freeman");
    assert_eq!(report["rejected"].as_array().map(Vec::len), Some(0));
}

#[test]
fn cli_replays_script_and_reports_rejections() {
    let exe = env!("CARGO_BIN_EXE_heroforge");
    let script_path = temp_path("script.json");
    std::fs::write(
        &script_path,
        r#"[
            {"op": "set_culture", "key": "civilised"},
            {"op": "allocate", "skill": "Locale", "pool": "culture", "amount": 10},
            {"op": "set_career", "key": "astronaut"}
        ]"#,
    )
    .expect("write script");
    let output = Command::new(exe)
        .args(["--format", "json", "--script"])
        .arg(&script_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["rejected"][0]["index"], 2);
    assert_eq!(report["rejected"][0]["rejection"]["reason"], "unknown_reference");
    let locale = report["snapshot"]["skills"]
        .as_array()
        .and_then(|rows| rows.iter().find(|row| row["name"] == "Locale"))
        .cloned()
        .expect("locale row");
    assert_eq!(locale["culture"], 10);
}

#[test]
fn cli_strict_mode_fails_on_rejection() {
    let exe = env!("CARGO_BIN_EXE_heroforge");
    let output = Command::new(exe)
        .args(["--strict", "--culture", "atlantis"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rejected"));
}

#[test]
fn cli_refuses_out_of_range_budget() {
    let exe = env!("CARGO_BIN_EXE_heroforge");
    let output = Command::new(exe)
        .args(["--budget", "500"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
