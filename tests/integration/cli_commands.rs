//! Integration tests for the mvcs binary.

use mvcs::store::{CommitRecord, CommitStore, FileMap, SledCommitStore};
use mvcs::tree::hasher::compute_hash;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary from `cwd` with exactly the given arguments
fn mvcs_in(cwd: &Path, config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mvcs"))
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("MVCS_LOG")
        .current_dir(cwd)
        .args(args)
        .output()
        .unwrap()
}

fn mvcs(workspace: &Path, config_home: &Path, args: &[&str]) -> Output {
    let workspace_arg = workspace.to_string_lossy().into_owned();
    let mut full = vec!["--workspace", workspace_arg.as_str()];
    full.extend_from_slice(args);
    mvcs_in(workspace, config_home, &full)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// First full-width hex token in the output
fn find_commit_id(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_hexdigit())
        .find(|token| token.len() == 64)
        .unwrap()
        .to_string()
}

#[test]
fn test_commit_history_revert_flow() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(&ws).unwrap();
    fs::create_dir_all(&config_home).unwrap();
    fs::write(ws.join("a.txt"), "alpha").unwrap();

    let output = mvcs(&ws, &config_home, &["commit", "-m", "first", "a.txt"]);
    assert!(output.status.success(), "{:?}", output);
    let commit_id = find_commit_id(&stdout(&output));

    let output = mvcs(&ws, &config_home, &["history", "--format", "json"]);
    assert!(output.status.success());
    let history: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(history[0]["commit_id"], commit_id.as_str());
    assert_eq!(history[0]["message"], "first");

    fs::write(ws.join("a.txt"), "changed").unwrap();
    let output = mvcs(&ws, &config_home, &["revert", &commit_id]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(ws.join("a.txt")).unwrap(), "alpha");

    let output = mvcs(&ws, &config_home, &["prove", &commit_id, "a.txt", "--format", "json"]);
    assert!(output.status.success());
    let proof: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(proof["verified"], true);

    let output = mvcs(&ws, &config_home, &["verify", &commit_id]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("intact"));
}

#[test]
fn test_empty_history_message() {
    let temp_dir = TempDir::new().unwrap();
    let output = mvcs(temp_dir.path(), temp_dir.path(), &["history"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No commits found."));
}

#[test]
fn test_unknown_commit_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = mvcs(temp_dir.path(), temp_dir.path(), &["revert", "deadbeef"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Commit not found"));
}

#[test]
fn test_nothing_to_commit_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = mvcs(temp_dir.path(), temp_dir.path(), &["commit", "missing.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to commit"));
}

#[test]
fn test_config_prints_toml() {
    let temp_dir = TempDir::new().unwrap();
    let output = mvcs(temp_dir.path(), temp_dir.path(), &["config"]);
    assert!(output.status.success());
    let parsed: toml::Value = toml::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["storage"]["store_path"].as_str(), Some(".mvcs/store"));
}

#[test]
fn test_partial_revert_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    let dest = temp_dir.path().join("dest");
    fs::create_dir_all(&ws).unwrap();
    fs::write(ws.join("a.txt"), "alpha").unwrap();
    fs::write(ws.join("b.txt"), "beta").unwrap();

    let output = mvcs(&ws, temp_dir.path(), &["commit", "a.txt", "b.txt"]);
    assert!(output.status.success(), "{:?}", output);
    let commit_id = find_commit_id(&stdout(&output));

    // A non-empty directory where a.txt should go cannot be overwritten
    fs::create_dir_all(dest.join("a.txt").join("inner")).unwrap();
    let dest_arg = dest.to_string_lossy().into_owned();
    let output = mvcs(&ws, temp_dir.path(), &["revert", &commit_id, "--into", &dest_arg]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("a.txt"));
    assert_eq!(fs::read_to_string(dest.join("b.txt")).unwrap(), "beta");
}

#[test]
fn test_corrupted_commit_verify_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    fs::create_dir_all(ws.join(".mvcs")).unwrap();

    let mut files = FileMap::new();
    files.insert("a.txt".to_string(), b"alpha".to_vec());
    let record = CommitRecord {
        commit_id: compute_hash(b"tampered commit"),
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        root_hash: compute_hash(b"not the real root"),
        message: "m".to_string(),
        files,
    };
    {
        let store = SledCommitStore::new(ws.join(".mvcs").join("store")).unwrap();
        store.put(&record).unwrap();
    }

    let commit_id = record.commit_id.to_string();
    let output = mvcs(&ws, temp_dir.path(), &["verify", &commit_id]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("CORRUPTED"));

    let output = mvcs(&ws, temp_dir.path(), &["prove", &commit_id, "a.txt"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("NOT verified"));
}

#[test]
fn test_verify_tree_prints_nodes() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "beta").unwrap();

    let output = mvcs(temp_dir.path(), temp_dir.path(), &["commit", "a.txt", "b.txt"]);
    let commit_id = find_commit_id(&stdout(&output));

    let output = mvcs(temp_dir.path(), temp_dir.path(), &["verify", &commit_id, "--tree"]);
    assert!(output.status.success());
    let out = stdout(&output);
    let tree_lines: Vec<&str> = out
        .lines()
        .skip_while(|line| !line.contains("Tree:"))
        .skip(1)
        .collect();
    // root and two leaves
    assert_eq!(tree_lines.len(), 3);
    assert!(tree_lines[1].starts_with("      "));
}

#[test]
fn test_config_and_history_create_no_store() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    assert!(mvcs(&ws, temp_dir.path(), &["config"]).status.success());
    assert!(mvcs(&ws, temp_dir.path(), &["history"]).status.success());
    assert!(!mvcs(&ws, temp_dir.path(), &["verify", &"a".repeat(64)]).status.success());
    assert!(!ws.join(".mvcs").exists());
}

#[test]
fn test_workspace_flag_beats_configured_root() {
    let temp_dir = TempDir::new().unwrap();
    let flag_ws = temp_dir.path().join("flag");
    let configured_ws = temp_dir.path().join("configured");
    fs::create_dir_all(&flag_ws).unwrap();
    fs::create_dir_all(&configured_ws).unwrap();
    fs::write(flag_ws.join("a.txt"), "alpha").unwrap();
    let config_file = temp_dir.path().join("mvcs.toml");
    fs::write(
        &config_file,
        format!("workspace_root = {:?}\n", configured_ws.to_string_lossy()),
    )
    .unwrap();
    let config_arg = config_file.to_string_lossy().into_owned();

    let output = mvcs(&flag_ws, temp_dir.path(), &["--config", &config_arg, "commit", "a.txt"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(flag_ws.join(".mvcs").exists());
    assert!(!configured_ws.join(".mvcs").exists());

    // Without the flag the configured root is used
    let output = mvcs_in(&flag_ws, temp_dir.path(), &["--config", &config_arg, "history"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No commits found."));
}
