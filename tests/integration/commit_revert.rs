//! Integration tests for the commit/revert protocol

use super::test_utils::{write_file, TestWorkspace};
use mvcs::config::VcsConfig;
use mvcs::{ApiError, Repository};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Restoring a commit into an empty directory reproduces every file byte for byte
#[test]
fn test_round_trip_into_clean_directory() {
    let ws = TestWorkspace::new();
    let binary: Vec<u8> = (0u8..=255).collect();
    let paths = vec![
        ws.write("README.md", b"# readme\n"),
        ws.write("src/main.rs", b"fn main() {}\n"),
        ws.write("assets/blob.bin", &binary),
        ws.write("empty.txt", b""),
    ];
    let summary = ws.repo.commit(&paths, "snapshot").unwrap();
    assert_eq!(summary.file_count, 4);

    let dest = TempDir::new().unwrap();
    let report = ws
        .repo
        .revert_into(summary.commit_id.as_str(), dest.path())
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.restored.len(), 4);

    for rel in ["README.md", "src/main.rs", "assets/blob.bin", "empty.txt"] {
        assert_eq!(
            fs::read(dest.path().join(rel)).unwrap(),
            fs::read(ws.root().join(rel)).unwrap(),
            "{} differs",
            rel
        );
    }
}

/// Revert in place overwrites later edits
#[test]
fn test_revert_in_place() {
    let ws = TestWorkspace::new();
    let path = ws.write("notes.txt", b"v1");
    let first = ws.repo.commit(&[path.clone()], "v1").unwrap();

    fs::write(&path, b"v2").unwrap();
    ws.repo.commit(&[path.clone()], "v2").unwrap();

    ws.repo.revert(first.commit_id.as_str()).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"v1");
}

#[test]
fn test_empty_commit_creates_no_record() {
    let ws = TestWorkspace::new();
    let missing = ws.root().join("does-not-exist.txt");

    let err = ws.repo.commit(&[missing], "nothing").unwrap_err();
    assert!(matches!(err, ApiError::NothingToCommit));
    assert!(ws.repo.history().unwrap().is_empty());
}

#[test]
fn test_history_of_three_commits() {
    let ws = TestWorkspace::new();
    let path = ws.write("counter.txt", b"0");

    let mut expected = Vec::new();
    for i in 1..=3 {
        fs::write(&path, i.to_string()).unwrap();
        let summary = ws.repo.commit(&[path.clone()], &format!("commit {}", i)).unwrap();
        expected.push((summary.commit_id, summary.root_hash));
    }

    let history = ws.repo.history().unwrap();
    assert_eq!(history.len(), 3);
    for (entry, (id, root)) in history.iter().zip(&expected) {
        assert_eq!(&entry.commit_id, id);
        assert_eq!(&entry.root_hash, root);
        assert_eq!(entry.file_count, 1);
    }
    let messages: Vec<_> = history.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["commit 1", "commit 2", "commit 3"]);
}

/// Unknown id: NotFound and the destination stays untouched
#[test]
fn test_unknown_id_revert_writes_nothing() {
    let ws = TestWorkspace::new();
    let path = ws.write("a.txt", b"alpha");
    ws.repo.commit(&[path], "m").unwrap();

    let dest = TempDir::new().unwrap();
    let unknown = "f".repeat(64);
    let err = ws.repo.revert_into(&unknown, dest.path()).unwrap_err();
    assert!(matches!(err, ApiError::CommitNotFound(_)));
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}

/// Prefixes of a commit id are not accepted
#[test]
fn test_revert_requires_full_id() {
    let ws = TestWorkspace::new();
    let path = ws.write("a.txt", b"alpha");
    let summary = ws.repo.commit(&[path], "m").unwrap();

    let prefix = summary.commit_id.short(8);
    assert!(matches!(
        ws.repo.revert(prefix),
        Err(ApiError::CommitNotFound(_))
    ));
}

/// Files outside the workspace keep absolute keys and are re-rooted by revert_into
#[test]
fn test_outside_file_rerooted() {
    let ws = TestWorkspace::new();
    let outside_dir = TempDir::new().unwrap();
    let outside = write_file(outside_dir.path(), "external.txt", b"external");

    let summary = ws.repo.commit(&[outside.clone()], "outside").unwrap();
    let record = ws.repo.get_commit(summary.commit_id.as_str()).unwrap();
    let key = record.files.keys().next().unwrap().clone();
    assert!(PathBuf::from(&key).is_absolute());

    let dest = TempDir::new().unwrap();
    let report = ws
        .repo
        .revert_into(summary.commit_id.as_str(), dest.path())
        .unwrap();
    assert!(report.is_complete());

    let relative = key.trim_start_matches('/');
    assert_eq!(fs::read(dest.path().join(relative)).unwrap(), b"external");
}

/// Commits survive closing and reopening the repository
#[test]
fn test_reopen_keeps_commits() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "a.txt", b"alpha");

    let id = {
        let repo = Repository::open(dir.path(), &VcsConfig::default()).unwrap();
        repo.commit(&[path.clone()], "persisted").unwrap().commit_id
    };

    let repo = Repository::open(dir.path(), &VcsConfig::default()).unwrap();
    let history = repo.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].commit_id, id);
    assert!(repo.verify(id.as_str()).unwrap().is_intact());
}

#[test]
fn test_workspace_commit_respects_ignore_patterns() {
    let ws = TestWorkspace::new();
    ws.write("keep.txt", b"keep");
    ws.write("build/out.o", b"obj");
    ws.write(".hidden", b"hidden");

    let mut config = VcsConfig::default();
    config.snapshot.ignore_patterns.push("build".to_string());
    let store = ws.root().join(".mvcs").join("other-store");
    config.storage.store_path = store;
    let repo = Repository::open(ws.root(), &config).unwrap();

    let summary = repo.commit_workspace("ws").unwrap();
    let record = repo.get_commit(summary.commit_id.as_str()).unwrap();
    let keys: Vec<_> = record.files.keys().cloned().collect();
    assert_eq!(keys, vec!["keep.txt".to_string()]);
}

/// A decomposed Unicode name is written back to the same file, not a composed sibling
#[test]
fn test_decomposed_name_reverts_in_place() {
    let ws = TestWorkspace::new();
    let name = "cafe\u{301}.txt";
    let path = ws.write(name, b"v1");
    let summary = ws.repo.commit(&[path.clone()], "v1").unwrap();

    let record = ws.repo.get_commit(summary.commit_id.as_str()).unwrap();
    assert!(record.files.contains_key(name));

    fs::write(&path, b"v2").unwrap();
    let report = ws.repo.revert(summary.commit_id.as_str()).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.restored, vec![name.to_string()]);
    assert_eq!(fs::read(&path).unwrap(), b"v1");

    let entries: Vec<_> = fs::read_dir(ws.root())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|n| n != ".mvcs")
        .collect();
    assert_eq!(entries.len(), 1);
}

/// Names that are not valid UTF-8 are reported as skipped instead of stored under a lossy key
#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_name_is_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let ws = TestWorkspace::new();
    let odd = ws.root().join(OsStr::from_bytes(b"\xffdata.bin"));
    fs::write(&odd, b"v1").unwrap();
    let plain = ws.write("plain.txt", b"plain");

    let summary = ws.repo.commit(&[odd.clone(), plain], "m").unwrap();
    assert_eq!(summary.file_count, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, odd);

    fs::write(&odd, b"v2").unwrap();
    let report = ws.repo.revert(summary.commit_id.as_str()).unwrap();
    assert_eq!(report.restored, vec!["plain.txt".to_string()]);
    assert_eq!(fs::read(&odd).unwrap(), b"v2");
    let count = fs::read_dir(ws.root()).unwrap().count();
    // plain.txt, the odd file and .mvcs
    assert_eq!(count, 3);
}

/// A commit made of non-UTF-8 names only has nothing to store
#[cfg(target_os = "linux")]
#[test]
fn test_only_non_utf8_names_is_nothing_to_commit() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let ws = TestWorkspace::new();
    let odd = ws.root().join(OsStr::from_bytes(b"\xfe.bin"));
    fs::write(&odd, b"v1").unwrap();

    assert!(matches!(
        ws.repo.commit(&[odd], "m"),
        Err(ApiError::NothingToCommit)
    ));
}
