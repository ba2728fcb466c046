//! Retention enforcement over real directories.

use std::fs::{File, FileTimes};
use std::time::{Duration, SystemTime};

use hy3d_core::retention::RetentionPolicy;
use hy3d_store::{enforce_retention, ArtifactStore};

fn hours(h: u64) -> Duration {
    Duration::from_secs(h * 3600)
}

/// Create `name` in the store directory with its mtime pushed back by `age`.
fn aged_file(store: &ArtifactStore, name: &str, age: Duration) {
    let path = store.dir().join(name);
    std::fs::write(&path, b"glb").unwrap();
    let times = FileTimes::new().set_modified(SystemTime::now() - age);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_times(times)
        .unwrap();
}

#[test]
fn age_pass_removes_expired_files() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(tmp.path()).unwrap();

    for i in 0..55 {
        aged_file(&store, &format!("old{i:02}.glb"), hours(25));
    }
    for i in 0..5 {
        aged_file(&store, &format!("new{i}.glb"), hours(1));
    }

    let report = enforce_retention(&store, &RetentionPolicy::default());

    assert_eq!(report.files_scanned, 60);
    assert_eq!(report.files_deleted, 55);
    assert!(report.errors.is_empty());
    assert_eq!(store.scan().unwrap().len(), 5);
    // Every survivor is a fresh file.
    for file in store.scan().unwrap() {
        let name = file.path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("new"), "unexpected survivor {name}");
    }
}

#[test]
fn count_pass_evicts_oldest_first() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(tmp.path()).unwrap();

    // 60 files all well within the age bound, f00 the oldest.
    for i in 0..60u64 {
        aged_file(&store, &format!("f{i:02}.glb"), Duration::from_secs(3600 - i));
    }

    let report = enforce_retention(&store, &RetentionPolicy::default());

    assert_eq!(report.files_deleted, 10);
    let survivors: Vec<String> = store
        .scan()
        .unwrap()
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(survivors.len(), 50);
    for i in 0..10 {
        assert!(
            !survivors.contains(&format!("f{i:02}.glb")),
            "oldest file f{i:02}.glb survived"
        );
    }
}

#[test]
fn enforcement_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(tmp.path()).unwrap();

    for i in 0..60u64 {
        aged_file(&store, &format!("f{i:02}.glb"), Duration::from_secs(3600 - i));
    }

    let first = enforce_retention(&store, &RetentionPolicy::default());
    assert_eq!(first.files_deleted, 10);

    let snapshot = |files: Vec<hy3d_core::retention::ScannedFile>| {
        let mut seen: Vec<_> = files.into_iter().map(|f| (f.path, f.modified)).collect();
        seen.sort();
        seen
    };
    let before = snapshot(store.scan().unwrap());
    let second = enforce_retention(&store, &RetentionPolicy::default());
    let after = snapshot(store.scan().unwrap());

    assert_eq!(second.files_deleted, 0);
    assert!(second.errors.is_empty());
    assert_eq!(before, after, "timestamps changed on a no-op pass");
}

#[test]
fn bytes_reclaimed_accumulates() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(tmp.path()).unwrap();

    for i in 0..3 {
        aged_file(&store, &format!("old{i}.glb"), hours(25));
    }

    let report = enforce_retention(&store, &RetentionPolicy::default());
    assert_eq!(report.files_deleted, 3);
    assert_eq!(report.bytes_reclaimed, 9); // three 3-byte files
}

#[test]
fn missing_directory_is_reported_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(tmp.path().join("gone")).unwrap();
    std::fs::remove_dir(store.dir()).unwrap();

    let report = enforce_retention(&store, &RetentionPolicy::default());
    assert_eq!(report.files_deleted, 0);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn fresh_write_survives_enforcement() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArtifactStore::open(tmp.path()).unwrap();

    for i in 0..50u64 {
        aged_file(&store, &format!("f{i:02}.glb"), hours(2));
    }
    let artifact = store.write("just written", b"key", b"fresh-bytes").unwrap();

    enforce_retention(&store, &RetentionPolicy::default());
    assert!(artifact.path.exists(), "the newest artifact was evicted");
}
