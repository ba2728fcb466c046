//! Retention planning for the artifact output directory.
//!
//! The directory is bounded two ways: no file older than the policy age,
//! and no more than the policy count. Planning is pure — the store crate
//! scans the filesystem, asks [`plan_retention`] what to delete, and
//! applies the plan. Running the same plan twice over an unchanged
//! directory deletes nothing.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Default maximum artifact age before eviction.
pub const DEFAULT_MAX_AGE_HOURS: u64 = 24;

/// Default maximum number of artifacts kept in the directory.
pub const DEFAULT_MAX_FILES: usize = 50;

/// Age/count bounds applied to every scan of the output directory.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    /// Files modified longer ago than this are always deleted.
    pub max_age: Duration,
    /// After the age pass, oldest files are deleted until at most this
    /// many remain.
    pub max_files: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(DEFAULT_MAX_AGE_HOURS * 3600),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

// ---------------------------------------------------------------------------
// Plan input / output
// ---------------------------------------------------------------------------

/// A file observed by the directory scan.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
}

/// What a retention pass would delete, split by reason.
#[derive(Debug, Default)]
pub struct RetentionPlan {
    /// Older than `policy.max_age`.
    pub expired: Vec<ScannedFile>,
    /// Within the age bound but beyond `policy.max_files`, oldest first.
    pub evicted: Vec<ScannedFile>,
}

impl RetentionPlan {
    /// Total number of files the plan deletes.
    pub fn deletion_count(&self) -> usize {
        self.expired.len() + self.evicted.len()
    }

    /// All files the plan deletes.
    pub fn deletions(&self) -> impl Iterator<Item = &ScannedFile> {
        self.expired.iter().chain(self.evicted.iter())
    }
}

/// Decide which files a retention pass should delete.
///
/// First every file older than `policy.max_age` is marked expired. If the
/// survivors still outnumber `policy.max_files`, the oldest survivors are
/// marked evicted until the count fits. Ties on modification time are
/// broken by path so the plan is deterministic.
pub fn plan_retention(
    files: &[ScannedFile],
    policy: &RetentionPolicy,
    now: SystemTime,
) -> RetentionPlan {
    let mut plan = RetentionPlan::default();
    let mut survivors: Vec<&ScannedFile> = Vec::with_capacity(files.len());

    for file in files {
        // A file with a modification time in the future has age zero; the
        // implicit effect is that eviction can never race a fresh write
        // into deleting it via the age criterion.
        let age = now
            .duration_since(file.modified)
            .unwrap_or(Duration::ZERO);
        if age > policy.max_age {
            plan.expired.push(file.clone());
        } else {
            survivors.push(file);
        }
    }

    if survivors.len() > policy.max_files {
        survivors.sort_by(|a, b| a.modified.cmp(&b.modified).then(a.path.cmp(&b.path)));
        let excess = survivors.len() - policy.max_files;
        plan.evicted = survivors[..excess].iter().map(|f| (*f).clone()).collect();
    }

    plan
}

// ---------------------------------------------------------------------------
// Cleanup report
// ---------------------------------------------------------------------------

/// Report returned after a retention pass completes.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CleanupReport {
    pub files_scanned: usize,
    pub files_deleted: usize,
    pub bytes_reclaimed: u64,
    /// Deletion failures, logged and carried here — never fatal.
    pub errors: Vec<String>,
}

/// Human-readable byte formatting.
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, age: Duration, now: SystemTime) -> ScannedFile {
        ScannedFile {
            path: PathBuf::from(name),
            modified: now - age,
            size: 1024,
        }
    }

    fn hours(h: u64) -> Duration {
        Duration::from_secs(h * 3600)
    }

    // -- age pass ------------------------------------------------------------

    #[test]
    fn expired_files_are_deleted() {
        let now = SystemTime::now();
        let files: Vec<_> = (0..60)
            .map(|i| {
                let age = if i < 55 { hours(25) } else { hours(1) };
                file(&format!("f{i}.glb"), age, now)
            })
            .collect();

        let plan = plan_retention(&files, &RetentionPolicy::default(), now);
        assert_eq!(plan.expired.len(), 55);
        assert_eq!(plan.evicted.len(), 0);
        assert_eq!(plan.deletion_count(), 55);
    }

    #[test]
    fn age_boundary_is_exclusive() {
        let now = SystemTime::now();
        let files = vec![
            file("exactly.glb", hours(24), now),
            file("over.glb", hours(24) + Duration::from_secs(1), now),
        ];
        let plan = plan_retention(&files, &RetentionPolicy::default(), now);
        assert_eq!(plan.expired.len(), 1);
        assert_eq!(plan.expired[0].path, PathBuf::from("over.glb"));
    }

    // -- count pass ----------------------------------------------------------

    #[test]
    fn count_pass_evicts_oldest() {
        let now = SystemTime::now();
        // 60 fresh files, oldest is f0.
        let files: Vec<_> = (0..60)
            .map(|i| file(&format!("f{i:02}.glb"), Duration::from_secs(600 - i), now))
            .collect();

        let plan = plan_retention(&files, &RetentionPolicy::default(), now);
        assert_eq!(plan.expired.len(), 0);
        assert_eq!(plan.evicted.len(), 10);
        // Evicted are the 10 oldest (smallest i here means largest age).
        let evicted: Vec<_> = plan.evicted.iter().map(|f| f.path.clone()).collect();
        for i in 0..10 {
            assert!(evicted.contains(&PathBuf::from(format!("f{i:02}.glb"))));
        }
    }

    #[test]
    fn count_at_limit_evicts_nothing() {
        let now = SystemTime::now();
        let files: Vec<_> = (0..50)
            .map(|i| file(&format!("f{i}.glb"), Duration::from_secs(i), now))
            .collect();
        let plan = plan_retention(&files, &RetentionPolicy::default(), now);
        assert_eq!(plan.deletion_count(), 0);
    }

    #[test]
    fn age_pass_feeds_count_pass() {
        let now = SystemTime::now();
        // 55 expired + 52 fresh: age pass deletes 55, count pass trims 2.
        let mut files: Vec<_> = (0..55)
            .map(|i| file(&format!("old{i}.glb"), hours(30), now))
            .collect();
        files.extend((0..52).map(|i| file(&format!("new{i:02}.glb"), Duration::from_secs(i), now)));

        let plan = plan_retention(&files, &RetentionPolicy::default(), now);
        assert_eq!(plan.expired.len(), 55);
        assert_eq!(plan.evicted.len(), 2);
    }

    // -- idempotence ---------------------------------------------------------

    #[test]
    fn replanning_survivors_deletes_nothing() {
        let now = SystemTime::now();
        let files: Vec<_> = (0..60)
            .map(|i| file(&format!("f{i:02}.glb"), Duration::from_secs(600 - i), now))
            .collect();

        let first = plan_retention(&files, &RetentionPolicy::default(), now);
        let deleted: Vec<_> = first.deletions().map(|f| f.path.clone()).collect();
        let survivors: Vec<_> = files
            .into_iter()
            .filter(|f| !deleted.contains(&f.path))
            .collect();

        let second = plan_retention(&survivors, &RetentionPolicy::default(), now);
        assert_eq!(second.deletion_count(), 0);
    }

    // -- edge cases ----------------------------------------------------------

    #[test]
    fn future_mtime_is_never_expired() {
        let now = SystemTime::now();
        let files = vec![ScannedFile {
            path: PathBuf::from("fresh.glb"),
            modified: now + Duration::from_secs(60),
            size: 10,
        }];
        let plan = plan_retention(&files, &RetentionPolicy::default(), now);
        assert_eq!(plan.deletion_count(), 0);
    }

    #[test]
    fn empty_directory_plans_nothing() {
        let plan = plan_retention(&[], &RetentionPolicy::default(), SystemTime::now());
        assert_eq!(plan.deletion_count(), 0);
    }

    #[test]
    fn tie_on_mtime_is_deterministic() {
        let now = SystemTime::now();
        let t = now - Duration::from_secs(10);
        let mut files: Vec<_> = (0..52)
            .map(|i| ScannedFile {
                path: PathBuf::from(format!("f{i:02}.glb")),
                modified: t,
                size: 1,
            })
            .collect();
        let plan_a = plan_retention(&files, &RetentionPolicy::default(), now);
        files.reverse();
        let plan_b = plan_retention(&files, &RetentionPolicy::default(), now);

        let paths_a: Vec<_> = plan_a.evicted.iter().map(|f| &f.path).collect();
        let paths_b: Vec<_> = plan_b.evicted.iter().map(|f| &f.path).collect();
        assert_eq!(paths_a, paths_b);
    }

    // -- formatting ----------------------------------------------------------

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
    }
}
