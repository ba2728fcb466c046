//! Retention enforcement for the output directory.
//!
//! Invoked after every successful write. Planning is delegated to the
//! pure logic in `hy3d_core::retention`; this module only scans and
//! deletes. Nothing here ever fails the surrounding generation: a file a
//! viewer still has open simply stays until the next pass, recorded in
//! the report and logged.

use std::time::SystemTime;

use hy3d_core::retention::{plan_retention, CleanupReport, RetentionPolicy};

use crate::ArtifactStore;

/// Apply the retention policy to the store's directory.
///
/// Deletes every file older than the policy age, then the oldest
/// survivors until the count bound holds. Returns a [`CleanupReport`];
/// deletion and scan failures are captured there, never raised.
pub fn enforce_retention(store: &ArtifactStore, policy: &RetentionPolicy) -> CleanupReport {
    let mut report = CleanupReport::default();

    let files = match store.scan() {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(error = %e, "Retention scan failed; skipping cleanup");
            report.errors.push(e.to_string());
            return report;
        }
    };
    report.files_scanned = files.len();

    let plan = plan_retention(&files, policy, SystemTime::now());

    for file in plan.deletions() {
        match std::fs::remove_file(&file.path) {
            Ok(()) => {
                report.files_deleted += 1;
                report.bytes_reclaimed += file.size;
                tracing::debug!(path = %file.path.display(), "Artifact deleted by retention");
            }
            Err(e) => {
                // The file may be open in a viewer or already gone;
                // either way the fresh artifact is safe on disk.
                tracing::warn!(
                    path = %file.path.display(),
                    error = %e,
                    "Retention could not delete artifact",
                );
                report
                    .errors
                    .push(format!("{}: {e}", file.path.display()));
            }
        }
    }

    if report.files_deleted > 0 {
        tracing::info!(
            deleted = report.files_deleted,
            bytes = report.bytes_reclaimed,
            dir = %store.dir().display(),
            "Retention pass complete",
        );
    }

    report
}
