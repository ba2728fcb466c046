//! Batch image-to-3D processing.
//!
//! Scans a folder for images, runs each through the normal generation
//! pipeline sequentially (the remote account quota is the bottleneck,
//! not local parallelism), and collects per-file outcomes into a summary.
//! A failed item never aborts the batch.

use std::path::{Path, PathBuf};

use hy3d_client::image::encode_image_payload;
use hy3d_core::request::{GenerateType, GenerationRequest, PolygonType, FACE_COUNT_DEFAULT};
use tokio_util::sync::CancellationToken;

use crate::error::NodeError;
use crate::generate::{GenerationOutcome, Generator};

/// Image extensions the batch scanner accepts (case-insensitive).
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// Default cap on images processed per batch run.
pub const DEFAULT_MAX_IMAGES: usize = 10;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Settings shared by every item of a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned for input images.
    pub input_dir: PathBuf,
    /// Stop after this many images, alphabetically.
    pub max_images: usize,
    pub enable_pbr: bool,
    pub face_count: u32,
    pub generate_type: GenerateType,
    pub polygon_type: PolygonType,
}

impl BatchOptions {
    /// Batch options with documented generation defaults.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            max_images: DEFAULT_MAX_IMAGES,
            enable_pbr: false,
            face_count: FACE_COUNT_DEFAULT,
            generate_type: GenerateType::Normal,
            polygon_type: PolygonType::Triangle,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one batch item.
#[derive(Debug)]
pub struct BatchItemOutcome {
    /// The input image this outcome belongs to.
    pub source: PathBuf,
    pub result: Result<GenerationOutcome, NodeError>,
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<BatchItemOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Multi-line human-readable rendering for the host's text output.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Batch complete: {} succeeded, {} failed, {} total\n",
            self.succeeded(),
            self.failed(),
            self.outcomes.len()
        );
        for outcome in &self.outcomes {
            let name = outcome
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| outcome.source.display().to_string());
            match &outcome.result {
                Ok(done) => {
                    out.push_str(&format!("  ok   {name} -> {}\n", done.artifact.path.display()))
                }
                Err(e) => out.push_str(&format!("  fail {name}: {e}\n")),
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// List supported images in `dir`, sorted by name, capped at `max_images`.
pub fn scan_image_files(dir: &Path, max_images: usize) -> Result<Vec<PathBuf>, NodeError> {
    let entries = std::fs::read_dir(dir).map_err(|source| NodeError::BatchInput {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_supported_extension(path))
        .collect();
    files.sort();

    if files.len() > max_images {
        tracing::info!(
            found = files.len(),
            max_images,
            "Batch input truncated to the image cap",
        );
        files.truncate(max_images);
    }
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Process every image in the batch folder through the generator.
///
/// Items run sequentially; each failure is recorded in the summary and
/// the run continues. Cancellation stops before the next item starts —
/// already-completed artifacts stay on disk.
pub async fn run_batch(
    generator: &Generator,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<BatchSummary, NodeError> {
    let files = scan_image_files(&options.input_dir, options.max_images)?;
    if files.is_empty() {
        return Err(NodeError::EmptyBatch {
            path: options.input_dir.clone(),
        });
    }

    tracing::info!(
        count = files.len(),
        input_dir = %options.input_dir.display(),
        "Starting batch run",
    );

    let mut summary = BatchSummary::default();
    for (index, source) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(
                processed = summary.outcomes.len(),
                remaining = files.len() - index,
                "Batch cancelled by host",
            );
            break;
        }

        tracing::info!(
            item = index + 1,
            total = files.len(),
            file = %source.display(),
            "Processing batch item",
        );

        let result = process_item(generator, options, source, cancel).await;
        if let Err(e) = &result {
            tracing::warn!(file = %source.display(), error = %e, "Batch item failed");
        }
        summary.outcomes.push(BatchItemOutcome {
            source: source.clone(),
            result,
        });
    }

    tracing::info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "Batch run finished",
    );
    Ok(summary)
}

async fn process_item(
    generator: &Generator,
    options: &BatchOptions,
    source: &Path,
    cancel: &CancellationToken,
) -> Result<GenerationOutcome, NodeError> {
    let bytes = std::fs::read(source).map_err(|e| NodeError::BatchInput {
        path: source.to_path_buf(),
        source: e,
    })?;
    let payload = encode_image_payload(&bytes)?;

    let mut request = GenerationRequest::image(payload);
    request.enable_pbr = options.enable_pbr;
    request.face_count = options.face_count;
    request.generate_type = options.generate_type;
    request.polygon_type = options.polygon_type;

    generator.generate(&request, cancel, |_| {}).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    // -- scanning ------------------------------------------------------------

    #[test]
    fn scan_filters_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.png");
        touch(tmp.path(), "b.jpg");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "model.glb");

        let files = scan_image_files(tmp.path(), 10).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn scan_is_case_insensitive_on_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "photo.PNG");
        touch(tmp.path(), "scan.Jpeg");

        let files = scan_image_files(tmp.path(), 10).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn scan_sorts_and_truncates() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["c.png", "a.png", "b.png"] {
            touch(tmp.path(), name);
        }

        let files = scan_image_files(tmp.path(), 2).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn scan_ignores_directories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();
        touch(tmp.path(), "real.png");

        let files = scan_image_files(tmp.path(), 10).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn scan_missing_directory_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let result = scan_image_files(&tmp.path().join("absent"), 10);
        assert!(matches!(result, Err(NodeError::BatchInput { .. })));
    }

    // -- summary -------------------------------------------------------------

    #[test]
    fn summary_counts_and_renders() {
        let mut summary = BatchSummary::default();
        summary.outcomes.push(BatchItemOutcome {
            source: PathBuf::from("cat.png"),
            result: Err(NodeError::Cancelled),
        });

        assert_eq!(summary.succeeded(), 0);
        assert_eq!(summary.failed(), 1);
        let rendered = summary.render();
        assert!(rendered.contains("0 succeeded, 1 failed"));
        assert!(rendered.contains("cat.png"));
    }
}
