//! Streaming download of generated result files.
//!
//! Result URLs point at a CDN, not the signed API endpoint, so downloads
//! are plain GETs. Bytes are streamed chunk-by-chunk with byte-progress
//! logged at debug level — GLB files run into the tens of megabytes.

use futures::StreamExt;

use crate::error::ClientError;

/// Fetch the bytes behind a result URL.
///
/// Fails with [`ClientError::Download`] on a non-2xx status and
/// [`ClientError::Http`] on transport errors mid-stream.
pub async fn download(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, ClientError> {
    tracing::info!(url, "Downloading result file");

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ClientError::Download {
            status: status.as_u16(),
            detail,
        });
    }

    let total = response.content_length();
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        bytes.extend_from_slice(&chunk);
        if let Some(percent) = progress_percent(bytes.len() as u64, total) {
            tracing::debug!(url, downloaded = bytes.len(), percent, "Download progress");
        }
    }

    tracing::info!(url, size = bytes.len(), "Download complete");
    Ok(bytes)
}

/// Calculate download progress as a percentage (0.0–100.0).
///
/// Returns `None` if the total size is unknown or zero.
fn progress_percent(downloaded: u64, total: Option<u64>) -> Option<f64> {
    match total {
        Some(t) if t > 0 => {
            let pct = (downloaded as f64 / t as f64) * 100.0;
            Some(pct.min(100.0))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_known_total() {
        let pct = progress_percent(50, Some(100));
        assert!((pct.unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_unknown_total() {
        assert!(progress_percent(50, None).is_none());
    }

    #[test]
    fn progress_zero_total() {
        assert!(progress_percent(50, Some(0)).is_none());
    }

    #[test]
    fn progress_capped_at_100() {
        let pct = progress_percent(200, Some(100));
        assert!((pct.unwrap() - 100.0).abs() < f64::EPSILON);
    }
}
