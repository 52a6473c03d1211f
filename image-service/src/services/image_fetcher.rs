//! Upstream CDN client: per-item fetch classification and batch fan-out.

use crate::config::UpstreamConfig;
use crate::dtos::{PartImageResult, PartNumbers};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::future::join_all;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE,
    PRAGMA, USER_AGENT,
};
use service_core::error::AppError;

/// Terminal state of a single image fetch. A failed fetch is a value, not an
/// error: one bad part number must never abort the batch.
#[derive(Debug)]
pub enum FetchOutcome {
    Success { bytes: Vec<u8>, content_type: String },
    Failure { reason: String },
}

#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl ImageFetcher {
    pub fn new(config: UpstreamConfig) -> Result<Self, AppError> {
        // The upstream host filters requests that don't look like a browser,
        // so every fetch carries this header set.
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("image/*,*/*;q=0.8"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Derive the upstream URL for a trimmed part number.
    pub fn resolve_url(&self, part_number: &str) -> String {
        format!(
            "{}/{}.jpg",
            self.config.base_url.trim_end_matches('/'),
            part_number
        )
    }

    /// Fetch one image and classify the outcome. Infallible: every failure
    /// path becomes a `FetchOutcome::Failure`.
    pub async fn fetch_one(&self, part_number: &str) -> FetchOutcome {
        let url = self.resolve_url(part_number);
        tracing::info!(part_number = %part_number, url = %url, "Fetching image");

        match self.try_fetch(&url).await {
            Ok((bytes, content_type)) => {
                tracing::info!(
                    part_number = %part_number,
                    size = bytes.len(),
                    content_type = %content_type,
                    "Image fetched"
                );
                FetchOutcome::Success {
                    bytes,
                    content_type,
                }
            }
            Err(reason) => {
                tracing::warn!(part_number = %part_number, reason = %reason, "Image fetch failed");
                FetchOutcome::Failure { reason }
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<(Vec<u8>, String), String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let content_type = match content_type {
            Some(ct) if ct.starts_with("image/") => ct,
            _ => return Err("Response is not an image".to_string()),
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        // The CDN answers unknown part numbers with HTTP 200 and a tiny
        // substitute image; anything under the threshold counts as not found.
        if bytes.len() < self.config.min_image_bytes {
            return Err("Image file too small (likely not found)".to_string());
        }

        Ok((bytes.to_vec(), content_type))
    }

    fn transport_error(&self, err: reqwest::Error) -> String {
        if err.is_timeout() {
            format!("Request timed out after {} seconds", self.config.timeout_secs)
        } else {
            err.to_string()
        }
    }

    /// Fan out one fetch task per part number, wait for all of them to
    /// settle, and return results aligned with the input order.
    pub async fn fetch_batch(&self, parts: &PartNumbers) -> Vec<PartImageResult> {
        tracing::info!(count = parts.len(), "Fetching images for batch");

        let handles: Vec<_> = parts
            .iter()
            .map(|part| {
                let fetcher = self.clone();
                let part = part.to_string();
                tokio::spawn(async move {
                    let outcome = fetcher.fetch_one(&part).await;
                    (part, outcome)
                })
            })
            .collect();

        let settled = join_all(handles).await;

        let results: Vec<PartImageResult> = settled
            .into_iter()
            .zip(parts.iter())
            .map(|(joined, part)| match joined {
                Ok((part, FetchOutcome::Success { bytes, content_type })) => {
                    let size = bytes.len();
                    PartImageResult::success(part, BASE64.encode(&bytes), content_type, size)
                }
                Ok((part, FetchOutcome::Failure { reason })) => {
                    PartImageResult::failure(part, reason)
                }
                // Backstop for a fetch task that never produced an outcome
                // (panic or cancellation).
                Err(join_err) => {
                    tracing::error!(
                        part_number = %part,
                        error = %join_err,
                        "Fetch task failed to complete"
                    );
                    PartImageResult::failure(part.to_string(), join_failure_reason(join_err))
                }
            })
            .collect();

        let successful = results.iter().filter(|r| r.success).count();
        tracing::info!(
            total = results.len(),
            successful,
            failed = results.len() - successful,
            "Batch fetch complete"
        );

        results
    }
}

/// Map a task that never settled to a human-readable failure reason: the
/// panic message when one is available, otherwise a generic fallback.
fn join_failure_reason(err: tokio::task::JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Unknown error occurred".to_string()),
        Err(_) => "Unknown error occurred".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> UpstreamConfig {
        UpstreamConfig {
            base_url: "https://cdn.example.com/transform".to_string(),
            timeout_secs: 10,
            min_image_bytes: 1000,
            max_part_numbers: 6,
        }
    }

    #[test]
    fn resolve_url_appends_part_and_extension() {
        let fetcher = ImageFetcher::new(test_config()).unwrap();
        assert_eq!(
            fetcher.resolve_url("ABC123"),
            "https://cdn.example.com/transform/ABC123.jpg"
        );
    }

    #[test]
    fn resolve_url_tolerates_trailing_slash() {
        let mut config = test_config();
        config.base_url.push('/');
        let fetcher = ImageFetcher::new(config).unwrap();
        assert_eq!(
            fetcher.resolve_url("XYZ999"),
            "https://cdn.example.com/transform/XYZ999.jpg"
        );
    }

    #[tokio::test]
    async fn join_failure_reason_uses_static_panic_message() {
        let err = tokio::spawn(async { panic!("boom") }).await.unwrap_err();
        assert_eq!(join_failure_reason(err), "boom");
    }

    #[tokio::test]
    async fn join_failure_reason_uses_formatted_panic_message() {
        let err = tokio::spawn(async { panic!("{} exploded", "task") })
            .await
            .unwrap_err();
        assert_eq!(join_failure_reason(err), "task exploded");
    }

    #[tokio::test]
    async fn join_failure_reason_falls_back_when_no_message_is_available() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        handle.abort();
        let err = handle.await.unwrap_err();
        assert_eq!(join_failure_reason(err), "Unknown error occurred");
    }
}
