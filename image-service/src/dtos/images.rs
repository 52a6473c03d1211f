use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;

/// Validated, normalized batch of part numbers.
///
/// Construction is the only validation pass: structural checks and trimming
/// happen here, so everything downstream works with clean identifiers.
#[derive(Debug, Clone)]
pub struct PartNumbers(Vec<String>);

impl PartNumbers {
    /// Parse the raw request body into a batch of 1..=`max_len` trimmed,
    /// non-empty part numbers, in request order.
    pub fn parse(body: &Value, max_len: usize) -> Result<Self, AppError> {
        let parts = body
            .get("partNumbers")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid part numbers provided")))?;

        if parts.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid part numbers provided"
            )));
        }

        if parts.len() > max_len {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Maximum {} part numbers allowed",
                max_len
            )));
        }

        let mut cleaned = Vec::with_capacity(parts.len());
        for part in parts {
            match part.as_str().map(str::trim) {
                Some(p) if !p.is_empty() => cleaned.push(p.to_string()),
                _ => {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "All part numbers must be non-empty strings"
                    )))
                }
            }
        }

        Ok(PartNumbers(cleaned))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Batch size; `parse` guarantees it is between 1 and the configured cap.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One entry in the `images` array: either the fetched image inline or the
/// reason the fetch failed. Failures are first-class here, not errors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartImageResult {
    pub part_number: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PartImageResult {
    pub fn success(part_number: String, data: String, content_type: String, size: usize) -> Self {
        Self {
            part_number,
            success: true,
            data: Some(data),
            content_type: Some(content_type),
            size: Some(size),
            error: None,
        }
    }

    pub fn failure(part_number: String, reason: String) -> Self {
        Self {
            part_number,
            success: false,
            data: None,
            content_type: None,
            size: None,
            error: Some(reason),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FetchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct FetchImagesResponse {
    pub success: bool,
    pub images: Vec<PartImageResult>,
    pub summary: FetchSummary,
}
