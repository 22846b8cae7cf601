use serde::Deserialize;
use crate::error::{AppError, Result};

pub const MISSING_FIELDS: &str = "URL and keyword are required";

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
    pub keyword: Option<String>,
}

impl AnalyzeRequest {
    /// Returns `(url, keyword)`, rejecting the request when either is missing or empty.
    pub fn into_required(self) -> Result<(String, String)> {
        match (self.url, self.keyword) {
            (Some(url), Some(keyword)) if !url.is_empty() && !keyword.is_empty() => Ok((url, keyword)),
            _ => Err(AppError::ValidationError(MISSING_FIELDS.to_string())),
        }
    }
}
