//! HTTP client for the docent question API.
//!
//! One POST per request: the visitor's free-text question plus the selected
//! category labels joined by commas. The response body must deserialize into
//! [`ArtworkData`]; anything else is a classified, user-visible failure.

use crate::artwork::ArtworkData;
use crate::cancellation::CancellationToken;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const QUESTIONS_PATH: &str = "/api/questions";

/// Failure taxonomy for the fetch flow. Every variant surfaces as a visible
/// error state with a retry action; none is fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("요청을 보내지 못했습니다: {0}")]
    Network(String),
    #[error("서버 오류가 발생했습니다 (status {0})")]
    HttpStatus(u16),
    #[error("응답을 해석하지 못했습니다: {0}")]
    MalformedResponse(String),
    #[error("요청이 취소되었습니다")]
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest {
    pub question: String,
    pub category: String,
}

#[derive(Clone)]
pub struct DocentClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl DocentClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Single-attempt fetch of generated narration. Blocking; callers run it
    /// inside a task. The token is honored before dispatch and before the
    /// body is parsed, so a navigation-away never applies a late result.
    pub fn fetch_description(
        &self,
        request: &QuestionRequest,
        cancel: &CancellationToken,
    ) -> Result<ArtworkData, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let url = format!("{}{}", self.base_url, QUESTIONS_PATH);
        let body =
            serde_json::to_string(request).map_err(|err| ApiError::Network(err.to_string()))?;
        info!(%url, category = %request.category, "Requesting artwork narration");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .map_err(|err| {
                warn!("Narration request failed: {err}");
                ApiError::Network(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Narration request rejected");
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let text = response
            .text()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        if cancel.is_cancelled() {
            debug!("Dropping narration response for a cancelled request");
            return Err(ApiError::Cancelled);
        }

        serde_json::from_str::<ArtworkData>(&text).map_err(|err| {
            warn!("Narration response did not match the expected shape: {err}");
            ApiError::MalformedResponse(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_token_short_circuits_before_dispatch() {
        let client = DocentClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = QuestionRequest {
            question: "해바라기, 고흐".into(),
            category: "미술사".into(),
        };
        assert_eq!(
            client.fetch_description(&request, &cancel),
            Err(ApiError::Cancelled)
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = DocentClient::new("http://example.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://example.test");
    }

    #[test]
    fn request_serializes_to_the_wire_shape() {
        let request = QuestionRequest {
            question: "해바라기".into(),
            category: "작가 소개,미술사".into(),
        };
        let body = serde_json::to_string(&request).unwrap();
        assert!(body.contains("\"question\""));
        assert!(body.contains("\"category\""));
    }
}
