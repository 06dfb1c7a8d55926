// src/api/parser.rs
//! Response parsing and failure classification.
//!
//! The success path deserializes the body into whatever the caller asked
//! for. The failure path extracts the Graph error payload
//! `{error: {message, type, code}}` and maps its numeric code into the
//! typed vocabulary — keeping the upstream message verbatim, since the
//! operator acts on that literal diagnostic.

use super::client::ApiResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, GraphErrorCode};
use serde::Deserialize;

/// The error payload the Graph API wraps every failure in.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorPayload {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error_subcode: Option<i64>,
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorPayload,
}

/// Parses a Graph response into `T`, classifying failures on the way.
pub fn parse_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error_body(&result.data, result.status, &result.url))
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!(
            "{} (body preview: {})",
            e,
            preview(body)
        ))
    })
}

/// Classifies a non-2xx response.
///
/// A parseable Graph error body becomes `GraphService` with the typed
/// code and the upstream message attached verbatim; anything else falls
/// back to the HTTP status with a bounded body snippet.
pub fn parse_error_body(
    body: &str,
    status: reqwest::StatusCode,
    url: &str,
) -> AppError {
    if let Ok(parsed) = serde_json::from_str::<GraphErrorBody>(body) {
        let payload = parsed.error;
        let code = match payload.code {
            Some(code) => GraphErrorCode::from_api_response(code),
            None => GraphErrorCode::from_http_status(status.as_u16()),
        };
        log::debug!(
            "Graph API error from {}: code={} subcode={:?} trace={:?}",
            url,
            code,
            payload.error_subcode,
            payload.fbtrace_id
        );
        return AppError::GraphService {
            code,
            message: payload.message,
            status,
        };
    }

    AppError::GraphService {
        code: GraphErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    }
}

/// Bounded, char-boundary-safe body snippet for diagnostics.
fn preview(body: &str) -> &str {
    if body.len() <= ERROR_BODY_PREVIEW_LENGTH {
        return body;
    }
    let mut end = ERROR_BODY_PREVIEW_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
