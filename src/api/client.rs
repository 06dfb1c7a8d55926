// src/api/client.rs
//! HTTP client for the Graph API.
//!
//! A thin wrapper around reqwest that handles authentication and basic
//! request/response plumbing. Every call runs through the Rate/Error
//! Guard; parsing and classification live in `parser`.

use super::guard::{execute_with_retry, RetryConfig};
use super::pagination::{fetch_limited, PageResponse};
use super::{parser, AdsRepository, EdgeRequest, InsightsQuery};
use crate::constants::{GRAPH_API_VERSION, GRAPH_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::error::AppError;
use crate::model::{EntityRecord, InsightRow};
use crate::types::AccessToken;
use reqwest::{Client, Response};
use std::time::Duration;

/// Authenticated Graph API client.
#[derive(Clone)]
pub struct GraphHttpClient {
    client: Client,
    token: AccessToken,
    base_url: String,
    retry: RetryConfig,
}

impl GraphHttpClient {
    /// Creates a client pinned to the configured Graph API version.
    pub fn new(token: AccessToken) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            token,
            base_url: format!("{}/{}", GRAPH_BASE_URL, GRAPH_API_VERSION),
            retry: RetryConfig::default(),
        })
    }

    /// Overrides the retry policy (tighter budgets in tests, mostly).
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Query parameters every authenticated request starts from.
    fn auth_params(&self) -> Vec<(String, String)> {
        vec![("access_token".to_string(), self.token.as_str().to_string())]
    }

    /// Makes one GET request. No retry here — the guard wraps this.
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<ApiResponse<String>, AppError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).query(params).send().await?;
        extract_response_text(response).await
    }

    /// One guarded request, parsed into `T`.
    async fn get_parsed<T>(
        &self,
        url: String,
        params: Vec<(String, String)>,
    ) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let client = self.clone();
        execute_with_retry(
            || {
                let client = client.clone();
                let url = url.clone();
                let params = params.clone();
                async move {
                    let response = client.get(&url, &params).await?;
                    parser::parse_response(response)
                }
            },
            &self.retry,
        )
        .await
    }

    /// Walks a paginated edge into a flat item list, each page guarded.
    async fn get_paginated<T>(
        &self,
        url: String,
        base_params: Vec<(String, String)>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        let result = fetch_limited(
            |page_size, cursor| {
                let client = client.clone();
                let url = url.clone();
                let mut params = base_params.clone();
                params.push(("limit".to_string(), page_size.to_string()));
                if let Some(cursor) = cursor {
                    params.push(("after".to_string(), cursor));
                }
                async move { client.get_parsed::<PageResponse<T>>(url, params).await }
            },
            limit,
        )
        .await?;
        Ok(result.items)
    }
}

#[async_trait::async_trait]
impl AdsRepository for GraphHttpClient {
    async fn fetch_object(&self, id: &str, fields: &str) -> Result<EntityRecord, AppError> {
        let mut params = self.auth_params();
        params.push(("fields".to_string(), fields.to_string()));
        self.get_parsed(self.object_url(id), params).await
    }

    async fn fetch_edge(&self, request: EdgeRequest) -> Result<Vec<EntityRecord>, AppError> {
        let url = self.object_url(&format!("{}/{}", request.parent, request.edge));
        let mut params = self.auth_params();
        params.push(("fields".to_string(), request.fields));
        if let Some(filtering) = request.filtering {
            params.push(("filtering".to_string(), filtering));
        }
        self.get_paginated(url, params, request.limit).await
    }

    async fn fetch_insights(
        &self,
        object_id: &str,
        query: InsightsQuery,
    ) -> Result<Vec<InsightRow>, AppError> {
        let url = self.object_url(&format!("{}/insights", object_id));
        let mut params = self.auth_params();
        params.push(("fields".to_string(), query.fields));
        if let Some(level) = query.level {
            params.push(("level".to_string(), level.to_string()));
        }
        let (window_key, window_value) = query.window.to_query_param();
        params.push((window_key.to_string(), window_value));
        self.get_paginated(url, params, query.limit).await
    }

    async fn follow_url(&self, url: &str) -> Result<serde_json::Value, AppError> {
        // Pagination URLs come back from upstream with the token embedded;
        // we only check they are well-formed HTTPS before replaying them.
        let parsed = url::Url::parse(url)
            .map_err(|e| AppError::Pagination(format!("invalid pagination URL: {}", e)))?;
        if parsed.scheme() != "https" {
            return Err(AppError::Pagination(format!(
                "refusing non-HTTPS pagination URL: {}",
                parsed.scheme()
            )));
        }
        self.get_parsed(url.to_string(), Vec::new()).await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
