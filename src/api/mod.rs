// src/api/mod.rs
//! Graph API interaction — fetching ad entities and insight rows.
//!
//! Clear separation between I/O, parsing, and retry policy. Business
//! logic (the report assembler, the tool surface) depends on the
//! `AdsRepository` trait, never on HTTP details.

pub mod client;
pub mod guard;
pub mod pagination;
pub mod parser;

use crate::error::AppError;
use crate::model::{EntityRecord, InsightRow};
use crate::types::TimeWindow;

/// A request against one edge of the entity tree
/// (`act_<id>/campaigns`, `<campaign_id>/adsets`, `<adset_id>/ads`, ...).
#[derive(Debug, Clone)]
pub struct EdgeRequest {
    /// Parent object ID the edge hangs off.
    pub parent: String,
    /// Edge name (`campaigns`, `adsets`, `ads`, `adaccounts`).
    pub edge: String,
    /// Comma-separated field list.
    pub fields: String,
    /// Cumulative item limit across pages.
    pub limit: Option<usize>,
    /// JSON-encoded Graph `filtering` expression.
    pub filtering: Option<String>,
}

/// A request against an object's `insights` edge.
#[derive(Debug, Clone)]
pub struct InsightsQuery {
    /// Comma-separated metric list.
    pub fields: String,
    /// Reporting window (preset or explicit range).
    pub window: TimeWindow,
    /// Breakdown level (`ad` for per-ad rows on an account or campaign).
    pub level: Option<&'static str>,
    /// Cumulative row limit across pages.
    pub limit: Option<usize>,
}

/// The ability to read from an ads account tree.
///
/// Everything is a read-only snapshot: no mutation operations, no
/// cross-call cache — each invocation re-fetches from the source of truth.
#[async_trait::async_trait]
pub trait AdsRepository: Send + Sync {
    /// Fetches a single object with the given fields.
    async fn fetch_object(&self, id: &str, fields: &str) -> Result<EntityRecord, AppError>;

    /// Walks a paginated edge, honoring the request's item limit.
    async fn fetch_edge(&self, request: EdgeRequest) -> Result<Vec<EntityRecord>, AppError>;

    /// Fetches insight rows for an object over a reporting window.
    async fn fetch_insights(
        &self,
        object_id: &str,
        query: InsightsQuery,
    ) -> Result<Vec<InsightRow>, AppError>;

    /// Follows a raw pagination URL from a previous response verbatim.
    async fn follow_url(&self, url: &str) -> Result<serde_json::Value, AppError>;
}

// Re-export the public interface
pub use client::{extract_response_text, ApiResponse, GraphHttpClient};
pub use guard::{execute_with_retry, RetryConfig};
pub use pagination::{fetch_limited, PageResponse, PaginationResult};
