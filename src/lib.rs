// src/lib.rs
//! ads2report library — a typed reporting client for the Facebook Graph
//! Marketing API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `GraphErrorCode`, `ValidationError`
//! - **Configuration** — `AppConfig`, `CommandLineInput`
//! - **Domain types** — `AccountId`, `CampaignId`, `AdSetId`, `AdId`,
//!   `AccessToken`, `TimeWindow`
//! - **Upstream model** — `EntityRecord`, `InsightRow`, `ActionEntry`
//! - **API client** — `GraphHttpClient`, `AdsRepository`, pagination and
//!   retry machinery
//! - **Reports** — `AdsService`, `ReportResult`, `SummaryReport`

pub mod api;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod report;
pub mod service;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, GraphErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{AppConfig, CommandLineInput};

// --- Domain Types ---
pub use crate::types::{AccessToken, AccountId, AdId, AdSetId, CampaignId, TimeWindow};

// --- Upstream Model ---
pub use crate::model::{ActionEntry, EntityRecord, InsightRow};

// --- API Client ---
pub use crate::api::{
    AdsRepository, EdgeRequest, GraphHttpClient, InsightsQuery, PageResponse, RetryConfig,
};

// --- Reports ---
pub use crate::report::{
    FlattenedAdRecord, ReportRequest, ReportResult, ReportTotals, SortKey, SummaryRecord,
    SummaryReport,
};
pub use crate::service::{AdsParent, AdsService};
