// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these should tell you how the client talks to the Graph API: which
//! version, how big a page, how patient the retry policy is.

// ---------------------------------------------------------------------------
// Graph API boundaries
// ---------------------------------------------------------------------------

/// Graph API version every request is pinned to.
///
/// Unversioned calls float with Meta's deprecation schedule; pinning keeps
/// the field catalog and error-code mapping stable.
pub const GRAPH_API_VERSION: &str = "v22.0";

/// Base URL for all Graph API requests.
pub const GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// How many objects we request per page of results.
///
/// The Graph API default is 25; listing and insight edges accept up to 100.
/// We ask for the larger page to minimize round-trips when walking an account.
pub const GRAPH_API_PAGE_SIZE: usize = 100;

/// Wall-clock timeout for a single upstream request, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Maximum attempts per upstream call, including the first.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry, in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;

/// Ceiling on the exponential backoff delay, in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 8_000;

// ---------------------------------------------------------------------------
// Report defaults
// ---------------------------------------------------------------------------

/// Default cap on ads pulled into a comprehensive report.
pub const REPORT_DEFAULT_AD_LIMIT: usize = 100;

/// Default cap on rows in the reduced summary report.
pub const SUMMARY_DEFAULT_AD_LIMIT: usize = 50;

/// Default listing limit when the caller gives none.
pub const LISTING_DEFAULT_LIMIT: usize = 25;

/// Reporting window used when the caller names neither a preset nor a range.
pub const DEFAULT_DATE_PRESET: &str = "last_30d";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable error bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
