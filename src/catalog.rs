// src/catalog.rs
//! Field Catalog: the static vocabulary of requestable upstream fields.
//!
//! Dynamic field selection is modeled as an explicit allow-list with
//! documented defaults, not free-form reflection over the Graph schema.
//! The defaults match what the upstream API meaningfully returns at each
//! entity level; callers can narrow or widen within the catalog.

use indexmap::IndexMap;

/// Conversion-event aliases that can represent a "purchase", in priority
/// order: standard pixel purchase, offsite pixel purchase, generic offsite
/// conversion, onsite conversion. Which one an account actually reports
/// depends on its tracking setup, and may differ per campaign.
pub const CONVERSION_ALIASES: [&str; 4] = [
    "purchase",
    "offsite_conversion.fb_pixel_purchase",
    "offsite_conversion",
    "onsite_conversion",
];

// ---------------------------------------------------------------------------
// Default field sets per entity level
// ---------------------------------------------------------------------------

/// Account listing: enough to pick an account from a conversation.
pub const DEFAULT_ACCOUNT_LIST_FIELDS: &[&str] =
    &["name", "account_id", "account_status", "currency"];

/// Account detail lookup.
pub const DEFAULT_ACCOUNT_DETAIL_FIELDS: &[&str] = &[
    "name",
    "account_status",
    "amount_spent",
    "balance",
    "currency",
    "timezone_name",
];

/// Campaign listing and lookup.
pub const DEFAULT_CAMPAIGN_FIELDS: &[&str] = &[
    "name",
    "objective",
    "status",
    "effective_status",
    "daily_budget",
    "lifetime_budget",
];

/// Ad set listing and lookup.
pub const DEFAULT_ADSET_FIELDS: &[&str] = &[
    "name",
    "effective_status",
    "daily_budget",
    "lifetime_budget",
    "targeting",
];

/// Ad listing and lookup.
pub const DEFAULT_AD_FIELDS: &[&str] = &["name", "effective_status", "creative"];

/// Campaign-level insights.
pub const DEFAULT_CAMPAIGN_INSIGHT_FIELDS: &[&str] =
    &["impressions", "clicks", "spend", "cpc", "cpm", "ctr", "reach"];

/// Ad-set- and ad-level insights.
pub const DEFAULT_AD_INSIGHT_FIELDS: &[&str] = &["impressions", "clicks", "spend", "cpc", "ctr"];

// ---------------------------------------------------------------------------
// Comprehensive report field sets
// ---------------------------------------------------------------------------

/// Ad-entity fields the comprehensive report requests, including the parent
/// identifying fields and inline creative metadata. Creative is a left-join:
/// ads without creative metadata simply omit the nested object.
pub const REPORT_AD_FIELDS: &[&str] = &[
    "id",
    "name",
    "status",
    "effective_status",
    "campaign_id",
    "campaign{id,name}",
    "adset_id",
    "adset{id,name}",
    "creative{id,image_url,video_id,thumbnail_url,object_story_spec}",
];

/// Insight metrics the comprehensive report requests at `level=ad`.
pub const REPORT_INSIGHT_FIELDS: &[&str] = &[
    "ad_id",
    "ad_name",
    "campaign_id",
    "campaign_name",
    "adset_id",
    "adset_name",
    "reach",
    "impressions",
    "frequency",
    "spend",
    "clicks",
    "unique_clicks",
    "ctr",
    "unique_ctr",
    "cpc",
    "cpm",
    "video_play_actions",
    "video_thruplay_watched_actions",
    "video_p25_watched_actions",
    "video_p50_watched_actions",
    "video_p75_watched_actions",
    "video_p100_watched_actions",
    "video_continuous_2_sec_watched_actions",
    "actions",
    "action_values",
    "cost_per_action_type",
];

// ---------------------------------------------------------------------------
// Human-facing metric names
// ---------------------------------------------------------------------------

/// Mapping from the report's human-facing metric names to the upstream
/// field each is sourced from. Derived metrics (purchases, cost per
/// purchase, ratios) point at the raw fields they are computed from.
pub const METRIC_CATALOG: &[(&str, &str)] = &[
    ("amount_spent", "spend"),
    ("clicks_all", "clicks"),
    ("unique_clicks_all", "unique_clicks"),
    ("ctr_all", "ctr"),
    ("unique_ctr_all", "unique_ctr"),
    ("cpc_all", "cpc"),
    ("cpm", "cpm"),
    ("reach", "reach"),
    ("impressions", "impressions"),
    ("frequency", "frequency"),
    ("purchases", "actions"),
    ("cost_per_purchase", "cost_per_action_type"),
    ("video_plays", "video_play_actions"),
    ("thru_plays", "video_thruplay_watched_actions"),
    ("adds_to_cart", "actions"),
    ("content_views", "actions"),
    ("checkouts_initiated", "actions"),
    ("landing_page_views", "actions"),
    ("link_clicks", "actions"),
    ("outbound_clicks", "actions"),
    ("post_engagement", "actions"),
];

/// Resolves a human-facing metric name to its upstream source field.
pub fn upstream_field(metric: &str) -> Option<&'static str> {
    METRIC_CATALOG
        .iter()
        .find(|(name, _)| *name == metric)
        .map(|(_, field)| *field)
}

/// The catalog as an ordered metric → source-field mapping, the shape the
/// listing operation serializes.
pub fn metric_catalog() -> IndexMap<&'static str, &'static str> {
    METRIC_CATALOG.iter().copied().collect()
}

/// Joins a field slice into the comma-separated form Graph expects.
pub fn join_fields(fields: &[&str]) -> String {
    fields.join(",")
}

/// Resolves caller-supplied fields against a default set.
///
/// `None` or an empty list means the documented default; otherwise the
/// caller's list is passed through as given (upstream validates membership
/// and reports unknown fields verbatim).
pub fn fields_or_default(fields: Option<&[String]>, default: &[&str]) -> String {
    match fields {
        Some(list) if !list.is_empty() => list.join(","),
        _ => join_fields(default),
    }
}
