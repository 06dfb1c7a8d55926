// src/report/assembler.rs
//! Report Assembler: joins ad metadata with insight metrics into flat,
//! analysis-ready rows.
//!
//! The two upstream branches — ad entities and ad-level insight rows —
//! are independent read-only fetches, so they fan out concurrently and
//! rejoin before assembly. Ads with no insight row in the window are
//! dropped: a report is activity analysis, not inventory enumeration.
//! Dropping the returned future abandons both in-flight branches; nothing
//! is cached, so partial results are never kept.

use crate::api::{AdsRepository, EdgeRequest, InsightsQuery};
use crate::catalog::{join_fields, REPORT_AD_FIELDS, REPORT_INSIGHT_FIELDS};
use crate::constants::{REPORT_DEFAULT_AD_LIMIT, SUMMARY_DEFAULT_AD_LIMIT};
use crate::error::AppError;
use crate::model::{EntityRecord, InsightRow};
use crate::report::conversions::{
    action_value, action_value_with_pixel_fallback, cost_per_purchase, resolve_purchases,
};
use crate::report::records::{
    cpc, cpm, ctr, FlattenedAdRecord, ReportParameters, ReportResult, ReportTotals, SummaryReport,
};
use crate::types::{AccountId, CampaignId, TimeWindow};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// What a comprehensive report is computed over and how it is shaped.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub account: AccountId,
    /// Narrow the scope to one campaign; `None` means account-wide.
    pub campaign: Option<CampaignId>,
    pub window: TimeWindow,
    /// Inclusive spend threshold; rows below it are dropped.
    pub min_spend: Option<f64>,
    /// Cap on ads pulled into the report.
    pub limit: Option<usize>,
    /// Explicit output ordering; `None` preserves upstream entity order.
    pub sort_by: Option<SortKey>,
}

impl ReportRequest {
    pub fn new(account: AccountId, window: TimeWindow) -> Self {
        Self {
            account,
            campaign: None,
            window,
            min_spend: None,
            limit: None,
            sort_by: None,
        }
    }
}

/// Metric a report can be explicitly sorted by, descending, with an
/// ascending ad-id tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Spend,
    Impressions,
    Clicks,
    Purchases,
}

impl SortKey {
    fn value_of(&self, record: &FlattenedAdRecord) -> f64 {
        match self {
            SortKey::Spend => record.amount_spent,
            SortKey::Impressions => record.impressions.unwrap_or(0) as f64,
            SortKey::Clicks => record.clicks_all.unwrap_or(0) as f64,
            SortKey::Purchases => record.purchases.unwrap_or(0.0),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spend" => Ok(SortKey::Spend),
            "impressions" => Ok(SortKey::Impressions),
            "clicks" => Ok(SortKey::Clicks),
            "purchases" => Ok(SortKey::Purchases),
            other => Err(format!(
                "unknown sort key '{}' (expected spend, impressions, clicks, or purchases)",
                other
            )),
        }
    }
}

/// Builds the comprehensive per-ad report for the requested scope.
pub async fn build_comprehensive<R>(
    repo: &R,
    request: &ReportRequest,
) -> Result<ReportResult, AppError>
where
    R: AdsRepository + ?Sized,
{
    let scope_id = request
        .campaign
        .as_ref()
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| request.account.as_str().to_string());
    let limit = Some(request.limit.unwrap_or(REPORT_DEFAULT_AD_LIMIT));

    log::info!(
        "Building comprehensive report for {} ({:?})",
        scope_id,
        request.window
    );

    let ads_request = EdgeRequest {
        parent: scope_id.clone(),
        edge: "ads".to_string(),
        fields: join_fields(REPORT_AD_FIELDS),
        limit,
        filtering: None,
    };
    let insights_query = InsightsQuery {
        fields: join_fields(REPORT_INSIGHT_FIELDS),
        window: request.window.clone(),
        level: Some("ad"),
        limit,
    };

    // Fan-out: both branches are read-only and share no state; the join
    // below waits for both.
    let (ads, insights) = tokio::try_join!(
        repo.fetch_edge(ads_request),
        repo.fetch_insights(&scope_id, insights_query),
    )?;

    let insights_by_ad: HashMap<&str, &InsightRow> = insights
        .iter()
        .filter_map(|row| row.ad_id.as_deref().map(|id| (id, row)))
        .collect();

    let mut records = Vec::with_capacity(ads.len());
    let mut seen_ads: HashSet<String> = HashSet::with_capacity(ads.len());
    for ad in &ads {
        let Some(ad_id) = ad.get("id").and_then(|v| v.as_str()) else {
            log::warn!("Skipping ad entity without an id field");
            continue;
        };
        if !seen_ads.insert(ad_id.to_string()) {
            continue;
        }
        // Zero activity in the window: no insight row, no report row.
        let Some(row) = insights_by_ad.get(ad_id) else {
            continue;
        };
        let record = flatten(ad_id, ad, row);
        if let Some(threshold) = request.min_spend {
            if record.amount_spent < threshold {
                continue;
            }
        }
        records.push(record);
    }

    if let Some(key) = request.sort_by {
        sort_records(&mut records, key);
    }

    let totals = ReportTotals::from_records(&records);
    log::info!(
        "Report assembled: {} ads, {:.2} total spend",
        totals.total_ads,
        totals.spend
    );

    Ok(ReportResult {
        data: records,
        totals,
        parameters: ReportParameters {
            account_id: request.account.as_str().to_string(),
            campaign_id: request.campaign.as_ref().map(|c| c.as_str().to_string()),
            window: request.window.clone(),
            min_spend: request.min_spend,
        },
    })
}

/// Builds the reduced summary report: the same pipeline, projected onto
/// the fixed lightweight subset, with a tighter default row cap.
pub async fn build_summary<R>(
    repo: &R,
    account: AccountId,
    window: TimeWindow,
    limit: Option<usize>,
) -> Result<SummaryReport, AppError>
where
    R: AdsRepository + ?Sized,
{
    let request = ReportRequest {
        limit: Some(limit.unwrap_or(SUMMARY_DEFAULT_AD_LIMIT)),
        ..ReportRequest::new(account, window)
    };
    let report = build_comprehensive(repo, &request).await?;
    Ok(report.to_summary())
}

fn sort_records(records: &mut [FlattenedAdRecord], key: SortKey) {
    records.sort_by(|a, b| {
        key.value_of(b)
            .partial_cmp(&key.value_of(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ad_id.cmp(&b.ad_id))
    });
}

/// Joins one ad entity with its insight row into a flat record.
///
/// Parent names come from the nested `campaign{...}`/`adset{...}` objects
/// when present, falling back to the flat id fields. Creative metadata is
/// a left-join: missing creative fields stay `None`.
fn flatten(ad_id: &str, ad: &EntityRecord, row: &InsightRow) -> FlattenedAdRecord {
    let spend = row.spend();
    let impressions = row.impressions();
    let clicks = row.clicks();
    let purchases = resolve_purchases(row.actions());
    let actions = row.actions();

    let video = |entries: &Option<Vec<crate::model::ActionEntry>>| {
        entries
            .as_deref()
            .and_then(|list| action_value(list, "video_view"))
    };

    FlattenedAdRecord {
        ad_creative_id: nested_str(ad, "creative", "id"),
        ad_id: ad_id.to_string(),
        ad_name: str_field(ad, "name").or_else(|| row.ad_name.clone()),
        campaign_id: nested_str(ad, "campaign", "id")
            .or_else(|| str_field(ad, "campaign_id"))
            .or_else(|| row.campaign_id.clone()),
        campaign_name: nested_str(ad, "campaign", "name").or_else(|| row.campaign_name.clone()),
        ad_set_id: nested_str(ad, "adset", "id")
            .or_else(|| str_field(ad, "adset_id"))
            .or_else(|| row.adset_id.clone()),
        ad_set_name: nested_str(ad, "adset", "name").or_else(|| row.adset_name.clone()),
        ad_status: str_field(ad, "status"),
        delivery: str_field(ad, "effective_status"),
        asset_url: extract_asset_url(ad.get("creative")),

        reach: row.reach,
        impressions: row.impressions,
        frequency: row.frequency,

        purchases,
        cost_per_purchase: cost_per_purchase(spend, purchases),

        clicks_all: row.clicks,
        unique_clicks_all: row.unique_clicks,
        ctr_all: ctr(clicks, impressions),
        unique_ctr_all: row.unique_ctr,
        cpc_all: cpc(spend, clicks),
        cpm: cpm(spend, impressions),

        video_3_sec_plays: video(&row.video_continuous_2_sec_watched_actions),
        video_plays_25_percent: video(&row.video_p25_watched_actions),
        video_plays_50_percent: video(&row.video_p50_watched_actions),
        video_plays_75_percent: video(&row.video_p75_watched_actions),
        video_plays_100_percent: video(&row.video_p100_watched_actions),
        video_plays: video(&row.video_play_actions),
        thru_plays: video(&row.video_thruplay_watched_actions),

        adds_to_cart: action_value_with_pixel_fallback(
            actions,
            "add_to_cart",
            "offsite_conversion.fb_pixel_add_to_cart",
        ),
        content_views: action_value_with_pixel_fallback(
            actions,
            "view_content",
            "offsite_conversion.fb_pixel_view_content",
        ),
        checkouts_initiated: action_value_with_pixel_fallback(
            actions,
            "initiate_checkout",
            "offsite_conversion.fb_pixel_initiate_checkout",
        ),
        landing_page_views: action_value(actions, "landing_page_view"),
        link_clicks: action_value(actions, "link_click"),
        outbound_clicks: action_value(actions, "outbound_click"),

        post_reactions: action_value(actions, "post_reaction"),
        post_comments: action_value(actions, "comment"),
        post_saves: action_value(actions, "post_save"),
        post_shares: action_value(actions, "post_share"),
        post_engagement: action_value(actions, "post_engagement"),
        page_likes: action_value(actions, "like"),

        amount_spent: spend,
    }
}

fn str_field(record: &EntityRecord, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(|v| v.as_str())
        .map(String::from)
}

fn nested_str(record: &EntityRecord, key: &str, inner: &str) -> Option<String> {
    record
        .get(key)?
        .get(inner)?
        .as_str()
        .map(String::from)
}

/// Pulls a displayable asset URL out of the creative object: thumbnail
/// first, then the raw image URL, then the video id from the story spec.
fn extract_asset_url(creative: Option<&serde_json::Value>) -> Option<String> {
    let creative = creative?;
    if let Some(url) = creative.get("thumbnail_url").and_then(|v| v.as_str()) {
        return Some(url.to_string());
    }
    if let Some(url) = creative.get("image_url").and_then(|v| v.as_str()) {
        return Some(url.to_string());
    }
    let video_id = creative
        .get("object_story_spec")?
        .get("video_data")?
        .get("video_id")?
        .as_str()?;
    Some(format!("Video ID: {}", video_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(ad_id: &str, spend: f64) -> FlattenedAdRecord {
        FlattenedAdRecord {
            ad_id: ad_id.to_string(),
            amount_spent: spend,
            ..Default::default()
        }
    }

    #[test]
    fn sort_is_descending_with_ad_id_tie_break() {
        let mut records = vec![record("3", 50.0), record("1", 100.0), record("2", 50.0)];
        sort_records(&mut records, SortKey::Spend);
        let ids: Vec<&str> = records.iter().map(|r| r.ad_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn sort_key_parses_from_cli_strings() {
        assert_eq!(SortKey::from_str("spend").unwrap(), SortKey::Spend);
        assert!(SortKey::from_str("ctr").is_err());
    }

    #[test]
    fn asset_url_prefers_thumbnail_then_image_then_video() {
        let creative = serde_json::json!({
            "thumbnail_url": "https://cdn.example/thumb.jpg",
            "image_url": "https://cdn.example/full.jpg"
        });
        assert_eq!(
            extract_asset_url(Some(&creative)),
            Some("https://cdn.example/thumb.jpg".to_string())
        );

        let video_only = serde_json::json!({
            "object_story_spec": {"video_data": {"video_id": "777001"}}
        });
        assert_eq!(
            extract_asset_url(Some(&video_only)),
            Some("Video ID: 777001".to_string())
        );

        assert_eq!(extract_asset_url(None), None);
        assert_eq!(extract_asset_url(Some(&serde_json::json!({}))), None);
    }
}
