// src/report/records.rs
//! Output records of the report assembler.
//!
//! One flat row per ad, carrying denormalized parent names and IDs plus
//! every requested metric. Derived ratios are recomputed from raw
//! counters and are `None` — never NaN, never infinity — when their
//! denominator is zero.

use crate::types::TimeWindow;
use serde::Serialize;

/// CTR as a percentage: clicks / impressions × 100.
pub fn ctr(clicks: u64, impressions: u64) -> Option<f64> {
    ratio(clicks as f64 * 100.0, impressions as f64)
}

/// Cost per click: spend / clicks.
pub fn cpc(spend: f64, clicks: u64) -> Option<f64> {
    ratio(spend, clicks as f64)
}

/// Cost per mille: spend / impressions × 1000.
pub fn cpm(spend: f64, impressions: u64) -> Option<f64> {
    ratio(spend * 1000.0, impressions as f64)
}

/// Zero-denominator-safe division.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// One fully denormalized row of the comprehensive report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlattenedAdRecord {
    // Identity and hierarchy
    pub ad_creative_id: Option<String>,
    pub ad_id: String,
    pub ad_name: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub ad_set_id: Option<String>,
    pub ad_set_name: Option<String>,
    pub ad_status: Option<String>,
    pub delivery: Option<String>,
    pub asset_url: Option<String>,

    // Reach and delivery
    pub reach: Option<u64>,
    pub impressions: Option<u64>,
    pub frequency: Option<f64>,

    // Conversions
    pub purchases: Option<f64>,
    pub cost_per_purchase: Option<f64>,

    // Clicks and ratios
    pub clicks_all: Option<u64>,
    pub unique_clicks_all: Option<u64>,
    pub ctr_all: Option<f64>,
    pub unique_ctr_all: Option<f64>,
    pub cpc_all: Option<f64>,
    pub cpm: Option<f64>,

    // Video funnel
    pub video_3_sec_plays: Option<f64>,
    pub video_plays_25_percent: Option<f64>,
    pub video_plays_50_percent: Option<f64>,
    pub video_plays_75_percent: Option<f64>,
    pub video_plays_100_percent: Option<f64>,
    pub video_plays: Option<f64>,
    pub thru_plays: Option<f64>,

    // Funnel conversions
    pub adds_to_cart: Option<f64>,
    pub content_views: Option<f64>,
    pub checkouts_initiated: Option<f64>,
    pub landing_page_views: Option<f64>,
    pub link_clicks: Option<f64>,
    pub outbound_clicks: Option<f64>,

    // Engagement
    pub post_reactions: Option<f64>,
    pub post_comments: Option<f64>,
    pub post_saves: Option<f64>,
    pub post_shares: Option<f64>,
    pub post_engagement: Option<f64>,
    pub page_likes: Option<f64>,

    pub amount_spent: f64,
}

/// The reduced summary projection: the fixed field subset that bounds
/// response size for quick overviews.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRecord {
    pub ad_id: String,
    pub ad_name: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub adset_id: Option<String>,
    pub adset_name: Option<String>,
    pub spend: f64,
    pub impressions: Option<u64>,
    pub clicks: Option<u64>,
    pub ctr: Option<f64>,
    pub cpc: Option<f64>,
    pub cpm: Option<f64>,
    pub conversions: Option<f64>,
    pub cpa: Option<f64>,
}

impl From<&FlattenedAdRecord> for SummaryRecord {
    fn from(record: &FlattenedAdRecord) -> Self {
        SummaryRecord {
            ad_id: record.ad_id.clone(),
            ad_name: record.ad_name.clone(),
            campaign_id: record.campaign_id.clone(),
            campaign_name: record.campaign_name.clone(),
            adset_id: record.ad_set_id.clone(),
            adset_name: record.ad_set_name.clone(),
            spend: record.amount_spent,
            impressions: record.impressions,
            clicks: record.clicks_all,
            ctr: record.ctr_all,
            cpc: record.cpc_all,
            cpm: record.cpm,
            conversions: record.purchases,
            cpa: record.cost_per_purchase,
        }
    }
}

/// Account-level totals: raw counters summed across surviving rows, ratio
/// metrics recomputed from the sums. Averaging per-row ratios would let a
/// small ad distort the aggregate (Simpson's paradox), so we never do it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReportTotals {
    pub total_ads: usize,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub purchases: f64,
    pub ctr: Option<f64>,
    pub cpc: Option<f64>,
    pub cpm: Option<f64>,
    pub cost_per_purchase: Option<f64>,
}

impl ReportTotals {
    /// Sums raw counters across rows, then derives ratios from the sums.
    pub fn from_records(records: &[FlattenedAdRecord]) -> Self {
        let spend: f64 = records.iter().map(|r| r.amount_spent).sum();
        let impressions: u64 = records.iter().filter_map(|r| r.impressions).sum();
        let clicks: u64 = records.iter().filter_map(|r| r.clicks_all).sum();
        let purchases: f64 = records.iter().filter_map(|r| r.purchases).sum();

        ReportTotals {
            total_ads: records.len(),
            spend,
            impressions,
            clicks,
            purchases,
            ctr: ctr(clicks, impressions),
            cpc: cpc(spend, clicks),
            cpm: cpm(spend, impressions),
            cost_per_purchase: ratio(spend, purchases),
        }
    }
}

/// Echo of the parameters a report was computed under.
#[derive(Debug, Clone, Serialize)]
pub struct ReportParameters {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub window: TimeWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_spend: Option<f64>,
}

/// The comprehensive report: ordered rows plus account-level totals.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub data: Vec<FlattenedAdRecord>,
    pub totals: ReportTotals,
    pub parameters: ReportParameters,
}

impl ReportResult {
    /// Projects the comprehensive rows onto the reduced summary subset.
    pub fn to_summary(&self) -> SummaryReport {
        SummaryReport {
            data: self.data.iter().map(SummaryRecord::from).collect(),
            totals: self.totals.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

/// The reduced summary report.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub data: Vec<SummaryRecord>,
    pub totals: ReportTotals,
    pub parameters: ReportParameters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ratios_are_none_on_zero_denominator() {
        assert_eq!(ctr(10, 0), None);
        assert_eq!(cpc(5.0, 0), None);
        assert_eq!(cpm(5.0, 0), None);
        assert_eq!(ratio(5.0, 0.0), None);
    }

    #[test]
    fn ratios_compute_on_nonzero_denominator() {
        assert_eq!(ctr(5, 1000), Some(0.5));
        assert_eq!(cpc(10.0, 4), Some(2.5));
        assert_eq!(cpm(5.0, 10_000), Some(0.5));
    }

    /// Totals ratios come from the sums. With unequal row sizes the naive
    /// average of per-row CTRs differs — the regression this test guards.
    #[test]
    fn totals_recompute_ratios_from_sums_not_averages() {
        let big = FlattenedAdRecord {
            ad_id: "1".to_string(),
            impressions: Some(100_000),
            clicks_all: Some(1_000), // 1% CTR
            amount_spent: 500.0,
            ..Default::default()
        };
        let small = FlattenedAdRecord {
            ad_id: "2".to_string(),
            impressions: Some(100),
            clicks_all: Some(10), // 10% CTR
            amount_spent: 5.0,
            ..Default::default()
        };

        let totals = ReportTotals::from_records(&[big, small]);
        let from_sums = totals.ctr.unwrap();
        let naive_average = (1.0 + 10.0) / 2.0;

        // 1010 clicks over 100100 impressions ≈ 1.009%, nowhere near 5.5%.
        assert!((from_sums - 1.009).abs() < 0.001);
        assert!((from_sums - naive_average).abs() > 4.0);
        assert_eq!(totals.impressions, 100_100);
        assert_eq!(totals.clicks, 1_010);
    }

    #[test]
    fn empty_report_totals_are_all_zero_and_none() {
        let totals = ReportTotals::from_records(&[]);
        assert_eq!(totals.total_ads, 0);
        assert_eq!(totals.spend, 0.0);
        assert_eq!(totals.ctr, None);
        assert_eq!(totals.cost_per_purchase, None);
    }

    #[test]
    fn summary_projection_carries_the_fixed_subset() {
        let record = FlattenedAdRecord {
            ad_id: "120001".to_string(),
            ad_name: Some("Spring Sale".to_string()),
            campaign_id: Some("23850001".to_string()),
            ad_set_id: Some("23860001".to_string()),
            amount_spent: 120.5,
            impressions: Some(40_000),
            clicks_all: Some(800),
            ctr_all: ctr(800, 40_000),
            cpc_all: cpc(120.5, 800),
            cpm: cpm(120.5, 40_000),
            purchases: Some(12.0),
            cost_per_purchase: ratio(120.5, 12.0),
            // Fields outside the projection must not leak through.
            video_plays: Some(999.0),
            post_reactions: Some(123.0),
            ..Default::default()
        };

        let summary = SummaryRecord::from(&record);
        assert_eq!(summary.spend, 120.5);
        assert_eq!(summary.conversions, Some(12.0));
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("video_plays").is_none());
        assert!(json.get("post_reactions").is_none());
        assert_eq!(json.as_object().unwrap().len(), 14);
    }
}
