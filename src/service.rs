// src/service.rs
//! The tool-call surface: one method per reporting operation.
//!
//! Thin orchestration over the repository — defaults from the field
//! catalog, scope/window validation already done by the domain types.
//! The protocol transport (or the CLI standing in for it) serializes
//! whatever comes back; failures carry the upstream diagnostic through
//! `AppError` untouched.

use crate::api::{AdsRepository, EdgeRequest, InsightsQuery};
use crate::catalog::{
    fields_or_default, DEFAULT_ACCOUNT_DETAIL_FIELDS, DEFAULT_ACCOUNT_LIST_FIELDS,
    DEFAULT_ADSET_FIELDS, DEFAULT_AD_FIELDS, DEFAULT_AD_INSIGHT_FIELDS,
    DEFAULT_CAMPAIGN_FIELDS, DEFAULT_CAMPAIGN_INSIGHT_FIELDS,
};
use crate::constants::LISTING_DEFAULT_LIMIT;
use crate::error::AppError;
use crate::model::{EntityRecord, InsightRow};
use crate::report::{self, ReportRequest, ReportResult, SummaryReport};
use crate::types::{AccountId, AdId, AdSetId, CampaignId, TimeWindow};

/// Which entity an ads listing hangs off.
#[derive(Debug, Clone)]
pub enum AdsParent {
    Account(AccountId),
    Campaign(CampaignId),
    AdSet(AdSetId),
}

impl AdsParent {
    fn id(&self) -> &str {
        match self {
            AdsParent::Account(id) => id.as_str(),
            AdsParent::Campaign(id) => id.as_str(),
            AdsParent::AdSet(id) => id.as_str(),
        }
    }
}

/// The read-only reporting operations exposed to callers.
pub struct AdsService<R> {
    repo: R,
}

impl<R: AdsRepository> AdsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all ad accounts linked to the credential.
    pub async fn list_ad_accounts(
        &self,
        fields: Option<&[String]>,
    ) -> Result<Vec<EntityRecord>, AppError> {
        self.repo
            .fetch_edge(EdgeRequest {
                parent: "me".to_string(),
                edge: "adaccounts".to_string(),
                fields: fields_or_default(fields, DEFAULT_ACCOUNT_LIST_FIELDS),
                limit: None,
                filtering: None,
            })
            .await
    }

    /// Detailed snapshot of one ad account.
    pub async fn account_details(
        &self,
        account: &AccountId,
        fields: Option<&[String]>,
    ) -> Result<EntityRecord, AppError> {
        self.repo
            .fetch_object(
                account.as_str(),
                &fields_or_default(fields, DEFAULT_ACCOUNT_DETAIL_FIELDS),
            )
            .await
    }

    /// Campaigns under an account, optionally filtered by effective status.
    pub async fn campaigns(
        &self,
        account: &AccountId,
        fields: Option<&[String]>,
        limit: Option<usize>,
        status_filter: Option<&[String]>,
    ) -> Result<Vec<EntityRecord>, AppError> {
        let filtering = status_filter.map(|statuses| {
            serde_json::json!([{
                "field": "effective_status",
                "operator": "IN",
                "value": statuses,
            }])
            .to_string()
        });
        self.repo
            .fetch_edge(EdgeRequest {
                parent: account.as_str().to_string(),
                edge: "campaigns".to_string(),
                fields: fields_or_default(fields, DEFAULT_CAMPAIGN_FIELDS),
                limit: Some(limit.unwrap_or(LISTING_DEFAULT_LIMIT)),
                filtering,
            })
            .await
    }

    pub async fn campaign(
        &self,
        id: &CampaignId,
        fields: Option<&[String]>,
    ) -> Result<EntityRecord, AppError> {
        self.repo
            .fetch_object(id.as_str(), &fields_or_default(fields, DEFAULT_CAMPAIGN_FIELDS))
            .await
    }

    /// Ad sets within a campaign.
    pub async fn ad_sets(
        &self,
        campaign: &CampaignId,
        fields: Option<&[String]>,
        limit: Option<usize>,
    ) -> Result<Vec<EntityRecord>, AppError> {
        self.repo
            .fetch_edge(EdgeRequest {
                parent: campaign.as_str().to_string(),
                edge: "adsets".to_string(),
                fields: fields_or_default(fields, DEFAULT_ADSET_FIELDS),
                limit: Some(limit.unwrap_or(LISTING_DEFAULT_LIMIT)),
                filtering: None,
            })
            .await
    }

    pub async fn ad_set(
        &self,
        id: &AdSetId,
        fields: Option<&[String]>,
    ) -> Result<EntityRecord, AppError> {
        self.repo
            .fetch_object(id.as_str(), &fields_or_default(fields, DEFAULT_ADSET_FIELDS))
            .await
    }

    /// Ads under an account, campaign, or ad set.
    pub async fn ads(
        &self,
        parent: &AdsParent,
        fields: Option<&[String]>,
        limit: Option<usize>,
    ) -> Result<Vec<EntityRecord>, AppError> {
        self.repo
            .fetch_edge(EdgeRequest {
                parent: parent.id().to_string(),
                edge: "ads".to_string(),
                fields: fields_or_default(fields, DEFAULT_AD_FIELDS),
                limit: Some(limit.unwrap_or(LISTING_DEFAULT_LIMIT)),
                filtering: None,
            })
            .await
    }

    pub async fn ad(
        &self,
        id: &AdId,
        fields: Option<&[String]>,
    ) -> Result<EntityRecord, AppError> {
        self.repo
            .fetch_object(id.as_str(), &fields_or_default(fields, DEFAULT_AD_FIELDS))
            .await
    }

    /// Performance insights for one campaign over a window.
    pub async fn campaign_insights(
        &self,
        id: &CampaignId,
        fields: Option<&[String]>,
        window: TimeWindow,
    ) -> Result<Vec<InsightRow>, AppError> {
        self.insights(id.as_str(), fields, DEFAULT_CAMPAIGN_INSIGHT_FIELDS, window)
            .await
    }

    /// Performance insights for one ad set over a window.
    pub async fn ad_set_insights(
        &self,
        id: &AdSetId,
        fields: Option<&[String]>,
        window: TimeWindow,
    ) -> Result<Vec<InsightRow>, AppError> {
        self.insights(id.as_str(), fields, DEFAULT_AD_INSIGHT_FIELDS, window)
            .await
    }

    /// Performance insights for one ad over a window.
    pub async fn ad_insights(
        &self,
        id: &AdId,
        fields: Option<&[String]>,
        window: TimeWindow,
    ) -> Result<Vec<InsightRow>, AppError> {
        self.insights(id.as_str(), fields, DEFAULT_AD_INSIGHT_FIELDS, window)
            .await
    }

    async fn insights(
        &self,
        object_id: &str,
        fields: Option<&[String]>,
        default_fields: &[&str],
        window: TimeWindow,
    ) -> Result<Vec<InsightRow>, AppError> {
        self.repo
            .fetch_insights(
                object_id,
                InsightsQuery {
                    fields: fields_or_default(fields, default_fields),
                    window,
                    level: None,
                    limit: None,
                },
            )
            .await
    }

    /// The comprehensive multi-ad report (full metric set per ad).
    pub async fn comprehensive_report(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportResult, AppError> {
        report::build_comprehensive(&self.repo, request).await
    }

    /// The reduced summary report (fixed lightweight subset per ad).
    pub async fn summary_report(
        &self,
        account: AccountId,
        window: TimeWindow,
        limit: Option<usize>,
    ) -> Result<SummaryReport, AppError> {
        report::build_summary(&self.repo, account, window, limit).await
    }

    /// Follows a raw `paging.next`/`paging.previous` URL from an earlier
    /// response and passes the page through.
    pub async fn follow_pagination_url(&self, url: &str) -> Result<serde_json::Value, AppError> {
        self.repo.follow_url(url).await
    }
}
