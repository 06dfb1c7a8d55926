// src/config.rs
use crate::error::AppError;
use crate::report::SortKey;
use crate::types::{AccessToken, TimeWindow, ValidationError};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Graph API access token (falls back to the FB_ACCESS_TOKEN env var)
    #[arg(long, global = true)]
    pub access_token: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Comma-separated field override shared by the listing commands.
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Fields to request, comma separated (defaults per entity)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

/// Reporting window selection: a named preset or an explicit range.
#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Named date preset (e.g. last_7d, last_30d, this_month)
    #[arg(long)]
    pub date_preset: Option<String>,

    /// Range start (YYYY-MM-DD); requires --until
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD); requires --since
    #[arg(long)]
    pub until: Option<NaiveDate>,
}

impl WindowArgs {
    pub fn resolve(&self) -> Result<TimeWindow, ValidationError> {
        TimeWindow::resolve(self.date_preset.as_deref(), self.since, self.until)
    }
}

/// Which entity an ads listing is scoped under.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ParentKind {
    Account,
    Campaign,
    Adset,
}

/// Which entity level an insights query targets.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum InsightLevel {
    Campaign,
    Adset,
    Ad,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the ad accounts linked to the access token
    Accounts {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Show details for one ad account
    Account {
        /// Ad account ID (act_<digits> or bare digits)
        account_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List campaigns in an account
    Campaigns {
        account_id: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Maximum number of campaigns to return
        #[arg(long)]
        limit: Option<usize>,
        /// Filter by effective status, comma separated (e.g. ACTIVE,PAUSED)
        #[arg(long = "status", value_delimiter = ',')]
        statuses: Option<Vec<String>>,
    },

    /// Show details for one campaign
    Campaign {
        campaign_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List ad sets within a campaign
    Adsets {
        campaign_id: String,
        #[command(flatten)]
        fields: FieldArgs,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show details for one ad set
    Adset {
        adset_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List ads under an account, campaign, or ad set
    Ads {
        parent_id: String,
        /// What kind of entity the parent ID names
        #[arg(long, value_enum, default_value_t = ParentKind::Account)]
        under: ParentKind,
        #[command(flatten)]
        fields: FieldArgs,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show details for one ad
    Ad {
        ad_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Performance insights for a campaign, ad set, or ad
    Insights {
        /// Entity level the ID refers to
        #[arg(value_enum)]
        level: InsightLevel,
        object_id: String,
        #[command(flatten)]
        fields: FieldArgs,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Comprehensive per-ad report for an account
    Report {
        account_id: String,
        /// Restrict the report to one campaign
        #[arg(long)]
        campaign: Option<String>,
        #[command(flatten)]
        window: WindowArgs,
        /// Drop ads whose spend is below this threshold (inclusive keep)
        #[arg(long)]
        min_spend: Option<f64>,
        /// Maximum number of ads to include
        #[arg(long)]
        limit: Option<usize>,
        /// Sort rows descending by this metric (spend, impressions, clicks, purchases)
        #[arg(long)]
        sort_by: Option<SortKey>,
    },

    /// Reduced summary report for an account
    Summary {
        account_id: String,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Follow a paging.next/paging.previous URL from an earlier response
    Follow {
        /// The verbatim pagination URL
        url: String,
    },

    /// List the report metrics and the upstream fields they come from
    Metrics,
}

/// Resolved application configuration: the validated credential.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub access_token: AccessToken,
}

impl AppConfig {
    /// Resolves the credential from the environment first, then the flag.
    ///
    /// A blank FB_ACCESS_TOKEN is treated as unset so an empty export does
    /// not mask a valid --access-token.
    pub fn resolve(flag: Option<String>) -> Result<Self, AppError> {
        let raw = std::env::var("FB_ACCESS_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or(flag)
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "set FB_ACCESS_TOKEN or pass --access-token".to_string(),
                )
            })?;

        Ok(AppConfig {
            access_token: AccessToken::new(raw)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// One test owns FB_ACCESS_TOKEN end to end; unit tests share a
    /// process, so splitting these cases would race on the variable.
    #[test]
    fn credential_resolution_prefers_env_then_flag() {
        std::env::remove_var("FB_ACCESS_TOKEN");
        let config = AppConfig::resolve(Some("flag_token".to_string())).unwrap();
        assert_eq!(config.access_token.as_str(), "flag_token");

        std::env::set_var("FB_ACCESS_TOKEN", "env_token");
        let config = AppConfig::resolve(Some("flag_token".to_string())).unwrap();
        assert_eq!(config.access_token.as_str(), "env_token");

        // A blank export must not mask the flag.
        std::env::set_var("FB_ACCESS_TOKEN", "   ");
        let config = AppConfig::resolve(Some("flag_token".to_string())).unwrap();
        assert_eq!(config.access_token.as_str(), "flag_token");

        std::env::remove_var("FB_ACCESS_TOKEN");
        assert!(matches!(
            AppConfig::resolve(None),
            Err(AppError::MissingConfiguration(_))
        ));
    }
}
