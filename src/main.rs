// src/main.rs

use ads2report::api::GraphHttpClient;
use ads2report::catalog;
use ads2report::config::{
    AppConfig, Command, CommandLineInput, InsightLevel, ParentKind,
};
use ads2report::error::AppError;
use ads2report::report::ReportRequest;
use ads2report::service::{AdsParent, AdsService};
use ads2report::types::{AccountId, AdId, AdSetId, CampaignId};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde::Serialize;
use std::fs;

/// Sets up logging configuration.
///
/// Diagnostics go to stderr so the JSON payload on stdout stays pipeable;
/// the file appender keeps a debug-level trail either way.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("ads2report.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Serializes a result to pretty JSON on stdout.
fn emit<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Dispatches one command against the service and prints the result.
async fn execute(
    service: &AdsService<GraphHttpClient>,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::Accounts { fields } => {
            emit(&service.list_ad_accounts(fields.fields.as_deref()).await?)
        }
        Command::Account { account_id, fields } => {
            let account = AccountId::parse(&account_id)?;
            emit(
                &service
                    .account_details(&account, fields.fields.as_deref())
                    .await?,
            )
        }
        Command::Campaigns {
            account_id,
            fields,
            limit,
            statuses,
        } => {
            let account = AccountId::parse(&account_id)?;
            emit(
                &service
                    .campaigns(&account, fields.fields.as_deref(), limit, statuses.as_deref())
                    .await?,
            )
        }
        Command::Campaign { campaign_id, fields } => {
            let id = CampaignId::parse(&campaign_id)?;
            emit(&service.campaign(&id, fields.fields.as_deref()).await?)
        }
        Command::Adsets {
            campaign_id,
            fields,
            limit,
        } => {
            let id = CampaignId::parse(&campaign_id)?;
            emit(
                &service
                    .ad_sets(&id, fields.fields.as_deref(), limit)
                    .await?,
            )
        }
        Command::Adset { adset_id, fields } => {
            let id = AdSetId::parse(&adset_id)?;
            emit(&service.ad_set(&id, fields.fields.as_deref()).await?)
        }
        Command::Ads {
            parent_id,
            under,
            fields,
            limit,
        } => {
            let parent = match under {
                ParentKind::Account => AdsParent::Account(AccountId::parse(&parent_id)?),
                ParentKind::Campaign => AdsParent::Campaign(CampaignId::parse(&parent_id)?),
                ParentKind::Adset => AdsParent::AdSet(AdSetId::parse(&parent_id)?),
            };
            emit(
                &service
                    .ads(&parent, fields.fields.as_deref(), limit)
                    .await?,
            )
        }
        Command::Ad { ad_id, fields } => {
            let id = AdId::parse(&ad_id)?;
            emit(&service.ad(&id, fields.fields.as_deref()).await?)
        }
        Command::Insights {
            level,
            object_id,
            fields,
            window,
        } => {
            let window = window.resolve()?;
            let fields = fields.fields.as_deref();
            let rows = match level {
                InsightLevel::Campaign => {
                    let id = CampaignId::parse(&object_id)?;
                    service.campaign_insights(&id, fields, window).await?
                }
                InsightLevel::Adset => {
                    let id = AdSetId::parse(&object_id)?;
                    service.ad_set_insights(&id, fields, window).await?
                }
                InsightLevel::Ad => {
                    let id = AdId::parse(&object_id)?;
                    service.ad_insights(&id, fields, window).await?
                }
            };
            emit(&rows)
        }
        Command::Report {
            account_id,
            campaign,
            window,
            min_spend,
            limit,
            sort_by,
        } => {
            let request = ReportRequest {
                account: AccountId::parse(&account_id)?,
                campaign: campaign.map(|c| CampaignId::parse(&c)).transpose()?,
                window: window.resolve()?,
                min_spend,
                limit,
                sort_by,
            };
            emit(&service.comprehensive_report(&request).await?)
        }
        Command::Summary {
            account_id,
            window,
            limit,
        } => {
            let account = AccountId::parse(&account_id)?;
            emit(
                &service
                    .summary_report(account, window.resolve()?, limit)
                    .await?,
            )
        }
        Command::Follow { url } => emit(&service.follow_pagination_url(&url).await?),
        Command::Metrics => emit(&catalog::metric_catalog()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    // The catalog listing is static; it needs no credential or client.
    if matches!(cli.command, Command::Metrics) {
        emit(&catalog::metric_catalog())?;
        return Ok(());
    }

    let config = AppConfig::resolve(cli.access_token.clone())?;
    let client = GraphHttpClient::new(config.access_token)?;
    let service = AdsService::new(client);

    execute(&service, cli.command).await?;

    Ok(())
}
