// src/types.rs
//! Validated domain types for the Graph Ads reporting client.
//!
//! IDs, credentials, and reporting windows are newtypes that cannot be
//! constructed in an invalid state. Business logic downstream never needs
//! to re-check formats.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

use crate::constants::DEFAULT_DATE_PRESET;

/// Validation failures for domain type construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid access token: {reason}")]
    InvalidAccessToken { reason: String },

    #[error("Invalid {kind} ID '{input}': {reason}")]
    InvalidId {
        kind: &'static str,
        input: String,
        reason: String,
    },

    #[error("Invalid reporting window: {0}")]
    InvalidWindow(String),

    #[error("Unknown date preset '{0}'")]
    UnknownDatePreset(String),
}

// ---------------------------------------------------------------------------
// Access token
// ---------------------------------------------------------------------------

/// Opaque bearer credential for the Graph API.
///
/// The token is passed through to upstream verbatim; the only local rule is
/// that it exists and is not blank. Debug output never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token cannot be empty".to_string(),
            });
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(***)")
    }
}

// ---------------------------------------------------------------------------
// Entity IDs
// ---------------------------------------------------------------------------

/// Strong typing for entity IDs with phantom markers.
///
/// Graph object IDs are opaque numeric strings; the phantom parameter keeps
/// a campaign ID from being handed to an ad-set endpoint at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for the entity hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdSetMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdMarker;

pub type CampaignId = Id<CampaignMarker>;
pub type AdSetId = Id<AdSetMarker>;
pub type AdId = Id<AdMarker>;

impl<T> Id<T> {
    /// Parses an opaque numeric-string Graph object ID.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidId {
                kind: "object",
                input: input.to_string(),
                reason: "expected an opaque numeric string".to_string(),
            });
        }
        Ok(Self {
            value: trimmed.to_string(),
            _phantom: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self {
            value,
            _phantom: PhantomData,
        })
    }
}

/// Ad account ID in the canonical `act_<digits>` form.
///
/// Accepts either `act_1234567890` or bare digits and normalizes to the
/// prefixed form the Graph API expects in paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ACCOUNT_ID_REGEX: Regex =
                Regex::new(r"^(?:act_)?(\d+)$").expect("account ID regex is valid");
        }

        let trimmed = input.trim();
        match ACCOUNT_ID_REGEX.captures(trimmed) {
            Some(captures) => Ok(AccountId(format!("act_{}", &captures[1]))),
            None => Err(ValidationError::InvalidId {
                kind: "account",
                input: input.to_string(),
                reason: "expected act_<digits> or bare digits".to_string(),
            }),
        }
    }

    /// The `act_`-prefixed form used in Graph API paths.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Reporting window
// ---------------------------------------------------------------------------

/// Date presets the Graph insights edge accepts.
///
/// Modeled as an allow-list rather than a free string so a typo fails at
/// construction instead of as an opaque upstream 400.
pub const KNOWN_DATE_PRESETS: &[&str] = &[
    "today",
    "yesterday",
    "this_month",
    "last_month",
    "this_quarter",
    "last_quarter",
    "this_year",
    "last_year",
    "last_3d",
    "last_7d",
    "last_14d",
    "last_28d",
    "last_30d",
    "last_90d",
    "last_week_mon_sun",
    "last_week_sun_sat",
    "this_week_mon_today",
    "this_week_sun_today",
    "maximum",
    "lifetime",
];

/// The reporting time range: a named preset or an explicit since/until pair.
///
/// The two forms are mutually exclusive; `resolve` rejects callers that
/// supply both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TimeWindow {
    Preset(String),
    Range { since: NaiveDate, until: NaiveDate },
}

impl TimeWindow {
    /// Builds a window from optional caller inputs.
    ///
    /// Rules: preset and range are mutually exclusive; a range needs both
    /// ends in order; neither given falls back to the default preset.
    pub fn resolve(
        preset: Option<&str>,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        match (preset, since, until) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ValidationError::InvalidWindow(
                "date preset and since/until range are mutually exclusive".to_string(),
            )),
            (Some(name), None, None) => Self::preset(name),
            (None, Some(since), Some(until)) => {
                if since > until {
                    return Err(ValidationError::InvalidWindow(format!(
                        "since ({}) is after until ({})",
                        since, until
                    )));
                }
                Ok(TimeWindow::Range { since, until })
            }
            (None, Some(_), None) | (None, None, Some(_)) => Err(ValidationError::InvalidWindow(
                "a custom range needs both since and until".to_string(),
            )),
            (None, None, None) => Self::preset(DEFAULT_DATE_PRESET),
        }
    }

    /// Builds a preset window, validated against the allow-list.
    pub fn preset(name: &str) -> Result<Self, ValidationError> {
        if KNOWN_DATE_PRESETS.contains(&name) {
            Ok(TimeWindow::Preset(name.to_string()))
        } else {
            Err(ValidationError::UnknownDatePreset(name.to_string()))
        }
    }

    /// The query parameter this window contributes to an insights request.
    ///
    /// Presets go out as `date_preset`; ranges as the JSON-encoded
    /// `time_range` object the Graph API expects.
    pub fn to_query_param(&self) -> (&'static str, String) {
        match self {
            TimeWindow::Preset(name) => ("date_preset", name.clone()),
            TimeWindow::Range { since, until } => (
                "time_range",
                serde_json::json!({
                    "since": since.format("%Y-%m-%d").to_string(),
                    "until": until.format("%Y-%m-%d").to_string(),
                })
                .to_string(),
            ),
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::Preset(DEFAULT_DATE_PRESET.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn account_id_normalizes_bare_digits() {
        assert_eq!(AccountId::parse("1234567890").unwrap().as_str(), "act_1234567890");
        assert_eq!(AccountId::parse("act_42").unwrap().as_str(), "act_42");
    }

    #[test]
    fn account_id_rejects_garbage() {
        assert!(AccountId::parse("act_").is_err());
        assert!(AccountId::parse("campaign_99").is_err());
        assert!(AccountId::parse("").is_err());
    }

    #[test]
    fn object_id_requires_digits() {
        assert!(CampaignId::parse("23851234567890123").is_ok());
        assert!(AdId::parse("not-an-id").is_err());
    }

    #[test]
    fn window_rejects_preset_and_range_together() {
        let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let result = TimeWindow::resolve(Some("last_7d"), Some(since), Some(until));
        assert!(matches!(result, Err(ValidationError::InvalidWindow(_))));
    }

    #[test]
    fn window_rejects_inverted_range() {
        let since = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(TimeWindow::resolve(None, Some(since), Some(until)).is_err());
    }

    #[test]
    fn window_defaults_to_last_30d() {
        let window = TimeWindow::resolve(None, None, None).unwrap();
        assert_eq!(window, TimeWindow::Preset("last_30d".to_string()));
    }

    #[test]
    fn window_rejects_unknown_preset() {
        assert!(matches!(
            TimeWindow::resolve(Some("last_5_minutes"), None, None),
            Err(ValidationError::UnknownDatePreset(_))
        ));
    }

    #[test]
    fn range_serializes_as_graph_time_range() {
        let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = TimeWindow::resolve(None, Some(since), Some(until)).unwrap();
        let (key, value) = window.to_query_param();
        assert_eq!(key, "time_range");
        assert_eq!(value, r#"{"since":"2024-01-01","until":"2024-01-31"}"#);
    }

    #[test]
    fn token_rejects_blank() {
        assert!(AccessToken::new("   ").is_err());
        assert!(AccessToken::new("EAABtoken").is_ok());
    }
}
