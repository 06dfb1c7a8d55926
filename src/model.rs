// src/model.rs
//! Upstream response model: entity records and insight rows.
//!
//! Entities are caller-selectable field mappings, so they stay dynamic
//! (order-preserving maps). Insight rows are typed, because the report
//! layer computes with them. The Graph API reports most numeric metrics
//! as JSON strings, so the deserializers here accept either form.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A single entity (account, campaign, ad set, ad) as returned upstream:
/// whatever fields the caller requested, absent fields simply omitted,
/// upstream key order preserved.
pub type EntityRecord = IndexMap<String, serde_json::Value>;

/// One (action-type, value) pair from an insight row's `actions`,
/// `action_values`, `cost_per_action_type`, or video action arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action_type: String,
    #[serde(deserialize_with = "f64_from_string_or_number")]
    pub value: f64,
}

/// A metrics snapshot for one entity and one time window.
///
/// Produced fresh per request, joined to its ad during assembly, and
/// discarded afterwards; never persisted. Fields not in the typed set are
/// kept in `extra` so caller-selected metrics survive the round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adset_name: Option<String>,

    #[serde(default, deserialize_with = "opt_u64_from_string_or_number")]
    pub reach: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64_from_string_or_number")]
    pub impressions: Option<u64>,
    #[serde(default, deserialize_with = "opt_f64_from_string_or_number")]
    pub frequency: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64_from_string_or_number")]
    pub spend: Option<f64>,
    #[serde(default, deserialize_with = "opt_u64_from_string_or_number")]
    pub clicks: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64_from_string_or_number")]
    pub unique_clicks: Option<u64>,
    #[serde(default, deserialize_with = "opt_f64_from_string_or_number")]
    pub unique_ctr: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_values: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_action_type: Option<Vec<ActionEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_play_actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_thruplay_watched_actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_p25_watched_actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_p50_watched_actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_p75_watched_actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_p100_watched_actions: Option<Vec<ActionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_continuous_2_sec_watched_actions: Option<Vec<ActionEntry>>,

    /// Caller-selected fields outside the typed set (date_start, date_stop,
    /// upstream-computed ratios, breakdowns).
    #[serde(flatten)]
    pub extra: EntityRecord,
}

impl InsightRow {
    pub fn spend(&self) -> f64 {
        self.spend.unwrap_or(0.0)
    }

    pub fn impressions(&self) -> u64 {
        self.impressions.unwrap_or(0)
    }

    pub fn clicks(&self) -> u64 {
        self.clicks.unwrap_or(0)
    }

    /// The actions array, empty when upstream omitted it.
    pub fn actions(&self) -> &[ActionEntry] {
        self.actions.as_deref().unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// String-or-number deserializers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    fn as_f64<E: serde::de::Error>(&self) -> Result<f64, E> {
        match self {
            NumericField::Number(n) => Ok(*n),
            NumericField::Text(s) => s
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a numeric value, got '{}'", s))),
        }
    }
}

fn f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumericField::deserialize(deserializer)?.as_f64()
}

fn opt_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumericField>::deserialize(deserializer)? {
        Some(raw) => raw.as_f64().map(Some),
        None => Ok(None),
    }
}

fn opt_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumericField>::deserialize(deserializer)? {
        Some(raw) => raw.as_f64::<D::Error>().map(|v| Some(v as u64)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn metrics_deserialize_from_strings_and_numbers() {
        let json = r#"{
            "ad_id": "1200001",
            "spend": "123.45",
            "impressions": "10000",
            "clicks": 250,
            "frequency": 1.8
        }"#;
        let row: InsightRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.spend(), 123.45);
        assert_eq!(row.impressions(), 10_000);
        assert_eq!(row.clicks(), 250);
        assert_eq!(row.frequency, Some(1.8));
    }

    #[test]
    fn action_entries_parse_string_values() {
        let json = r#"[{"action_type": "purchase", "value": "7"}]"#;
        let actions: Vec<ActionEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(actions[0].value, 7.0);
    }

    #[test]
    fn unknown_fields_land_in_extra() {
        let json = r#"{"ad_id": "1", "date_start": "2024-01-01", "cpp": "4.2"}"#;
        let row: InsightRow = serde_json::from_str(json).unwrap();
        assert_eq!(
            row.extra.get("date_start"),
            Some(&serde_json::json!("2024-01-01"))
        );
    }

    #[test]
    fn missing_metrics_default_to_none() {
        let row: InsightRow = serde_json::from_str(r#"{"ad_id": "1"}"#).unwrap();
        assert_eq!(row.spend, None);
        assert_eq!(row.spend(), 0.0);
        assert!(row.actions().is_empty());
    }

    #[test]
    fn garbage_numeric_string_is_an_error() {
        let result = serde_json::from_str::<InsightRow>(r#"{"spend": "a lot"}"#);
        assert!(result.is_err());
    }
}
