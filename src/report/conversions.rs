// src/report/conversions.rs
//! Conversion Resolver: which action type actually means "purchase".
//!
//! Upstream reports conversions as (action-type, value) pairs, and which
//! type carries the purchase signal depends on the account's tracking
//! setup — a standard pixel purchase, an offsite pixel purchase, a
//! generic offsite conversion, or an onsite conversion. The resolver
//! walks a fixed priority list and takes the first alias with a nonzero
//! value. Resolution is per row: one account can mix setups across
//! campaigns, so no account-wide event type is ever assumed.

use crate::catalog::CONVERSION_ALIASES;
use crate::model::ActionEntry;
use crate::report::records::ratio;

/// Resolves the purchase count from a row's actions.
///
/// Alias matching is by containment (the Graph action-type namespace is
/// hierarchical, e.g. `offsite_conversion.fb_pixel_purchase`), gated on a
/// nonzero value so a zero-valued standard purchase entry cannot shadow a
/// real offsite conversion further down the priority list.
pub fn resolve_purchases(actions: &[ActionEntry]) -> Option<f64> {
    for alias in CONVERSION_ALIASES {
        let hit = actions
            .iter()
            .find(|entry| entry.action_type.contains(alias) && entry.value != 0.0);
        if let Some(entry) = hit {
            return Some(entry.value);
        }
    }
    None
}

/// Derives cost per purchase, failing safe to `None` when there are no
/// purchases rather than dividing by zero.
pub fn cost_per_purchase(spend: f64, purchases: Option<f64>) -> Option<f64> {
    ratio(spend, purchases.unwrap_or(0.0))
}

/// Looks up the first action whose type contains `action_type`, the
/// helper the assembler uses for the fixed funnel and engagement metrics.
pub fn action_value(actions: &[ActionEntry], action_type: &str) -> Option<f64> {
    actions
        .iter()
        .find(|entry| entry.action_type.contains(action_type))
        .map(|entry| entry.value)
}

/// Like `action_value` but falling back to the offsite-pixel namespace,
/// for funnel events that accounts report under either name.
pub fn action_value_with_pixel_fallback(
    actions: &[ActionEntry],
    action_type: &str,
    pixel_type: &str,
) -> Option<f64> {
    action_value(actions, action_type).or_else(|| action_value(actions, pixel_type))
}
