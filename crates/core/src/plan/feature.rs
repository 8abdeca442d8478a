//! Feature values as reported to callers.

use serde::{Deserialize, Serialize};

/// Analytics depth available on a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsLevel {
    /// Booking counts and revenue totals.
    Basic,
    /// Trends, conversion and per-game breakdowns.
    Advanced,
    /// Advanced plus custom report builder.
    Custom,
}

/// The value of a single plan feature.
///
/// Serialized untagged, so clients see `true`, `"advanced"`, `5` or `null`
/// (unlimited).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// On/off feature.
    Enabled(bool),
    /// Tiered feature.
    Analytics(AnalyticsLevel),
    /// Numeric limit; `None` is unlimited.
    Limit(Option<u32>),
}

impl FeatureValue {
    /// Whether the feature is usable at all.
    ///
    /// A limit of zero counts as disabled; any tier counts as enabled.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::Enabled(enabled) => enabled,
            Self::Analytics(_) | Self::Limit(None) => true,
            Self::Limit(Some(limit)) => limit > 0,
        }
    }
}

/// Names accepted by [`super::PlanDefinition::feature`].
pub const FEATURE_NAMES: &[&str] = &[
    "venues",
    "staff",
    "bookings_per_month",
    "widgets",
    "custom_branding",
    "analytics",
    "api_access",
    "priority_support",
    "waivers",
    "qr_codes",
    "sms_notifications",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled() {
        assert!(FeatureValue::Enabled(true).is_enabled());
        assert!(!FeatureValue::Enabled(false).is_enabled());
        assert!(FeatureValue::Analytics(AnalyticsLevel::Basic).is_enabled());
        assert!(FeatureValue::Limit(None).is_enabled());
        assert!(FeatureValue::Limit(Some(3)).is_enabled());
        assert!(!FeatureValue::Limit(Some(0)).is_enabled());
    }

    #[test]
    fn test_untagged_serialization() {
        let render = |v: FeatureValue| serde_json::to_string(&v).ok();
        assert_eq!(render(FeatureValue::Enabled(true)).as_deref(), Some("true"));
        assert_eq!(
            render(FeatureValue::Analytics(AnalyticsLevel::Advanced)).as_deref(),
            Some("\"advanced\"")
        );
        assert_eq!(render(FeatureValue::Limit(Some(5))).as_deref(), Some("5"));
        assert_eq!(render(FeatureValue::Limit(None)).as_deref(), Some("null"));
    }
}
