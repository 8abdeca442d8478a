//! The plan catalog.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::feature::{AnalyticsLevel, FeatureValue};
use crate::types::{CurrencyCode, MonthlyPrice};

/// Subscription tiers, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Basic,
    Growth,
    Pro,
}

impl PlanTier {
    /// All tiers, cheapest first.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Growth, Self::Pro];

    /// Look up a tier by identifier. Unknown identifiers return `None`.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == id)
    }

    /// The wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Growth => "growth",
            Self::Pro => "pro",
        }
    }

    /// The static definition for this tier.
    #[must_use]
    pub fn definition(self) -> PlanDefinition {
        match self {
            Self::Basic => PlanDefinition {
                tier: self,
                name: "Basic",
                price: MonthlyPrice::from_cents(4_900, CurrencyCode::Usd),
                limits: PlanLimits {
                    venues: Some(1),
                    staff: Some(3),
                    bookings_per_month: Some(200),
                    widgets: Some(1),
                },
                features: PlanFeatures {
                    custom_branding: false,
                    analytics: AnalyticsLevel::Basic,
                    api_access: false,
                    priority_support: false,
                    waivers: true,
                    qr_codes: false,
                    sms_notifications: false,
                },
            },
            Self::Growth => PlanDefinition {
                tier: self,
                name: "Growth",
                price: MonthlyPrice::from_cents(9_900, CurrencyCode::Usd),
                limits: PlanLimits {
                    venues: Some(3),
                    staff: Some(10),
                    bookings_per_month: Some(1_000),
                    widgets: Some(5),
                },
                features: PlanFeatures {
                    custom_branding: true,
                    analytics: AnalyticsLevel::Advanced,
                    api_access: false,
                    priority_support: false,
                    waivers: true,
                    qr_codes: true,
                    sms_notifications: false,
                },
            },
            Self::Pro => PlanDefinition {
                tier: self,
                name: "Pro",
                price: MonthlyPrice::from_cents(19_900, CurrencyCode::Usd),
                limits: PlanLimits {
                    venues: None,
                    staff: None,
                    bookings_per_month: None,
                    widgets: None,
                },
                features: PlanFeatures {
                    custom_branding: true,
                    analytics: AnalyticsLevel::Custom,
                    api_access: true,
                    priority_support: true,
                    waivers: true,
                    qr_codes: true,
                    sms_notifications: true,
                },
            },
        }
    }

    /// Whether one more `resource` may be created at the given usage.
    ///
    /// Allowed when the limit is unlimited or `usage < limit`.
    #[must_use]
    pub fn can_create(self, resource: Resource, usage: u32) -> bool {
        self.definition()
            .limits
            .get(resource)
            .is_none_or(|limit| usage < limit)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid plan: {s}"))
    }
}

/// Resources with a per-plan creation limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Venues,
    Staff,
    BookingsPerMonth,
    Widgets,
}

impl Resource {
    pub const ALL: [Self; 4] = [
        Self::Venues,
        Self::Staff,
        Self::BookingsPerMonth,
        Self::Widgets,
    ];

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Venues => "venues",
            Self::Staff => "staff",
            Self::BookingsPerMonth => "bookings_per_month",
            Self::Widgets => "widgets",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric limits. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub venues: Option<u32>,
    pub staff: Option<u32>,
    pub bookings_per_month: Option<u32>,
    pub widgets: Option<u32>,
}

impl PlanLimits {
    /// The limit for a resource.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> Option<u32> {
        match resource {
            Resource::Venues => self.venues,
            Resource::Staff => self.staff,
            Resource::BookingsPerMonth => self.bookings_per_month,
            Resource::Widgets => self.widgets,
        }
    }
}

/// Feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlanFeatures {
    pub custom_branding: bool,
    pub analytics: AnalyticsLevel,
    pub api_access: bool,
    pub priority_support: bool,
    pub waivers: bool,
    pub qr_codes: bool,
    pub sms_notifications: bool,
}

/// A plan's full table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDefinition {
    #[serde(rename = "id")]
    pub tier: PlanTier,
    pub name: &'static str,
    pub price: MonthlyPrice,
    pub limits: PlanLimits,
    pub features: PlanFeatures,
}

impl PlanDefinition {
    /// Look up a feature by name.
    ///
    /// Limit names (`venues`, `staff`, `bookings_per_month`, `widgets`)
    /// return [`FeatureValue::Limit`]. Unknown names return `None`.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        if let Some(resource) = Resource::parse(name) {
            return Some(FeatureValue::Limit(self.limits.get(resource)));
        }

        let f = &self.features;
        let value = match name {
            "custom_branding" => FeatureValue::Enabled(f.custom_branding),
            "analytics" => FeatureValue::Analytics(f.analytics),
            "api_access" => FeatureValue::Enabled(f.api_access),
            "priority_support" => FeatureValue::Enabled(f.priority_support),
            "waivers" => FeatureValue::Enabled(f.waivers),
            "qr_codes" => FeatureValue::Enabled(f.qr_codes),
            "sms_notifications" => FeatureValue::Enabled(f.sms_notifications),
            _ => return None,
        };
        Some(value)
    }
}

/// The cheapest plan on which a feature is enabled.
///
/// Used for upgrade hints. `None` if the feature is unknown or no plan
/// enables it.
#[must_use]
pub fn minimum_plan_for(feature: &str) -> Option<PlanTier> {
    PlanTier::ALL.into_iter().find(|tier| {
        tier.definition()
            .feature(feature)
            .is_some_and(FeatureValue::is_enabled)
    })
}
