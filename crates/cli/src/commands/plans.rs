//! Plan catalog inspection.
//!
//! ```bash
//! vd-cli plans show growth
//! vd-cli plans can-create basic venues 1
//! ```

use thiserror::Error;
use venuedesk_core::plan::CreateDecision;
use venuedesk_core::{PlanGate, PlanTier, Resource};

#[derive(Debug, Error)]
pub enum PlansError {
    #[error("Unknown plan: {0} (expected basic, growth or pro)")]
    UnknownPlan(String),

    #[error("Unknown resource: {0} (expected venues, staff, bookings_per_month or widgets)")]
    UnknownResource(String),

    #[error("Failed to render plan: {0}")]
    Render(#[from] serde_json::Error),
}

fn parse_tier(plan: &str) -> Result<PlanTier, PlansError> {
    PlanTier::parse(plan).ok_or_else(|| PlansError::UnknownPlan(plan.to_string()))
}

/// Print one plan definition, or the whole catalog, as JSON.
///
/// # Errors
///
/// Returns `PlansError` for an unknown plan identifier.
#[allow(clippy::print_stdout)]
pub fn show(plan: Option<&str>) -> Result<(), PlansError> {
    let rendered = match plan {
        Some(plan) => serde_json::to_string_pretty(&parse_tier(plan)?.definition())?,
        None => {
            let catalog: Vec<_> = PlanTier::ALL.into_iter().map(PlanTier::definition).collect();
            serde_json::to_string_pretty(&catalog)?
        }
    };
    println!("{rendered}");
    Ok(())
}

/// Decide whether one more `resource` fits on `plan` at `usage`.
///
/// # Errors
///
/// Returns `PlansError` for an unknown plan or resource.
#[allow(clippy::print_stdout)]
pub fn can_create(plan: &str, resource: &str, usage: u32) -> Result<CreateDecision, PlansError> {
    let tier = parse_tier(plan)?;
    let resource = Resource::parse(resource)
        .ok_or_else(|| PlansError::UnknownResource(resource.to_string()))?;

    let decision = PlanGate::new(tier, false).can_create(resource, usage);
    match decision.limit {
        Some(limit) => println!(
            "{tier}: {usage}/{limit} {resource} used, {}",
            if decision.allowed { "may create another" } else { "limit reached" }
        ),
        None => println!("{tier}: {resource} is unlimited"),
    }
    Ok(decision)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_can_create_under_limit() {
        let decision = can_create("basic", "venues", 0).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.limit, Some(1));
    }

    #[test]
    fn test_can_create_at_limit() {
        assert!(!can_create("basic", "venues", 1).unwrap().allowed);
    }

    #[test]
    fn test_unknown_plan() {
        assert!(matches!(
            can_create("enterprise", "venues", 0),
            Err(PlansError::UnknownPlan(_))
        ));
        assert!(matches!(show(Some("enterprise")), Err(PlansError::UnknownPlan(_))));
    }

    #[test]
    fn test_unknown_resource() {
        assert!(matches!(
            can_create("pro", "rooms", 0),
            Err(PlansError::UnknownResource(_))
        ));
    }
}
