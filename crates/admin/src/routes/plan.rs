//! Plan and feature-gating routes.
//!
//! Usage counts come from the caller; the backend-as-a-service owns venues,
//! staff, bookings and widgets, so this service never counts them itself.

use axum::{
    Json, Router,
    extract::{Path, Query},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use venuedesk_core::plan::{
    CreateDecision, FEATURE_NAMES, FeatureValue, PlanDefinition, PlanTier, Resource, UsageStatus,
    minimum_plan_for,
};

use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Build the plan router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plans", get(list_plans))
        .route("/api/plan", get(current_plan))
        .route("/api/plan/features/{name}", get(feature))
        .route("/api/plan/can-create", post(can_create))
        .route("/api/plan/usage/{resource}", get(usage))
}

/// GET /api/plans
async fn list_plans(RequireUser(_user): RequireUser) -> Json<Vec<PlanDefinition>> {
    Json(PlanTier::ALL.into_iter().map(PlanTier::definition).collect())
}

#[derive(Debug, Serialize)]
pub struct CurrentPlanResponse {
    /// Plan identifier as carried in the token, if any.
    pub plan_id: Option<String>,
    /// Plan the checks are evaluated against.
    pub plan: PlanDefinition,
    /// System admins bypass every limit.
    pub bypass: bool,
}

/// GET /api/plan
async fn current_plan(RequireUser(user): RequireUser) -> Json<CurrentPlanResponse> {
    let gate = user.plan_gate();
    Json(CurrentPlanResponse {
        plan_id: user.plan,
        plan: gate.tier().definition(),
        bypass: gate.is_bypassed(),
    })
}

#[derive(Debug, Serialize)]
pub struct FeatureResponse {
    pub feature: String,
    pub value: FeatureValue,
    pub enabled: bool,
    /// Cheapest plan on which the feature is enabled.
    pub minimum_plan: Option<PlanTier>,
}

/// GET /api/plan/features/{name}
async fn feature(
    RequireUser(user): RequireUser,
    Path(name): Path<String>,
) -> Result<Json<FeatureResponse>, AppError> {
    let gate = user.plan_gate();
    let value = gate.feature(&name).ok_or_else(|| {
        AppError::NotFound(format!(
            "feature '{name}' (expected one of {})",
            FEATURE_NAMES.join(", ")
        ))
    })?;

    Ok(Json(FeatureResponse {
        enabled: gate.has_feature(&name),
        minimum_plan: minimum_plan_for(&name),
        feature: name,
        value,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CanCreateRequest {
    pub resource: String,
    pub usage: u32,
}

/// POST /api/plan/can-create
#[instrument(skip(user, request), fields(user_id = %user.id, resource = %request.resource))]
async fn can_create(
    RequireUser(user): RequireUser,
    Json(request): Json<CanCreateRequest>,
) -> Result<Json<CreateDecision>, AppError> {
    let resource = parse_resource(&request.resource)?;
    let decision = user.plan_gate().can_create(resource, request.usage);
    if !decision.allowed {
        tracing::info!(usage = request.usage, limit = ?decision.limit, "Plan limit reached");
    }
    Ok(Json(decision))
}

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub usage: u32,
}

/// GET /api/plan/usage/{resource}?usage=
async fn usage(
    RequireUser(user): RequireUser,
    Path(resource): Path<String>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<UsageStatus>, AppError> {
    let resource = parse_resource(&resource)?;
    Ok(Json(user.plan_gate().usage_status(resource, query.usage)))
}

fn parse_resource(name: &str) -> Result<Resource, AppError> {
    Resource::parse(name).ok_or_else(|| {
        AppError::BadRequest(format!(
            "unknown resource '{name}' (expected venues, staff, bookings_per_month or widgets)"
        ))
    })
}
