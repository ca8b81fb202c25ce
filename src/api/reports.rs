//! Reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    services::reports::{ActiveMemberEntry, AvailabilityReport, MostBorrowedEntry},
};

use super::AuthenticatedUser;

/// Report query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Maximum number of entries to return (default: 5)
    pub limit: Option<i64>,
}

/// Most borrowed books over the full ledger history
#[utoipa::path(
    get,
    path = "/reports/most-borrowed",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of entries (default 5)")
    ),
    responses(
        (status = 200, description = "Most borrowed books", body = Vec<MostBorrowedEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn most_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<MostBorrowedEntry>>> {
    let entries = state.services.reports.most_borrowed(query.limit).await?;
    Ok(Json(entries))
}

/// Members ranked by all-time borrow count
#[utoipa::path(
    get,
    path = "/reports/active-members",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of entries (default 5)")
    ),
    responses(
        (status = 200, description = "Most active members", body = Vec<ActiveMemberEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn active_members(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ActiveMemberEntry>>> {
    let entries = state.services.reports.active_members(query.limit).await?;
    Ok(Json(entries))
}

/// Catalog-wide availability summary
#[utoipa::path(
    get,
    path = "/reports/availability",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Availability report", body = AvailabilityReport),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<AvailabilityReport>> {
    let report = state.services.reports.availability().await?;
    Ok(Json(report))
}
