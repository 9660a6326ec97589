//! Claims handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use domain_claims::StatusSummary;

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Submits a claim for an automated decision
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<(StatusCode, Json<SubmitClaimResponse>), ApiError> {
    let input = request.into_input()?;
    let submitted = state.service.submit_claim(input).await?;
    Ok((StatusCode::CREATED, Json(submitted.into())))
}

/// Gets a claim by claim number
pub async fn get_claim(
    State(state): State<AppState>,
    Path(claim_number): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let record = state.service.get_claim(&claim_number).await?;
    Ok(Json(record.into()))
}

/// Lists claims under a policy
pub async fn list_policy_claims(
    State(state): State<AppState>,
    Path(policy_number): Path<String>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let records = state.service.claims_for_policy(&policy_number).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Lists claims awaiting a reviewer or with an anomalous delay
pub async fn list_review_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let records = state.service.claims_requiring_review().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Lists claims submitted today
pub async fn list_todays_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let records = state.service.todays_claims().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Records a manual review verdict
pub async fn review_claim(
    State(state): State<AppState>,
    Path(claim_number): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    request.validate()?;
    let record = state
        .service
        .manual_review(&claim_number, request.approved, request.notes)
        .await?;
    Ok(Json(record.into()))
}

/// Marks an approved claim as paid
pub async fn pay_claim(
    State(state): State<AppState>,
    Path(claim_number): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let record = state.service.mark_paid(&claim_number).await?;
    Ok(Json(record.into()))
}

/// Claim counts per status
pub async fn status_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatusSummary>, ApiError> {
    Ok(Json(state.service.status_summary().await?))
}
