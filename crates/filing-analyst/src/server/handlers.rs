//! Route handlers

use super::error::ApiError;
use super::state::AppState;
use crate::report::{IndexSummary, Report};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const WELCOME_MESSAGE: &str = "Welcome to the Agentic AI Platform for SEC Filings";

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub ticker: String,
    #[serde(alias = "filingType")]
    pub filing_type: String,
}

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub ticker: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QaResponse {
    pub answer: String,
}

/// Status check
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok", "message": WELCOME_MESSAGE }))
}

pub async fn generate_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let Json(request) = payload?;
    let report = state
        .orchestrator
        .generate_report(&request.ticker, &request.filing_type)
        .await?;
    Ok(Json(report))
}

pub async fn answer_question(
    State(state): State<AppState>,
    payload: Result<Json<QaRequest>, JsonRejection>,
) -> Result<Json<QaResponse>, ApiError> {
    let Json(request) = payload?;
    let answer = state
        .orchestrator
        .answer(&request.ticker, &request.question)
        .await?;
    Ok(Json(QaResponse { answer }))
}

pub async fn index_filing(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<IndexSummary>, ApiError> {
    let Json(request) = payload?;
    let summary = state
        .orchestrator
        .index_filing(&request.ticker, &request.filing_type)
        .await?;
    Ok(Json(summary))
}
