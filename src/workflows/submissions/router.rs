use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    CheckSeverity, CheckStatus, DedupeFinding, Submission, SubmissionId, SubmissionIntake,
    WorkbenchKind, WorkflowStage,
};
use super::repository::{CommunicationDispatcher, RepositoryError, SubmissionRepository};
use super::service::{SubmissionWorkflowService, WorkflowError};

/// Router builder exposing the submission workflow over HTTP.
pub fn submission_router<R, D>(service: Arc<SubmissionWorkflowService<R, D>>) -> Router
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    Router::new()
        .route(
            "/api/v1/submissions",
            post(intake_handler::<R, D>).get(list_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id",
            get(detail_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/approve",
            post(approve_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/reject",
            post(reject_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/override",
            post(override_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/workbench",
            post(workbench_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/feedback",
            post(feedback_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/checks/missing-data",
            post(missing_data_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/checks/dedupe",
            post(dedupe_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/checks/compliance",
            post(compliance_handler::<R, D>),
        )
        .route(
            "/api/v1/submissions/:submission_id/checks/guideline",
            post(guideline_handler::<R, D>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<R, D>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    stage: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkbenchRequest {
    kind: WorkbenchKind,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackRequest {
    positive: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MissingDataRequest {
    field: String,
    description: String,
    severity: CheckSeverity,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComplianceCheckRequest {
    name: String,
    status: CheckStatus,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GuidelineCheckRequest {
    name: String,
    status: CheckStatus,
    score: u8,
    #[serde(default)]
    details: Option<String>,
}

fn error_response(err: WorkflowError) -> Response {
    let status = match &err {
        WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkflowError::InvalidState { .. } => StatusCode::CONFLICT,
        WorkflowError::MatchConfidenceOutOfRange(_) | WorkflowError::ScoreOutOfRange(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        WorkflowError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        WorkflowError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        WorkflowError::Dispatch(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn submission_response(submission: Submission) -> Response {
    (StatusCode::OK, axum::Json(submission.to_view())).into_response()
}

pub(crate) async fn intake_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    axum::Json(intake): axum::Json<SubmissionIntake>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.intake(intake) {
        Ok(submission) => (StatusCode::CREATED, axum::Json(submission.to_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    let limit = match query.limit {
        Some(raw) => match NonZeroUsize::new(raw) {
            Some(limit) => Some(limit),
            None => {
                let payload = json!({ "error": "limit must be a positive integer" });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
        None => None,
    };

    let result = match query.stage.as_deref() {
        Some(slug) => match WorkflowStage::from_slug(slug) {
            Some(stage) => service.by_stage(stage).map(|mut submissions| {
                if let Some(limit) = limit {
                    submissions.truncate(limit.get());
                }
                submissions
            }),
            None => {
                let payload = json!({ "error": format!("unknown stage '{slug}'") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
        None => match limit {
            Some(_) => service.recent(limit),
            None => service.all(),
        },
    };

    match result {
        Ok(submissions) => {
            let views: Vec<_> = submissions.iter().map(Submission::to_view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.detail(&SubmissionId(submission_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.approve_and_send(&SubmissionId(submission_id)) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.reject(&SubmissionId(submission_id)) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn override_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.override_and_process(&SubmissionId(submission_id)) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn workbench_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<WorkbenchRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.send_to_workbench(&SubmissionId(submission_id), request.kind) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn feedback_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<FeedbackRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.provide_feedback(&SubmissionId(submission_id), request.positive) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn missing_data_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<MissingDataRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.record_missing_data(
        &SubmissionId(submission_id),
        request.field,
        request.description,
        request.severity,
    ) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dedupe_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
    axum::Json(finding): axum::Json<DedupeFinding>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.record_dedupe_finding(&SubmissionId(submission_id), finding) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn compliance_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<ComplianceCheckRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.record_compliance_check(
        &SubmissionId(submission_id),
        request.name,
        request.status,
        request.details,
    ) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn guideline_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<GuidelineCheckRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.record_guideline_check(
        &SubmissionId(submission_id),
        request.name,
        request.status,
        request.score,
        request.details,
    ) {
        Ok(submission) => submission_response(submission),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<R, D>(
    State(service): State<Arc<SubmissionWorkflowService<R, D>>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    D: CommunicationDispatcher + 'static,
{
    match service.dashboard() {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}
