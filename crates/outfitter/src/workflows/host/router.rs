use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicantId, ApplicationId, HostApplicationForm, HostApplicationStatus};
use super::projector::HostAction;
use super::service::{HostBackend, HostWorkflow, HostWorkflowError};
use crate::workflows::backend::BackendError;

/// Router builder for the host application workflow.
pub fn host_router<B>(service: Arc<HostWorkflow<B>>) -> Router
where
    B: HostBackend + 'static,
{
    Router::new()
        .route("/api/v1/host/applications", post(submit_handler::<B>))
        .route(
            "/api/v1/host/applications/pending",
            get(pending_handler::<B>),
        )
        .route(
            "/api/v1/host/applications/:id/review",
            post(review_handler::<B>),
        )
        .route(
            "/api/v1/hosts/:applicant_id/application",
            get(status_handler::<B>),
        )
        .route(
            "/api/v1/hosts/:applicant_id/become-host",
            get(become_host_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) applicant_id: u64,
    pub(crate) form: HostApplicationForm,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) applicant_id: u64,
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

/// Projection served to the client when "Become a Host" is clicked.
#[derive(Debug, Serialize)]
pub(crate) struct BecomeHostView {
    #[serde(flatten)]
    pub(crate) action: HostAction,
    pub(crate) destination: super::projector::HostDestination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notice: Option<String>,
}

fn error_response(error: HostWorkflowError) -> Response {
    match error {
        HostWorkflowError::Incomplete { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        HostWorkflowError::AlreadyDecided(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        HostWorkflowError::NotFound | HostWorkflowError::Backend(BackendError::NotFound) => {
            let payload = json!({ "error": "application not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        HostWorkflowError::Backend(BackendError::Unauthorized) => {
            let payload = json!({ "error": BackendError::Unauthorized.to_string() });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        HostWorkflowError::Backend(BackendError::Forbidden) => {
            let payload = json!({ "error": "not permitted" });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        HostWorkflowError::Backend(BackendError::Refused(reason)) => {
            let payload = json!({ "error": reason });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        HostWorkflowError::Backend(transport) => {
            let payload = json!({ "error": transport.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<B>(
    State(service): State<Arc<HostWorkflow<B>>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    B: HostBackend + 'static,
{
    match service.submit(ApplicantId(request.applicant_id), request.form) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<B>(
    State(service): State<Arc<HostWorkflow<B>>>,
    Path(applicant_id): Path<u64>,
) -> Response
where
    B: HostBackend + 'static,
{
    match service.application(ApplicantId(applicant_id)) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Ok(None) => error_response(HostWorkflowError::NotFound),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn become_host_handler<B>(
    State(service): State<Arc<HostWorkflow<B>>>,
    Path(applicant_id): Path<u64>,
) -> Response
where
    B: HostBackend + 'static,
{
    match service.become_host_action(ApplicantId(applicant_id)) {
        Ok(action) => {
            let view = BecomeHostView {
                destination: action.destination(),
                notice: action.notice(),
                action,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pending_handler<B>(State(service): State<Arc<HostWorkflow<B>>>) -> Response
where
    B: HostBackend + 'static,
{
    match service.pending() {
        Ok(records) => {
            let views: Vec<_> = records
                .iter()
                .map(|record| record.status_view())
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<B>(
    State(service): State<Arc<HostWorkflow<B>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    B: HostBackend + 'static,
{
    let Some(status) = HostApplicationStatus::from_token(&request.status) else {
        let payload = json!({ "error": format!("unknown review status '{}'", request.status) });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };
    match service.review(
        ApplicationId(id),
        ApplicantId(request.applicant_id),
        status,
        request.comment,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}
