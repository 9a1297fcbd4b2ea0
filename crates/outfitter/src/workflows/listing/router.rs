use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::backend::ListingBackend;
use super::domain::{
    DraftPhase, ListingId, ListingRecord, ListingStatusView, PropertyListingForm, ProviderId,
};
use super::lifecycle::GuardViolation;
use super::progress::draft_progress;
use super::service::{ListingWorkflow, WorkflowError};
use crate::workflows::backend::BackendError;

/// Router builder exposing the listing workflow over HTTP. Identity is
/// asserted by the excluded auth layer; handlers take the acting account id
/// from the request.
pub fn listing_router<B>(service: Arc<ListingWorkflow<B>>) -> Router
where
    B: ListingBackend + 'static,
{
    Router::new()
        .route("/api/v1/listings", post(create_handler::<B>))
        .route("/api/v1/listings/draft", post(create_draft_handler::<B>))
        .route("/api/v1/listings/pending", get(pending_handler::<B>))
        .route(
            "/api/v1/listings/:id",
            get(fetch_handler::<B>)
                .put(submit_handler::<B>)
                .delete(delete_handler::<B>),
        )
        .route("/api/v1/listings/:id/draft", put(save_draft_handler::<B>))
        .route(
            "/api/v1/listings/:id/toggle-listing",
            put(toggle_handler::<B>),
        )
        .route("/api/v1/listings/:id/approve", post(approve_handler::<B>))
        .route("/api/v1/listings/:id/reject", post(reject_handler::<B>))
        .route(
            "/api/v1/providers/:provider_id/listings",
            get(my_listings_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormRequest {
    pub(crate) provider_id: u64,
    pub(crate) form: PropertyListingForm,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftSaveRequest {
    pub(crate) provider_id: u64,
    pub(crate) form: PropertyListingForm,
    /// Draft phase the provider has completed; omitted means unchanged.
    #[serde(default)]
    pub(crate) completed_phase: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteParams {
    pub(crate) provider_id: u64,
    #[serde(default)]
    pub(crate) confirm: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FetchParams {
    #[serde(default)]
    pub(crate) viewer_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MyListingsParams {
    #[serde(default = "default_true")]
    pub(crate) include_drafts: bool,
}

fn default_true() -> bool {
    true
}

/// Full listing projection returned to providers; drafts additionally carry
/// the completion percentage for the progress bar.
#[derive(Debug, Serialize)]
pub(crate) struct ListingDetailView {
    #[serde(flatten)]
    pub(crate) status: ListingStatusView,
    pub(crate) provider_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) draft_progress: Option<u8>,
    pub(crate) form: PropertyListingForm,
}

pub(crate) fn detail_view(record: ListingRecord) -> ListingDetailView {
    let progress = record
        .status
        .draft_phase()
        .map(|_| draft_progress(&record.form));
    ListingDetailView {
        status: record.status_view(),
        provider_id: record.provider.0,
        draft_progress: progress,
        form: record.form,
    }
}

fn error_response(error: WorkflowError) -> Response {
    match error {
        WorkflowError::Guard(GuardViolation::Invalid { errors }) => {
            let payload = json!({
                "error": "validation failed",
                "details": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WorkflowError::Guard(guard) => {
            let payload = json!({ "error": guard.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WorkflowError::Payload(payload_error) => {
            let payload = json!({ "error": payload_error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WorkflowError::NotFound => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        WorkflowError::NotOwner => {
            let payload = json!({ "error": "not authorized for this listing" });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        WorkflowError::Backend(BackendError::Unauthorized) => {
            let payload = json!({ "error": BackendError::Unauthorized.to_string() });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        WorkflowError::Backend(BackendError::NotFound) => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        WorkflowError::Backend(BackendError::Forbidden) => {
            let payload = json!({ "error": "not permitted" });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        WorkflowError::Backend(BackendError::Refused(reason)) => {
            let payload = json!({ "error": reason });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        WorkflowError::Backend(transport) => {
            let payload = json!({ "error": transport.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    axum::Json(request): axum::Json<FormRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.submit(ProviderId(request.provider_id), None, &request.form) {
        Ok(record) => (StatusCode::CREATED, axum::Json(detail_view(record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_draft_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    axum::Json(request): axum::Json<FormRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.create_draft(ProviderId(request.provider_id), &request.form) {
        Ok(record) => (StatusCode::CREATED, axum::Json(detail_view(record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<FormRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.submit(
        ProviderId(request.provider_id),
        Some(ListingId(id)),
        &request.form,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(detail_view(record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_draft_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<DraftSaveRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.save_draft(
        ProviderId(request.provider_id),
        ListingId(id),
        &request.form,
        request.completed_phase.map(DraftPhase::from_number),
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(detail_view(record))).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToggleRequest {
    pub(crate) provider_id: u64,
}

pub(crate) async fn toggle_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<ToggleRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.toggle_listing(ProviderId(request.provider_id), ListingId(id)) {
        Ok(listed) => {
            let payload = json!({ "id": id, "is_listed": listed });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    Query(params): Query<DeleteParams>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.delete(ProviderId(params.provider_id), ListingId(id), params.confirm) {
        Ok(()) => {
            let payload = json!({ "deleted": id });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    Query(params): Query<FetchParams>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.fetch(params.viewer_id.map(ProviderId), ListingId(id)) {
        Ok(record) => (StatusCode::OK, axum::Json(detail_view(record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn my_listings_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(provider_id): Path<u64>,
    Query(params): Query<MyListingsParams>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.my_listings(ProviderId(provider_id), params.include_drafts) {
        Ok(records) => {
            let views: Vec<ListingDetailView> = records.into_iter().map(detail_view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pending_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.pending_review() {
        Ok(records) => {
            let views: Vec<ListingDetailView> = records.into_iter().map(detail_view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    match service.approve(ListingId(id), request.feedback) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<B>(
    State(service): State<Arc<ListingWorkflow<B>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    B: ListingBackend + 'static,
{
    let feedback = request.feedback.unwrap_or_default();
    match service.reject(ListingId(id), feedback) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}
