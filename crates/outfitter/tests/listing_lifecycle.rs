//! Integration scenarios for the property listing workflow.
//!
//! Scenarios run end to end through the public workflow facade and HTTP
//! router against an in-memory backend, covering the full journey from first
//! draft to a listed marketplace property and the refusals along the way.

mod common {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use serde::Serialize;

    use outfitter::workflows::backend::BackendError;
    use outfitter::workflows::listing::lifecycle;
    use outfitter::workflows::listing::{
        sanitize_form, AccommodationOption, DraftPayload, HuntingPackage, ImageSet, ListingBackend,
        ListingId, ListingPayload, ListingRecord, ListingStatus, ListingWorkflow, PropertyImage,
        PropertyListingForm, ProviderId,
    };

    pub(super) fn draft_form() -> PropertyListingForm {
        PropertyListingForm {
            property_name: "Big Buck Ranch".to_string(),
            description: "A 640 acre ranch in the Texas hill country.".to_string(),
            address: "1 Ranch Rd".to_string(),
            city: "Dripping Springs".to_string(),
            state: "TX".to_string(),
            zip_code: "78620".to_string(),
            country: "United States".to_string(),
            latitude: "30.27".to_string(),
            longitude: "-98.68".to_string(),
            total_acres: 640.0,
            images: ImageSet::from_uploaded(vec![PropertyImage {
                url: "https://cdn.example/ranch.jpg".to_string(),
                ..PropertyImage::default()
            }]),
            ..PropertyListingForm::default()
        }
    }

    pub(super) fn submittable_form() -> PropertyListingForm {
        let mut form = draft_form();
        form.hunting_packages = vec![HuntingPackage {
            name: "Trophy Whitetail".to_string(),
            hunting_type: "rifle".to_string(),
            duration_days: 3,
            price: 1500.0,
            max_hunters: 4,
            description: "Guided rifle hunt over feeders.".to_string(),
            ..HuntingPackage::default()
        }];
        form.accommodations = vec![AccommodationOption {
            kind: "lodge".to_string(),
            name: "Main Lodge".to_string(),
            bedrooms: 4,
            bathrooms: 2.0,
            capacity: 8,
            price_per_night: 0.0,
            amenities: Vec::new(),
        }];
        form
    }

    fn form_from<P: Serialize>(payload: &P) -> PropertyListingForm {
        let value = serde_json::to_value(payload).expect("payload serializes");
        sanitize_form(&value)
    }

    /// In-memory stand-in for the marketplace backend. Status transitions
    /// follow the same lifecycle rules the production backend enforces.
    #[derive(Default)]
    pub(super) struct MemoryBackend {
        records: Mutex<HashMap<u64, ListingRecord>>,
        next_id: AtomicU64,
    }

    impl MemoryBackend {
        fn allocate(&self) -> ListingId {
            ListingId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }

        fn with_record<T>(
            &self,
            id: ListingId,
            apply: impl FnOnce(&mut ListingRecord) -> T,
        ) -> Result<T, BackendError> {
            let mut guard = self.records.lock().expect("lock");
            let record = guard.get_mut(&id.0).ok_or(BackendError::NotFound)?;
            Ok(apply(record))
        }

        pub(super) fn stored(&self, id: ListingId) -> Option<ListingRecord> {
            self.records.lock().expect("lock").get(&id.0).cloned()
        }
    }

    impl ListingBackend for MemoryBackend {
        fn create_draft(
            &self,
            provider: ProviderId,
            payload: DraftPayload,
        ) -> Result<ListingRecord, BackendError> {
            let record = ListingRecord {
                id: self.allocate(),
                provider,
                form: form_from(&payload),
                status: ListingStatus::from_wire("DRAFT", Some(1), false, None),
                created_at: Utc::now(),
                updated_at: None,
            };
            self.records
                .lock()
                .expect("lock")
                .insert(record.id.0, record.clone());
            Ok(record)
        }

        fn save_draft(
            &self,
            id: ListingId,
            payload: DraftPayload,
            phase: u8,
        ) -> Result<ListingRecord, BackendError> {
            self.with_record(id, |record| {
                record.form = form_from(&payload);
                record.status = ListingStatus::from_wire("DRAFT", Some(phase), false, None);
                record.updated_at = Some(Utc::now());
                record.clone()
            })
        }

        fn create_listing(
            &self,
            provider: ProviderId,
            payload: ListingPayload,
        ) -> Result<ListingRecord, BackendError> {
            let record = ListingRecord {
                id: self.allocate(),
                provider,
                form: form_from(&payload),
                status: ListingStatus::Pending,
                created_at: Utc::now(),
                updated_at: None,
            };
            self.records
                .lock()
                .expect("lock")
                .insert(record.id.0, record.clone());
            Ok(record)
        }

        fn complete_draft(
            &self,
            id: ListingId,
            payload: ListingPayload,
        ) -> Result<ListingRecord, BackendError> {
            self.with_record(id, |record| {
                record.form = form_from(&payload);
                record.status = ListingStatus::Pending;
                record.updated_at = Some(Utc::now());
                record.clone()
            })
        }

        fn update_listing(
            &self,
            id: ListingId,
            payload: ListingPayload,
        ) -> Result<ListingRecord, BackendError> {
            self.with_record(id, |record| {
                record.form = form_from(&payload);
                record.status = lifecycle::post_update_status(&record.status);
                record.updated_at = Some(Utc::now());
                record.clone()
            })
        }

        fn toggle_listing(&self, id: ListingId) -> Result<bool, BackendError> {
            self.with_record(id, |record| {
                match lifecycle::toggle_listing(&record.status) {
                    Ok(next) => {
                        record.status = next;
                        Ok(record.status.is_listed())
                    }
                    Err(guard) => Err(BackendError::Refused(guard.to_string())),
                }
            })?
        }

        fn delete_listing(&self, id: ListingId) -> Result<(), BackendError> {
            let mut guard = self.records.lock().expect("lock");
            guard.remove(&id.0).map(|_| ()).ok_or(BackendError::NotFound)
        }

        fn fetch(&self, id: ListingId) -> Result<Option<ListingRecord>, BackendError> {
            Ok(self.records.lock().expect("lock").get(&id.0).cloned())
        }

        fn for_provider(
            &self,
            provider: ProviderId,
            include_drafts: bool,
        ) -> Result<Vec<ListingRecord>, BackendError> {
            let guard = self.records.lock().expect("lock");
            let mut records: Vec<ListingRecord> = guard
                .values()
                .filter(|record| record.provider == provider)
                .filter(|record| {
                    include_drafts || !matches!(record.status, ListingStatus::Draft { .. })
                })
                .cloned()
                .collect();
            records.sort_by_key(|record| record.id.0);
            Ok(records)
        }

        fn pending_review(&self) -> Result<Vec<ListingRecord>, BackendError> {
            let guard = self.records.lock().expect("lock");
            let mut records: Vec<ListingRecord> = guard
                .values()
                .filter(|record| record.status == ListingStatus::Pending)
                .cloned()
                .collect();
            records.sort_by_key(|record| record.id.0);
            Ok(records)
        }

        fn approve(
            &self,
            id: ListingId,
            _feedback: Option<String>,
        ) -> Result<ListingRecord, BackendError> {
            self.with_record(id, |record| {
                record.status = ListingStatus::Approved { listed: false };
                record.updated_at = Some(Utc::now());
                record.clone()
            })
        }

        fn reject(&self, id: ListingId, feedback: String) -> Result<ListingRecord, BackendError> {
            self.with_record(id, |record| {
                record.status = ListingStatus::Rejected { feedback };
                record.updated_at = Some(Utc::now());
                record.clone()
            })
        }
    }

    pub(super) fn build_workflow() -> (ListingWorkflow<MemoryBackend>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::default());
        (ListingWorkflow::new(backend.clone()), backend)
    }
}

mod journey {
    use super::common::*;
    use outfitter::workflows::listing::{
        DraftPhase, GuardViolation, ListingStatus, ProviderId, WorkflowError,
    };

    const HOST: ProviderId = ProviderId(11);

    #[test]
    fn draft_to_listed_marketplace_property() {
        let (workflow, backend) = build_workflow();

        let draft = workflow
            .create_draft(HOST, &draft_form())
            .expect("draft created");
        assert_eq!(
            draft.status,
            ListingStatus::Draft {
                phase: DraftPhase::One
            }
        );

        // Finish phase two and persist the advance in the same save.
        let saved = workflow
            .save_draft(HOST, draft.id, &submittable_form(), Some(DraftPhase::Two))
            .expect("draft saved");
        assert_eq!(
            saved.status,
            ListingStatus::Draft {
                phase: DraftPhase::Two
            }
        );

        let pending = workflow
            .submit(HOST, Some(draft.id), &submittable_form())
            .expect("draft completed");
        assert_eq!(pending.status, ListingStatus::Pending);

        let approved = workflow.approve(draft.id, None).expect("approved");
        assert_eq!(approved.status, ListingStatus::Approved { listed: false });
        assert!(!approved.publicly_visible());

        let listed = workflow.toggle_listing(HOST, draft.id).expect("listed");
        assert!(listed);
        let stored = backend.stored(draft.id).expect("record present");
        assert!(stored.publicly_visible());
    }

    #[test]
    fn draft_saves_keep_entered_free_text() {
        let (workflow, backend) = build_workflow();
        let draft = workflow
            .create_draft(HOST, &draft_form())
            .expect("draft created");

        let mut form = draft_form();
        form.facilities = vec!["Walk-in cooler".to_string(), "Skinning shed".to_string()];
        form.rules = Some("No night hunts.".to_string());
        form.season_info = Some("October through January.".to_string());
        workflow
            .save_draft(HOST, draft.id, &form, None)
            .expect("draft saved");

        let stored = backend.stored(draft.id).expect("record present");
        assert_eq!(stored.form.facilities, form.facilities);
        assert_eq!(stored.form.rules.as_deref(), Some("No night hunts."));
        assert_eq!(
            stored.form.season_info.as_deref(),
            Some("October through January.")
        );
        assert_eq!(stored.form.safety_info, None);
    }

    #[test]
    fn completing_a_phase_one_draft_is_refused() {
        let (workflow, backend) = build_workflow();
        let draft = workflow
            .create_draft(HOST, &draft_form())
            .expect("draft created");

        let err = workflow
            .submit(HOST, Some(draft.id), &submittable_form())
            .expect_err("phase two required");
        assert!(matches!(
            err,
            WorkflowError::Guard(GuardViolation::WrongStatus { .. })
        ));
        // The persisted record is untouched by the failed transition.
        let stored = backend.stored(draft.id).expect("record present");
        assert_eq!(stored.status.draft_phase(), Some(1));
    }

    #[test]
    fn invalid_submission_reports_every_violation() {
        let (workflow, _) = build_workflow();
        let mut form = submittable_form();
        form.property_name = "BB".to_string();
        form.accommodations.clear();

        let err = workflow
            .submit(HOST, None, &form)
            .expect_err("invalid form");
        match err {
            WorkflowError::Guard(GuardViolation::Invalid { errors }) => {
                assert!(errors.iter().any(|error| error.contains("name")));
                assert!(errors.iter().any(|error| error.contains("accommodation")));
            }
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn approved_listing_refuses_changes_to_locked_fields() {
        let (workflow, _) = build_workflow();
        let created = workflow
            .submit(HOST, None, &submittable_form())
            .expect("created pending");
        workflow.approve(created.id, None).expect("approved");

        let mut moved = submittable_form();
        moved.address = "2 Ranch Rd".to_string();
        let err = workflow
            .submit(HOST, Some(created.id), &moved)
            .expect_err("address is locked");
        assert!(matches!(
            err,
            WorkflowError::Guard(GuardViolation::LockedFields { ref fields })
                if fields == &vec!["address"]
        ));

        // Unlocked content still edits freely.
        let mut retuned = submittable_form();
        retuned.rules = Some("No night hunts.".to_string());
        let updated = workflow
            .submit(HOST, Some(created.id), &retuned)
            .expect("rules edit allowed");
        assert_eq!(updated.status, ListingStatus::Approved { listed: false });
    }

    #[test]
    fn rejection_feeds_back_and_resubmission_returns_to_pending() {
        let (workflow, _) = build_workflow();
        let created = workflow
            .submit(HOST, None, &submittable_form())
            .expect("created pending");

        let rejected = workflow
            .reject(created.id, "Photos are too dark.".to_string())
            .expect("rejected");
        assert_eq!(
            rejected.status.admin_feedback(),
            Some("Photos are too dark.")
        );

        let resubmitted = workflow
            .submit(HOST, Some(created.id), &submittable_form())
            .expect("resubmitted");
        assert_eq!(resubmitted.status, ListingStatus::Pending);
    }

    #[test]
    fn only_the_owner_sees_an_unlisted_record() {
        let (workflow, _) = build_workflow();
        let created = workflow
            .submit(HOST, None, &submittable_form())
            .expect("created pending");

        let stranger = ProviderId(99);
        let err = workflow
            .fetch(Some(stranger), created.id)
            .expect_err("pending is private");
        assert!(matches!(err, WorkflowError::NotOwner));

        workflow.approve(created.id, None).expect("approved");
        // Approved but unlisted is still private.
        assert!(workflow.fetch(None, created.id).is_err());

        workflow.toggle_listing(HOST, created.id).expect("listed");
        let public = workflow.fetch(None, created.id).expect("now public");
        assert!(public.publicly_visible());
    }

    #[test]
    fn delete_requires_explicit_confirmation() {
        let (workflow, backend) = build_workflow();
        let created = workflow
            .submit(HOST, None, &submittable_form())
            .expect("created pending");

        let err = workflow
            .delete(HOST, created.id, false)
            .expect_err("confirmation required");
        assert!(matches!(
            err,
            WorkflowError::Guard(GuardViolation::ConfirmationRequired)
        ));
        assert!(backend.stored(created.id).is_some());

        workflow.delete(HOST, created.id, true).expect("deleted");
        assert!(backend.stored(created.id).is_none());
    }

    #[test]
    fn dashboard_listing_can_exclude_drafts() {
        let (workflow, _) = build_workflow();
        workflow
            .create_draft(HOST, &draft_form())
            .expect("draft created");
        workflow
            .submit(HOST, None, &submittable_form())
            .expect("created pending");

        let all = workflow.my_listings(HOST, true).expect("all records");
        assert_eq!(all.len(), 2);

        let submitted_only = workflow.my_listings(HOST, false).expect("no drafts");
        assert_eq!(submitted_only.len(), 1);
        assert_eq!(submitted_only[0].status, ListingStatus::Pending);
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use outfitter::workflows::listing::listing_router;

    fn build_router() -> axum::Router {
        let (workflow, _) = build_workflow();
        listing_router(Arc::new(workflow))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn post_listings_creates_a_pending_record() {
        let router = build_router();
        let payload = json!({
            "provider_id": 11,
            "form": serde_json::to_value(submittable_form()).expect("form"),
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/listings")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body.get("status"), Some(&json!("PENDING")));
        assert_eq!(body.get("is_listed"), Some(&json!(false)));
        assert!(body.get("id").is_some());
    }

    #[tokio::test]
    async fn invalid_submission_returns_unprocessable_with_details() {
        let router = build_router();
        let mut form = submittable_form();
        form.hunting_packages.clear();
        let payload = json!({
            "provider_id": 11,
            "form": serde_json::to_value(form).expect("form"),
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/listings")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        let details = body
            .get("details")
            .and_then(Value::as_array)
            .expect("details array");
        assert!(details
            .iter()
            .any(|detail| detail.as_str().unwrap_or_default().contains("package")));
    }

    #[tokio::test]
    async fn draft_endpoints_carry_progress_and_phase() {
        let router = build_router();
        let payload = json!({
            "provider_id": 11,
            "form": serde_json::to_value(draft_form()).expect("form"),
        });

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/listings/draft")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body.get("status"), Some(&json!("DRAFT")));
        assert_eq!(body.get("draft_completed_phase"), Some(&json!(1)));
        let progress = body
            .get("draft_progress")
            .and_then(Value::as_u64)
            .expect("progress present");
        assert!(progress > 0 && progress < 100);

        // Advance to phase two through a draft save.
        let id = body.get("id").and_then(Value::as_u64).expect("id");
        let save = json!({
            "provider_id": 11,
            "form": serde_json::to_value(submittable_form()).expect("form"),
            "completed_phase": 2,
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/listings/{id}/draft"))
                    .header("content-type", "application/json")
                    .body(Body::from(save.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.get("draft_completed_phase"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn review_queue_and_toggle_round_trip() {
        let (workflow, _) = build_workflow();
        let workflow = Arc::new(workflow);
        let created = workflow
            .submit(
                outfitter::workflows::listing::ProviderId(11),
                None,
                &submittable_form(),
            )
            .expect("created pending");
        let router = listing_router(workflow);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/listings/pending")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let queue = body_json(response).await;
        assert_eq!(queue.as_array().map(Vec::len), Some(1));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/listings/{}/approve", created.id.0))
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.get("status"), Some(&json!("APPROVED")));
        assert_eq!(body.get("is_listed"), Some(&json!(false)));

        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!(
                        "/api/v1/listings/{}/toggle-listing",
                        created.id.0
                    ))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "provider_id": 11 }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.get("is_listed"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn fetch_scopes_unlisted_records_to_the_owner() {
        let router = build_router();
        let payload = json!({
            "provider_id": 11,
            "form": serde_json::to_value(submittable_form()).expect("form"),
        });

        let created = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/listings")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let id = body_json(created).await["id"].as_u64().expect("id");

        let owner = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/listings/{id}?viewer_id=11"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(owner.status(), StatusCode::OK);

        let stranger = router
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/listings/{id}?viewer_id=12"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(stranger.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn rejecting_without_feedback_is_unprocessable() {
        let (workflow, _) = build_workflow();
        let workflow = Arc::new(workflow);
        let created = workflow
            .submit(
                outfitter::workflows::listing::ProviderId(11),
                None,
                &submittable_form(),
            )
            .expect("created pending");
        let router = listing_router(workflow);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/listings/{}/reject", created.id.0))
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
