use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use outfitter::workflows::backend::BackendError;
use outfitter::workflows::host::{
    ApplicantId, ApplicationId, HostApplicationForm, HostApplicationRecord, HostApplicationStatus,
    HostBackend,
};
use outfitter::workflows::listing::lifecycle;
use outfitter::workflows::listing::{
    sanitize_form, DraftPayload, ListingBackend, ListingId, ListingPayload, ListingRecord,
    ListingStatus, PropertyListingForm, ProviderId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn form_from<P: Serialize>(payload: &P) -> PropertyListingForm {
    // Payloads are plain data; serialization cannot fail.
    let value = serde_json::to_value(payload).unwrap_or_default();
    sanitize_form(&value)
}

/// In-memory listing store. Status transitions follow the same lifecycle
/// rules the workflow enforces, so a record can never skip a state.
#[derive(Default)]
pub(crate) struct InMemoryListingBackend {
    records: Mutex<HashMap<u64, ListingRecord>>,
    next_id: AtomicU64,
}

impl InMemoryListingBackend {
    fn allocate(&self) -> ListingId {
        ListingId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn insert(&self, record: ListingRecord) -> ListingRecord {
        self.records
            .lock()
            .expect("listing store mutex poisoned")
            .insert(record.id.0, record.clone());
        record
    }

    fn with_record<T>(
        &self,
        id: ListingId,
        apply: impl FnOnce(&mut ListingRecord) -> T,
    ) -> Result<T, BackendError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        let record = guard.get_mut(&id.0).ok_or(BackendError::NotFound)?;
        Ok(apply(record))
    }
}

impl ListingBackend for InMemoryListingBackend {
    fn create_draft(
        &self,
        provider: ProviderId,
        payload: DraftPayload,
    ) -> Result<ListingRecord, BackendError> {
        Ok(self.insert(ListingRecord {
            id: self.allocate(),
            provider,
            form: form_from(&payload),
            status: ListingStatus::from_wire("DRAFT", Some(1), false, None),
            created_at: Utc::now(),
            updated_at: None,
        }))
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
        Ok(self.insert(ListingRecord {
            id: self.allocate(),
            provider,
            form: form_from(&payload),
            status: ListingStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        }))
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
        self.with_record(id, |record| match lifecycle::toggle_listing(&record.status) {
            Ok(next) => {
                record.status = next;
                record.updated_at = Some(Utc::now());
                Ok(record.status.is_listed())
            }
            Err(guard) => Err(BackendError::Refused(guard.to_string())),
        })?
    }

    fn delete_listing(&self, id: ListingId) -> Result<(), BackendError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        guard.remove(&id.0).map(|_| ()).ok_or(BackendError::NotFound)
    }

    fn fetch(&self, id: ListingId) -> Result<Option<ListingRecord>, BackendError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn for_provider(
        &self,
        provider: ProviderId,
        include_drafts: bool,
    ) -> Result<Vec<ListingRecord>, BackendError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
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
        let guard = self.records.lock().expect("listing store mutex poisoned");
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

/// In-memory host application store. One live application per applicant; a
/// fresh submission replaces a rejected one.
#[derive(Default)]
pub(crate) struct InMemoryHostBackend {
    records: Mutex<HashMap<ApplicantId, HostApplicationRecord>>,
    next_id: AtomicU64,
}

impl HostBackend for InMemoryHostBackend {
    fn fetch_application(
        &self,
        applicant: ApplicantId,
    ) -> Result<Option<HostApplicationRecord>, BackendError> {
        let guard = self.records.lock().expect("host store mutex poisoned");
        Ok(guard.get(&applicant).cloned())
    }

    fn submit_application(
        &self,
        applicant: ApplicantId,
        form: HostApplicationForm,
    ) -> Result<HostApplicationRecord, BackendError> {
        let record = HostApplicationRecord {
            id: ApplicationId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            applicant,
            form,
            status: HostApplicationStatus::Pending,
            created_at: Utc::now(),
            reviewed_at: None,
            admin_comment: None,
        };
        self.records
            .lock()
            .expect("host store mutex poisoned")
            .insert(applicant, record.clone());
        Ok(record)
    }

    fn pending_applications(&self) -> Result<Vec<HostApplicationRecord>, BackendError> {
        let guard = self.records.lock().expect("host store mutex poisoned");
        let mut records: Vec<HostApplicationRecord> = guard
            .values()
            .filter(|record| record.status == HostApplicationStatus::Pending)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id.0);
        Ok(records)
    }

    fn review_application(
        &self,
        id: ApplicationId,
        status: HostApplicationStatus,
        comment: Option<String>,
    ) -> Result<HostApplicationRecord, BackendError> {
        let mut guard = self.records.lock().expect("host store mutex poisoned");
        let record = guard
            .values_mut()
            .find(|record| record.id == id)
            .ok_or(BackendError::NotFound)?;
        record.status = status;
        record.reviewed_at = Some(Utc::now());
        record.admin_comment = comment;
        Ok(record.clone())
    }
}
