//! Read-through cache for host application statuses.
//!
//! The workflow owns the cache and invalidates it after every mutation that
//! can change the cached value, replacing the ad hoc cache-busting calls the
//! earlier design scattered at call sites. A cached `None` is meaningful: it
//! records that the user has never applied.

use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::ApplicantId;

#[derive(Debug, Default)]
pub struct StatusCache {
    entries: Mutex<HashMap<ApplicantId, Option<String>>>,
}

impl StatusCache {
    /// Cached value for the applicant. Outer `None` means "not cached";
    /// inner `None` means "cached as: no application".
    pub fn get(&self, applicant: ApplicantId) -> Option<Option<String>> {
        let guard = self.entries.lock().expect("status cache mutex poisoned");
        guard.get(&applicant).cloned()
    }

    pub fn put(&self, applicant: ApplicantId, status: Option<String>) {
        let mut guard = self.entries.lock().expect("status cache mutex poisoned");
        guard.insert(applicant, status);
    }

    pub fn invalidate(&self, applicant: ApplicantId) {
        let mut guard = self.entries.lock().expect("status cache mutex poisoned");
        guard.remove(&applicant);
    }
}
