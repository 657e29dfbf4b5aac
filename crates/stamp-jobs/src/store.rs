//! In-memory job store shared across request handlers and job tasks.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use stamp_models::{JobId, JobRecord};

/// Process-wide map of job records.
///
/// Cloning is cheap and shares the underlying map. The lock is held only for
/// the duration of a map operation, never across an await point; reads hand
/// out cloned snapshots. Records are never evicted — they live for the
/// process lifetime.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<HashMap<JobId, JobRecord>>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created record, returning its id.
    pub fn insert(&self, record: JobRecord) -> JobId {
        let id = record.id.clone();
        self.write().insert(id.clone(), record);
        id
    }

    /// Snapshot a record by id.
    pub fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.read().get(id).cloned()
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Update a job's progress percentage.
    ///
    /// Delegates to the record, which never decreases progress and never
    /// mutates a terminal record.
    pub fn set_progress(&self, id: &JobId, progress: u8) {
        if let Some(record) = self.write().get_mut(id) {
            record.set_progress(progress);
        }
    }

    /// Mark a job completed with its artifact path.
    pub fn complete(&self, id: &JobId, output_path: PathBuf) {
        if let Some(record) = self.write().get_mut(id) {
            record.mark_completed(output_path);
        }
    }

    /// Mark a job failed with a diagnostic message.
    pub fn fail(&self, id: &JobId, message: impl Into<String>) {
        if let Some(record) = self.write().get_mut(id) {
            record.mark_failed(message);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<JobId, JobRecord>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<JobId, JobRecord>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
