use crate::errors::StoreError;
use crate::models::{DayView, LogEntry, WeightPoint};
use crate::plan::workout_for_date;
use crate::reconcile::{reconcile_entry, ReconcilePolicy};
use crate::stats::weight_series;
use crate::storage::LogStore;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Log operations over whichever store the process was configured with.
#[derive(Clone)]
pub struct LogService {
    store: Arc<dyn LogStore>,
    policy: ReconcilePolicy,
}

impl LogService {
    pub fn new(store: Arc<dyn LogStore>, policy: ReconcilePolicy) -> Self {
        Self { store, policy }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn list_all(&self) -> Result<BTreeMap<NaiveDate, LogEntry>, StoreError> {
        self.store.get_all().await
    }

    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Option<LogEntry>, StoreError> {
        self.store.get(date).await
    }

    /// Replaces the entry for `date` with `fields`, stored as sent. The stored
    /// `date` is always the key, whatever the payload said.
    pub async fn upsert(
        &self,
        date: NaiveDate,
        fields: Map<String, Value>,
    ) -> Result<LogEntry, StoreError> {
        let entry = LogEntry::for_date(date, fields);
        let stored = self.store.upsert(entry).await?;
        info!(%date, "log entry saved");
        Ok(stored)
    }

    pub async fn list_weights(&self) -> Result<Vec<WeightPoint>, StoreError> {
        Ok(weight_series(&self.store.get_all().await?))
    }

    /// The prescription for `date` and the form to edit for it.
    pub async fn day_view(&self, date: NaiveDate) -> Result<DayView, StoreError> {
        let assignment = workout_for_date(date);
        let stored = self.store.get(date).await?;
        Ok(DayView {
            date,
            assignment,
            workout: assignment.workout(),
            has_entry: stored.is_some(),
            form: reconcile_entry(date, assignment, stored.as_ref(), self.policy),
        })
    }
}
