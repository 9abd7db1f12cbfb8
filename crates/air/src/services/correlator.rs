//! Correlator
//!
//! Table of in-flight LLM calls keyed by call id. Frameworks that report a
//! call as separate start and end events use it to carry start-time state
//! (model, prompts, start instant) across to the end event.
//!
//! Every operation is O(1) under a single mutex and never holds the lock
//! across I/O.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{CallId, CallRecord};

/// In-flight call table
#[derive(Debug, Default)]
pub struct Correlator {
    calls: Mutex<HashMap<CallId, CallRecord>>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a call.
    ///
    /// Reusing a live call id replaces the earlier record (last write wins).
    pub fn begin(
        &self,
        call_id: impl Into<CallId>,
        model_name: impl Into<String>,
        inputs: Vec<String>,
    ) {
        let call_id = call_id.into();
        let record = CallRecord::new(model_name, inputs);
        let replaced = self.calls.lock().insert(call_id.clone(), record);

        if replaced.is_some() {
            warn!(call_id = %call_id, "Call id reused while still in flight, replacing record");
        } else {
            debug!(call_id = %call_id, "Call started");
        }
    }

    /// Remove and return the record for a finished call.
    ///
    /// `None` is normal for calls whose start event was never seen.
    pub fn end(&self, call_id: &CallId) -> Option<CallRecord> {
        let record = self.calls.lock().remove(call_id);
        if record.is_none() {
            debug!(call_id = %call_id, "No start record for finished call");
        }
        record
    }

    /// Drop a failed call from tracking, returning its record if one existed
    pub fn fail(&self, call_id: &CallId) -> Option<CallRecord> {
        let record = self.calls.lock().remove(call_id);
        debug!(call_id = %call_id, tracked = record.is_some(), "Call failed");
        record
    }

    /// Number of calls currently in flight
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Drop records older than `max_age` whose end event never arrived.
    ///
    /// Returns how many were removed.
    pub fn sweep_expired(&self, max_age: Duration) -> usize {
        let mut calls = self.calls.lock();
        let before = calls.len();
        calls.retain(|_, record| record.age() < max_age);
        let removed = before - calls.len();
        drop(calls);

        if removed > 0 {
            warn!(
                removed = %removed,
                max_age_secs = %max_age.as_secs(),
                "Swept orphaned call records"
            );
        }
        removed
    }
}
