//! Per-session state that survives webview re-renders but not restarts

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::canvas::PenSettings;
use crate::models::AnalysisRecord;

#[derive(Default)]
pub struct SessionState {
    last_result: Mutex<Option<AnalysisRecord>>,
    pen: Mutex<PenSettings>,
    analyzing: AtomicBool,
}

/// Held for the duration of one analysis; clears the busy flag on drop.
pub struct AnalysisGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl SessionState {
    pub fn last_result(&self) -> Option<AnalysisRecord> {
        self.last_result
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Only successful analyses land here.
    pub fn store_result(&self, record: AnalysisRecord) {
        *self
            .last_result
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(record);
    }

    pub fn pen(&self) -> PenSettings {
        self.pen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_pen(&self, pen: PenSettings) {
        *self.pen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = pen;
    }

    /// Returns `None` while another analysis is still running.
    pub fn begin_analysis(&self) -> Option<AnalysisGuard<'_>> {
        self.analyzing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| AnalysisGuard {
                flag: &self.analyzing,
            })
    }
}
