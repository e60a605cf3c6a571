use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;

use crate::widgets::{ProgressWorker, SpinnerWorker};

/// Identifies one live spinner in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WidgetId(NonZeroUsize);

/// Atomic counter that produces unique `WidgetId`s without any locking.
#[derive(Debug)]
pub(crate) struct IdGenerator(AtomicUsize);

impl Default for IdGenerator {
    fn default() -> Self {
        Self(AtomicUsize::new(1))
    }
}

impl IdGenerator {
    pub(crate) fn next(&self) -> WidgetId {
        let id = self.0.fetch_add(1, Ordering::Relaxed);
        WidgetId(NonZeroUsize::new(id).expect("WidgetId generation overflow"))
    }
}

/// Live widgets owned by one reporter: any number of spinners, at most one
/// progress bar.
///
/// A worker leaves the registry only through its `stop`, so the registry
/// never holds a stopped widget.
pub(crate) struct WidgetRegistry {
    spinners: IndexMap<WidgetId, SpinnerWorker>,
    progress: Option<ProgressWorker>,
}

impl WidgetRegistry {
    pub(crate) fn new() -> Self {
        Self {
            spinners: IndexMap::new(),
            progress: None,
        }
    }

    pub(crate) fn insert_spinner(&mut self, id: WidgetId, worker: SpinnerWorker) {
        self.spinners.insert(id, worker);
    }

    /// Stops and removes the spinner. Unknown ids are ignored, so ending a
    /// handle twice is a no-op.
    pub(crate) fn remove_spinner(&mut self, id: WidgetId) {
        if let Some(mut worker) = self.spinners.shift_remove(&id) {
            worker.stop();
        }
    }

    /// Installs a new progress bar. Any previous worker is stopped and
    /// joined first, so two bars never draw at once.
    pub(crate) fn set_progress(&mut self, worker: ProgressWorker) {
        self.stop_progress();
        self.progress = Some(worker);
    }

    /// Stops the active progress bar. Safe to call when none is active.
    pub(crate) fn stop_progress(&mut self) {
        if let Some(mut worker) = self.progress.take() {
            worker.stop();
        }
    }

    #[cfg(test)]
    pub(crate) fn spinner_count(&self) -> usize {
        self.spinners.len()
    }

    #[cfg(test)]
    pub(crate) fn has_progress(&self) -> bool {
        self.progress.is_some()
    }
}
