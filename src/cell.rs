use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared label storage behind an activity spinner.
///
/// Exactly two roles exist per widget: the owning handle writes through
/// [`TextCell::set`], the render thread reads through [`TextCell::get`].
/// Cloning clones the handle, not the value.
#[derive(Clone, Default)]
pub(crate) struct TextCell(Arc<Mutex<String>>);

impl TextCell {
    pub(crate) fn set(&self, text: &str) {
        let mut label = lock(&self.0);
        label.clear();
        label.push_str(text);
    }

    pub(crate) fn get(&self) -> String {
        lock(&self.0).clone()
    }
}

/// Shared step counter behind a progress bar, starting at zero.
#[derive(Clone, Default)]
pub(crate) struct TickCell(Arc<AtomicU64>);

impl TickCell {
    /// Advances the counter by one, saturating at `total`.
    /// Ticks past the total are no-ops.
    pub(crate) fn advance(&self, total: u64) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                (current < total).then_some(current + 1)
            });
    }

    pub(crate) fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Locks a mutex, recovering the guard if a previous holder panicked.
/// The reporter must never take the host program down with it.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
