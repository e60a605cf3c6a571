use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::cell::{TickCell, lock};
use crate::format::SharedWriter;

/// Width assumed when the terminal refuses to report one.
const FALLBACK_COLUMNS: usize = 80;

/// One rendered progress bar line, laid out for a terminal width.
///
/// Pure layout: build one per redraw and `Display` it. The bar shrinks to
/// whatever space the `current/total` counter leaves, and never grows wider
/// than `total` cells.
///
/// ```rust,ignore
/// let frame = BarFrame::new(3, 10, 24);
/// // => [###-------] 3/10
/// ```
pub struct BarFrame {
    current: u64,
    total: u64,
    columns: usize,
    filled: char,
    empty: char,
}

impl BarFrame {
    pub fn new(current: u64, total: u64, columns: usize) -> Self {
        Self {
            current,
            total,
            columns,
            filled: '#',
            empty: '-',
        }
    }

    pub fn chars(mut self, filled: char, empty: char) -> Self {
        self.filled = filled;
        self.empty = empty;
        self
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for BarFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stat = format!(" {}/{}", self.current, self.total);
        let available = self.columns.saturating_sub(stat.len() + 3);
        let width = available.min(self.total as usize);
        let complete = (width as f64 * self.ratio()).round() as usize;
        write!(
            f,
            "[{}{}]{}",
            std::iter::repeat_n(self.filled, complete).collect::<String>(),
            std::iter::repeat_n(self.empty, width - complete).collect::<String>(),
            stat,
        )
    }
}

fn terminal_columns() -> usize {
    crossterm::terminal::size()
        .map(|(columns, _rows)| columns as usize)
        .unwrap_or(FALLBACK_COLUMNS)
}

/// Render thread behind the progress bar.
///
/// Each iteration re-queries the terminal width (it can change between
/// frames), lays out a [`BarFrame`] for the counter's current value and
/// redraws in place. [`ProgressWorker::stop`] joins the thread, so once it
/// returns no further frame can be written.
pub(crate) struct ProgressWorker {
    cell: TickCell,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ProgressWorker {
    /// Spawns the redraw loop. Fails only if the OS refuses the thread.
    pub(crate) fn spawn(
        total: u64, chars: (char, char), interval: Duration, writer: SharedWriter,
    ) -> std::io::Result<Self> {
        let cell = TickCell::default();
        let stop = Arc::new(AtomicBool::new(false));

        let loop_cell = cell.clone();
        let loop_stop = stop.clone();
        let thread = std::thread::Builder::new()
            .name("tattle-progress".into())
            .spawn(move || {
                while !loop_stop.load(Ordering::Relaxed) {
                    let frame = BarFrame::new(loop_cell.get(), total, terminal_columns())
                        .chars(chars.0, chars.1);
                    {
                        let mut w = lock(&writer);
                        let _ = write!(w, "\r{frame}");
                        let _ = w.flush();
                    }
                    std::thread::sleep(interval);
                }
            })?;

        Ok(Self {
            cell,
            stop,
            thread: Some(thread),
        })
    }

    /// The step counter shared with the tick closure.
    pub(crate) fn cell(&self) -> TickCell {
        self.cell.clone()
    }

    /// Stops the loop and waits for the thread to exit. Idempotent.
    pub(crate) fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ProgressWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
