use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::cell::lock;

/// Erases the current terminal line without moving the cursor.
const CLEAR_LINE: &str = "\x1b[2K";
/// Resets all styling at end of line.
const RESET: &str = "\x1b[0m";

/// Writer shared between the formatter and widget render threads.
///
/// Static lines and widget frames rewrite the same terminal row; the lock
/// keeps individual writes whole but imposes no ordering between them.
pub(crate) type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

pub(crate) fn shared_writer(writer: impl Write + Send + 'static) -> SharedWriter {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Which stream a line goes to.
#[derive(Clone, Copy)]
pub(crate) enum Stream {
    Out,
    Err,
}

/// Formats static log lines and tracks category gutter alignment.
pub(crate) struct Console {
    out: SharedWriter,
    err: SharedWriter,
    silent: bool,
    /// Label length of the most recent category line; 0 after a plain line.
    category_width: AtomicUsize,
}

impl Console {
    pub(crate) fn new(out: SharedWriter, err: SharedWriter, silent: bool) -> Self {
        Self {
            out,
            err,
            silent,
            category_width: AtomicUsize::new(0),
        }
    }

    /// Handle on the out stream for widget render threads.
    pub(crate) fn out(&self) -> SharedWriter {
        self.out.clone()
    }

    /// Writes one line, overwriting any widget frame on the current row.
    /// Suppressed in silent mode unless `force` is set.
    pub(crate) fn line(&self, text: &str, force: bool, stream: Stream) {
        if self.silent && !force {
            return;
        }
        let target = match stream {
            Stream::Out => &self.out,
            Stream::Err => &self.err,
        };
        let mut w = lock(target);
        let _ = writeln!(w, "\r{CLEAR_LINE}{text}{RESET}");
        let _ = w.flush();
    }

    /// Emits `<styled label> <text>` and remembers the label width so
    /// follow-up lines can align under it.
    pub(crate) fn category(
        &self, label: &str, styled: impl std::fmt::Display, text: &str, force: bool,
        stream: Stream,
    ) {
        self.category_width.store(label.len(), Ordering::Relaxed);
        self.line(&format!("{styled} {text}"), force, stream);
    }

    /// Plain line: resets the gutter before writing.
    pub(crate) fn plain(&self, text: &str) {
        self.category_width.store(0, Ordering::Relaxed);
        self.line(text, false, Stream::Out);
    }

    /// Spaces aligning follow-up lines under the last category label.
    pub(crate) fn gutter(&self) -> String {
        let width = self.category_width.load(Ordering::Relaxed).max(2);
        " ".repeat(width - 1)
    }

    #[cfg(test)]
    pub(crate) fn category_width(&self) -> usize {
        self.category_width.load(Ordering::Relaxed)
    }
}
