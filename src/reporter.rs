use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use owo_colors::OwoColorize;

use crate::cell::{TextCell, lock};
use crate::format::{Console, SharedWriter, Stream, shared_writer};
use crate::registry::{IdGenerator, WidgetId, WidgetRegistry};
use crate::widgets::{Frames, ProgressWorker, SpinnerWorker};

/// Default redraw cadence for spinner and progress widgets.
const FRAME_INTERVAL: Duration = Duration::from_millis(60);

/// Handle on a live activity spinner.
///
/// The null variant handed out by silent reporters (or when the render
/// thread could not be spawned) accepts both calls and does nothing, so
/// callers never branch on mode.
pub trait Activity: Send {
    /// Replaces the spinner's label.
    fn tick(&self, label: &str);
    /// Stops the spinner and removes it from the reporter. Idempotent.
    fn end(&self);
}

struct SpinnerHandle {
    id: WidgetId,
    cell: TextCell,
    widgets: Arc<Mutex<WidgetRegistry>>,
}

impl Activity for SpinnerHandle {
    fn tick(&self, label: &str) {
        self.cell.set(label);
    }

    fn end(&self) {
        lock(&self.widgets).remove_spinner(self.id);
    }
}

struct NullActivity;

impl Activity for NullActivity {
    fn tick(&self, _label: &str) {}
    fn end(&self) {}
}

/// Zero-argument closure advancing the active progress bar by one step.
///
/// Ticks past the bar's total are no-ops, as is every tick on the no-op
/// closure returned for zero totals, disabled progress or silent mode.
pub type ProgressTick = Box<dyn Fn() + Send + Sync>;

/// Configures and builds a [`Reporter`].
///
/// ```rust,ignore
/// let report = Reporter::builder()
///     .verbose(false)
///     .frames(Frames::dots())
///     .build();
/// ```
pub struct ReporterBuilder {
    verbose: bool,
    silent: bool,
    emoji: bool,
    no_progress: bool,
    frames: Frames,
    interval: Duration,
    bar_chars: (char, char),
    out: Option<SharedWriter>,
    err: Option<SharedWriter>,
}

impl Default for ReporterBuilder {
    fn default() -> Self {
        Self {
            verbose: true,
            silent: false,
            emoji: true,
            no_progress: false,
            frames: Frames::default(),
            interval: FRAME_INTERVAL,
            bar_chars: ('#', '-'),
            out: None,
            err: None,
        }
    }
}

impl ReporterBuilder {
    /// Emit `verbose` lines.
    pub fn verbose(mut self, yes: bool) -> Self {
        self.verbose = yes;
        self
    }

    /// Suppress all non-forced output and hand out no-op widgets.
    pub fn silent(mut self, yes: bool) -> Self {
        self.silent = yes;
        self
    }

    /// Permit emoji decoration in the footer.
    pub fn emoji(mut self, yes: bool) -> Self {
        self.emoji = yes;
        self
    }

    /// Make [`Reporter::progress`] always return a no-op tick closure.
    pub fn no_progress(mut self, yes: bool) -> Self {
        self.no_progress = yes;
        self
    }

    /// Animation set for activity spinners.
    pub fn frames(mut self, frames: Frames) -> Self {
        self.frames = frames;
        self
    }

    /// Redraw cadence for spinner and progress widgets.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Filled and empty glyphs for the progress bar.
    pub fn bar_chars(mut self, filled: char, empty: char) -> Self {
        self.bar_chars = (filled, empty);
        self
    }

    /// Replace the standard stream (mainly for capturing output in tests).
    pub fn out(mut self, writer: impl Write + Send + 'static) -> Self {
        self.out = Some(shared_writer(writer));
        self
    }

    /// Replace the error stream.
    pub fn err(mut self, writer: impl Write + Send + 'static) -> Self {
        self.err = Some(shared_writer(writer));
        self
    }

    pub fn build(self) -> Reporter {
        let out = self.out.unwrap_or_else(|| shared_writer(std::io::stdout()));
        let err = self.err.unwrap_or_else(|| shared_writer(std::io::stderr()));
        Reporter {
            verbose: self.verbose,
            silent: self.silent,
            emoji: self.emoji,
            no_progress: self.no_progress,
            frames: self.frames,
            interval: self.interval,
            bar_chars: self.bar_chars,
            console: Console::new(out, err, self.silent),
            widgets: Arc::new(Mutex::new(WidgetRegistry::new())),
            ids: IdGenerator::default(),
            started_at: Instant::now(),
        }
    }
}

/// Console status reporter: styled category lines plus live spinner and
/// progress widgets.
///
/// All methods take `&self`; the reporter can be shared across threads
/// (e.g. behind an `Arc` for the `tracing` layer).
pub struct Reporter {
    verbose: bool,
    silent: bool,
    emoji: bool,
    no_progress: bool,
    frames: Frames,
    interval: Duration,
    bar_chars: (char, char),
    console: Console,
    widgets: Arc<Mutex<WidgetRegistry>>,
    ids: IdGenerator,
    started_at: Instant,
}

impl Reporter {
    pub fn builder() -> ReporterBuilder {
        ReporterBuilder::default()
    }

    /// Seconds since this reporter was created.
    pub fn uptime(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Plain line. Resets gutter alignment.
    pub fn log(&self, text: &str) {
        self.console.plain(text);
    }

    pub fn info(&self, text: &str) {
        self.console
            .category("info", "info".blue(), text, false, Stream::Out);
    }

    pub fn warn(&self, text: &str) {
        self.console
            .category("warning", "warning".yellow(), text, false, Stream::Out);
    }

    pub fn success(&self, text: &str) {
        self.console
            .category("success", "success".green(), text, false, Stream::Out);
    }

    /// Written to the error stream, even in silent mode.
    pub fn error(&self, text: &str) {
        self.console
            .line(&format!("{} {text}", "error".red()), true, Stream::Err);
    }

    /// Uptime-stamped line, emitted only when verbose mode is on.
    pub fn verbose(&self, text: &str) {
        if !self.verbose {
            return;
        }
        let stamped = format!("{:.4} {text}", self.uptime());
        self.console
            .category("verbose", "verbose".dimmed(), &stamped, false, Stream::Out);
    }

    /// Dimmed `$ <command>` line.
    pub fn command(&self, text: &str) {
        self.log(&format!("{}", format!("$ {text}").dimmed()));
    }

    /// Bold program banner: `name[ command][ vversion]`.
    pub fn header(&self, name: &str, command: Option<&str>, version: Option<&str>) {
        let command = command.map(|c| format!(" {c}")).unwrap_or_default();
        let version = version.map(|v| format!(" v{v}")).unwrap_or_default();
        let banner = format!("{name}{command}{version}");
        self.log(&format!("{}", banner.white().bold()));
    }

    /// Stops any active progress bar and prints the elapsed session time.
    pub fn footer(&self) {
        self.finished();
        let emoji = if self.emoji && !self.silent { "✨ " } else { "" };
        self.log(&format!("{emoji}Done in {:.4}s", self.uptime()));
    }

    /// Titled bullet list.
    pub fn list(&self, title: &str, items: &[&str]) {
        self.list_with_hints(title, items, &IndexMap::new());
    }

    /// Titled bullet list with per-item hints.
    ///
    /// Hints apply only when every item has one; any count mismatch renders
    /// a plain list with no hint lines.
    pub fn list_with_hints(&self, title: &str, items: &[&str], hints: &IndexMap<&str, &str>) {
        self.console.category(
            "list",
            "list".bright_magenta().bold(),
            title,
            false,
            Stream::Out,
        );
        let gutter = self.console.gutter();
        if hints.len() == items.len() {
            for item in items {
                self.console
                    .line(&format!("{gutter}- {}", item.bold()), false, Stream::Out);
                if let Some(hint) = hints.get(*item) {
                    self.console
                        .line(&format!(" {gutter} {}", hint.dimmed()), false, Stream::Out);
                }
            }
        } else {
            for item in items {
                self.console
                    .line(&format!("{gutter}- {item}"), false, Stream::Out);
            }
        }
    }

    /// Titled `key: value` listing in insertion order.
    pub fn map(&self, title: &str, entries: &IndexMap<&str, &str>) {
        self.console.category(
            "map",
            "map".bright_magenta().bold(),
            title,
            false,
            Stream::Out,
        );
        let gutter = self.console.gutter();
        for (key, value) in entries {
            self.console.line(
                &format!("{gutter}- {}{}", key.bold(), format!(": {value}").dimmed()),
                false,
                Stream::Out,
            );
        }
    }

    /// Starts an activity spinner and returns its handle.
    ///
    /// Silent reporters and spawn failures yield a no-op handle.
    pub fn activity(&self) -> Box<dyn Activity> {
        if self.silent {
            return Box::new(NullActivity);
        }
        match SpinnerWorker::spawn(self.frames.clone(), self.interval, self.console.out()) {
            Ok(worker) => {
                let id = self.ids.next();
                let cell = worker.cell();
                lock(&self.widgets).insert_spinner(id, worker);
                Box::new(SpinnerHandle {
                    id,
                    cell,
                    widgets: self.widgets.clone(),
                })
            }
            Err(_) => Box::new(NullActivity),
        }
    }

    /// Starts a progress bar over `total` steps and returns its tick
    /// closure.
    ///
    /// Any previous bar is stopped before the new one spawns. A zero total,
    /// a disabled progress display, a silent reporter or a spawn failure
    /// all yield a no-op closure.
    pub fn progress(&self, total: u64) -> ProgressTick {
        if self.no_progress || self.silent || total == 0 {
            return Box::new(|| {});
        }
        let mut widgets = lock(&self.widgets);
        widgets.stop_progress();
        match ProgressWorker::spawn(total, self.bar_chars, self.interval, self.console.out()) {
            Ok(worker) => {
                let cell = worker.cell();
                widgets.set_progress(worker);
                Box::new(move || cell.advance(total))
            }
            Err(_) => Box::new(|| {}),
        }
    }

    /// Stops the active progress bar, if any.
    pub fn finished(&self) {
        lock(&self.widgets).stop_progress();
    }
}

#[cfg(test)]
impl Reporter {
    pub(crate) fn spinner_count(&self) -> usize {
        lock(&self.widgets).spinner_count()
    }

    pub(crate) fn has_progress(&self) -> bool {
        lock(&self.widgets).has_progress()
    }

    pub(crate) fn category_width(&self) -> usize {
        self.console.category_width()
    }
}

/// Creates a reporter writing to the process streams.
pub fn create_reporter(verbose: bool, silent: bool, emoji: bool, no_progress: bool) -> Reporter {
    Reporter::builder()
        .verbose(verbose)
        .silent(silent)
        .emoji(emoji)
        .no_progress(no_progress)
        .build()
}
