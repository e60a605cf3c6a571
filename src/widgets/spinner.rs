use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::cell::{TextCell, lock};
use crate::format::SharedWriter;

const ORBIT: &[&str] = &["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"];
const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const LINE: &[&str] = &["|", "/", "-", "\\"];
const ARROW: &[&str] = &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"];
const EARTH: &[&str] = &["🌍", "🌎", "🌏"];

/// A frame-based spinner animation.
///
/// The sequence is fixed at construction; [`Frames::tick`] advances the
/// index cyclically and [`Frames::frame`] returns the current glyph.
///
/// ```rust,ignore
/// let mut frames = Frames::dots();
/// write!(w, "\r{} {}", frames.frame(), label)?;
/// frames.tick();
/// ```
#[derive(Clone)]
pub struct Frames {
    frames: &'static [&'static str],
    index: usize,
}

impl Frames {
    /// Single braille dot orbiting clockwise (the default).
    pub fn orbit() -> Self {
        Self::custom(ORBIT)
    }

    /// Braille dot spinner (the most common choice).
    pub fn dots() -> Self {
        Self::custom(DOTS)
    }

    /// Classic line spinner.
    pub fn line() -> Self {
        Self::custom(LINE)
    }

    /// Arrow spinner.
    pub fn arrow() -> Self {
        Self::custom(ARROW)
    }

    /// Spinning globe.
    pub fn earth() -> Self {
        Self::custom(EARTH)
    }

    /// Custom frames. An empty sequence cannot animate and falls back to
    /// [`Frames::orbit`].
    pub fn custom(frames: &'static [&'static str]) -> Self {
        let frames = if frames.is_empty() { ORBIT } else { frames };
        Self { frames, index: 0 }
    }

    /// Advance to the next frame.
    pub fn tick(&mut self) {
        self.index = (self.index + 1) % self.frames.len();
    }

    /// Current frame string.
    pub fn frame(&self) -> &'static str {
        self.frames[self.index]
    }

    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: the sequence is never empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for Frames {
    fn default() -> Self {
        Self::orbit()
    }
}

impl std::fmt::Display for Frames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.frame())
    }
}

/// Render thread behind one activity spinner.
///
/// The loop redraws `\r<frame> <label>` at a fixed cadence, reading the
/// label from the shared cell each iteration. [`SpinnerWorker::stop`] flips
/// the stop flag and joins the thread, so once it returns no further frame
/// can be written.
pub(crate) struct SpinnerWorker {
    cell: TextCell,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SpinnerWorker {
    /// Spawns the redraw loop. Fails only if the OS refuses the thread.
    pub(crate) fn spawn(
        mut frames: Frames, interval: Duration, writer: SharedWriter,
    ) -> std::io::Result<Self> {
        let cell = TextCell::default();
        let stop = Arc::new(AtomicBool::new(false));

        let loop_cell = cell.clone();
        let loop_stop = stop.clone();
        let thread = std::thread::Builder::new()
            .name("tattle-spinner".into())
            .spawn(move || {
                while !loop_stop.load(Ordering::Relaxed) {
                    let label = loop_cell.get();
                    {
                        let mut w = lock(&writer);
                        // A dropped frame beats a panicking render thread.
                        let _ = write!(w, "\r{} {}", frames.frame(), label);
                        let _ = w.flush();
                    }
                    frames.tick();
                    std::thread::sleep(interval);
                }
            })?;

        Ok(Self {
            cell,
            stop,
            thread: Some(thread),
        })
    }

    /// The label cell shared with the owning handle.
    pub(crate) fn cell(&self) -> TextCell {
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

impl Drop for SpinnerWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
