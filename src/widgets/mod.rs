//! Live terminal widgets and their render loops.
//!
//! # Spinner frames
//!
//! [`Frames`] cycles through an animation set on each [`tick`](Frames::tick):
//!
//! ```rust,ignore
//! let mut frames = Frames::dots(); // ⠋ ⠙ ⠹ ...
//! frames.tick();
//! write!(w, "{} working...", frames.frame())?;
//!
//! // Other presets:
//! let f = Frames::line();  // | / - \
//! let f = Frames::arrow(); // ← ↖ ↑ ↗ → ↘ ↓ ↙
//!
//! // Custom frames:
//! let f = Frames::custom(&["🌑", "🌒", "🌓", "🌔", "🌕"]);
//! ```
//!
//! # Progress bar frames
//!
//! [`BarFrame`] lays out one width-adapted bar line:
//!
//! ```rust,ignore
//! let frame = BarFrame::new(3, 10, 24);
//! write!(w, "\r{frame}")?;
//! // => [###-------] 3/10
//! ```
//!
//! The workers behind [`crate::Reporter::activity`] and
//! [`crate::Reporter::progress`] drive these on dedicated render threads.

mod progress;
mod spinner;

pub use progress::*;
pub use spinner::*;
