#![doc = include_str!("../README.md")]

pub(crate) mod cell;
pub(crate) mod format;
pub(crate) mod registry;
pub(crate) mod reporter;
pub(crate) mod widgets;

#[cfg(feature = "tracing")]
pub(crate) mod tracing;

#[cfg(test)]
mod test;

/// Re-exports of all public types and traits.
pub mod prelude {
    pub use crate::reporter::{
        Activity, ProgressTick, Reporter, ReporterBuilder, create_reporter,
    };
    pub use crate::widgets::{BarFrame, Frames};

    #[cfg(feature = "tracing")]
    pub use crate::tracing::{ReporterLayer, reporter_layer};
}

pub use crate::prelude::*;
