use std::sync::Arc;

use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;

use crate::Reporter;

/// A `tracing` [`Layer`] that forwards events to a [`Reporter`].
///
/// Levels map onto the reporter's categories: `TRACE` and `DEBUG` become
/// `verbose`, `INFO` becomes `info`, `WARN` becomes `warn` and `ERROR`
/// becomes `error`. Spans are ignored; only events are forwarded.
///
/// ```rust,ignore
/// use tracing_subscriber::layer::SubscriberExt;
/// use tracing_subscriber::util::SubscriberInitExt;
///
/// let report = Arc::new(create_reporter(true, false, true, false));
/// tracing_subscriber::registry()
///     .with(reporter_layer(report.clone()))
///     .init();
///
/// tracing::info!("shows up as an info line");
/// ```
pub struct ReporterLayer {
    reporter: Arc<Reporter>,
}

/// Creates a layer that forwards `tracing` events to `reporter`.
pub fn reporter_layer(reporter: Arc<Reporter>) -> ReporterLayer {
    ReporterLayer { reporter }
}

impl<S: Subscriber> Layer<S> for ReporterLayer {
    fn on_event(
        &self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        let level = *event.metadata().level();
        if level == Level::TRACE || level == Level::DEBUG {
            self.reporter.verbose(&message);
        } else if level == Level::INFO {
            self.reporter.info(&message);
        } else if level == Level::WARN {
            self.reporter.warn(&message);
        } else {
            self.reporter.error(&message);
        }
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.0 = value.to_string();
        }
    }
}
