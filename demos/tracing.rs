//! Forwarding `tracing` events through the reporter's category lines.

use std::sync::Arc;

use tattle::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let report = Arc::new(create_reporter(true, false, true, false));

    tracing_subscriber::registry()
        .with(reporter_layer(report.clone()))
        .init();

    tracing::info!("resolving dependencies for my-project v0.1.0");
    tracing::debug!("cache hit for serde v1.0.217");
    tracing::warn!("registry mirror is slow, falling back");
    tracing::error!("failed to fetch left-pad: not found");

    let spinner = report.activity();
    spinner.tick("compiling my-project");
    std::thread::sleep(std::time::Duration::from_millis(1500));
    spinner.end();

    report.success("build finished");
    report.footer();
}
