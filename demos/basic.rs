//! Tour of the reporter surface: styled lines, an activity spinner and a
//! progress bar, all animating while the "work" below sleeps.

use std::time::Duration;

use indexmap::IndexMap;
use tattle::prelude::*;

fn main() {
    let report = create_reporter(true, false, true, false);

    report.header("tattle", None, Some("0.2.1"));

    let config = IndexMap::from([("verbose", "true"), ("silent", "false"), ("level", "99")]);
    report.map("Config", &config);

    report.verbose("resolving manifest");
    report.verbose("lockfile is fresh");

    report.info("Please wait while I fetch something for you.");
    report.warn("It might take a little while though.");

    let spinner = report.activity();
    spinner.tick("I am on it!");
    sleep(1000);
    spinner.tick("Still busy...");
    sleep(1000);
    spinner.tick("Almost there...");
    sleep(1000);
    report.success("Done!");
    spinner.end();

    let steps = 15;
    let tick = report.progress(steps);
    report.info("Wait for it...");
    for step in 0..steps {
        tick();
        if step % 5 == 0 {
            report.warn("Interrupt.");
        }
        sleep(250);
    }
    report.finished();
    report.success("There it is!");

    report.list("My grocery list", &["bananas", "tulips", "eggs"]);

    let hints = IndexMap::from([
        ("bananas", "for baking"),
        ("tulips", "because they make you happy"),
        ("eggs", "not the cheap ones though"),
    ]);
    report.list_with_hints("My grocery list", &["bananas", "tulips", "eggs"], &hints);

    report.command("cargo run --example basic");
    report.footer();
}

fn sleep(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
