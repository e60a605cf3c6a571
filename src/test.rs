use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::cell::TickCell;
use crate::reporter::{Reporter, ReporterBuilder};
use crate::widgets::{BarFrame, Frames};

/// In-memory stream shared with widget render threads.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    fn byte_len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Drops CSI escape sequences so assertions see plain text.
fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        }
    }
    out
}

struct TestEnv {
    out: Capture,
    err: Capture,
    reporter: Reporter,
}

impl TestEnv {
    fn new(configure: impl FnOnce(ReporterBuilder) -> ReporterBuilder) -> Self {
        let out = Capture::default();
        let err = Capture::default();
        let builder = Reporter::builder()
            .interval(Duration::from_millis(5))
            .out(out.clone())
            .err(err.clone());
        let reporter = configure(builder).build();
        Self { out, err, reporter }
    }

    /// Stdout lines with escape codes and the leading `\r` removed.
    fn lines(&self) -> Vec<String> {
        strip_ansi(&self.out.contents())
            .lines()
            .map(|line| line.trim_start_matches('\r').to_string())
            .collect()
    }

    fn wait_for(&self, needle: &str) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.out.contents().contains(needle) {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!(
            "timed out waiting for {needle:?} in {:?}",
            self.out.contents()
        );
    }
}

// -- Shared cells ------------------------------------------------------------

#[test]
fn test_tick_clamps_at_total() {
    let cell = TickCell::default();
    for _ in 0..3 {
        cell.advance(3);
    }
    assert_eq!(cell.get(), 3);
    cell.advance(3);
    assert_eq!(cell.get(), 3);
}

// -- Frames ------------------------------------------------------------------

#[test]
fn test_frames_cycle() {
    let mut frames = Frames::dots();
    let first = frames.frame();
    for _ in 0..frames.len() {
        frames.tick();
    }
    assert_eq!(frames.frame(), first);
}

#[test]
fn test_empty_custom_frames_fall_back() {
    let frames = Frames::custom(&[]);
    assert!(!frames.is_empty());
    assert_eq!(frames.frame(), Frames::orbit().frame());
}

// -- Bar layout --------------------------------------------------------------

#[test]
fn test_bar_frame_layout() {
    assert_eq!(BarFrame::new(5, 10, 20).to_string(), "[#####-----] 5/10");
    assert_eq!(BarFrame::new(0, 10, 20).to_string(), "[----------] 0/10");
    assert_eq!(BarFrame::new(10, 10, 20).to_string(), "[##########] 10/10");
}

#[test]
fn test_bar_frame_shrinks_to_narrow_terminal() {
    // " 5/10" takes 5 columns, brackets and margin take 3 more.
    assert_eq!(BarFrame::new(5, 10, 10).to_string(), "[#-] 5/10");
}

#[test]
fn test_bar_frame_survives_zero_width() {
    assert_eq!(BarFrame::new(0, 10, 0).to_string(), "[] 0/10");
}

#[test]
fn test_bar_frame_clamps_overfull_ratio() {
    assert_eq!(BarFrame::new(20, 10, 20).to_string(), "[##########] 20/10");
}

#[test]
fn test_bar_frame_custom_chars() {
    assert_eq!(
        BarFrame::new(5, 10, 20).chars('█', '░').to_string(),
        "[█████░░░░░] 5/10"
    );
}

// -- Formatter ---------------------------------------------------------------

#[test]
fn test_category_lines_and_gutter() {
    let env = TestEnv::new(|b| b);
    env.reporter.info("fetching");
    assert_eq!(env.reporter.category_width(), 4);
    env.reporter.warn("slow mirror");
    assert_eq!(env.reporter.category_width(), 7);
    env.reporter.log("plain");
    assert_eq!(env.reporter.category_width(), 0);

    let lines = env.lines();
    assert_eq!(lines[0], "info fetching");
    assert_eq!(lines[1], "warning slow mirror");
    assert_eq!(lines[2], "plain");
}

#[test]
fn test_list_without_hints() {
    let env = TestEnv::new(|b| b);
    env.reporter.list("groceries", &["bananas", "tulips"]);
    let lines = env.lines();
    // "list" is 4 wide, so bullets sit under a 3-space gutter.
    assert_eq!(lines, vec!["list groceries", "   - bananas", "   - tulips"]);
}

#[test]
fn test_list_hints_full_coverage() {
    let env = TestEnv::new(|b| b);
    let hints = IndexMap::from([("bananas", "for baking"), ("tulips", "they make you happy")]);
    env.reporter
        .list_with_hints("groceries", &["bananas", "tulips"], &hints);
    let lines = env.lines();
    assert_eq!(
        lines,
        vec![
            "list groceries",
            "   - bananas",
            "     for baking",
            "   - tulips",
            "     they make you happy",
        ]
    );
}

#[test]
fn test_list_hints_mismatch_renders_none() {
    let env = TestEnv::new(|b| b);
    let hints = IndexMap::from([("bananas", "for baking")]);
    env.reporter
        .list_with_hints("groceries", &["bananas", "tulips"], &hints);
    assert_eq!(env.lines().len(), 3);
    assert!(!env.out.contents().contains("for baking"));
}

#[test]
fn test_map_renders_pairs_in_order() {
    let env = TestEnv::new(|b| b);
    let entries = IndexMap::from([("verbose", "true"), ("level", "99")]);
    env.reporter.map("Config", &entries);
    let lines = env.lines();
    // "map" is 3 wide, so entries sit under a 2-space gutter.
    assert_eq!(
        lines,
        vec!["map Config", "  - verbose: true", "  - level: 99"]
    );
}

#[test]
fn test_command_is_plain_and_resets_gutter() {
    let env = TestEnv::new(|b| b);
    env.reporter.info("x");
    env.reporter.command("cargo build");
    assert_eq!(env.reporter.category_width(), 0);
    assert_eq!(env.lines()[1], "$ cargo build");
}

#[test]
fn test_header_formats_optional_parts() {
    let env = TestEnv::new(|b| b);
    env.reporter.header("fetch", Some("install"), Some("1.2.3"));
    env.reporter.header("fetch", None, None);
    let lines = env.lines();
    assert_eq!(lines[0], "fetch install v1.2.3");
    assert_eq!(lines[1], "fetch");
}

#[test]
fn test_footer_reports_uptime() {
    let env = TestEnv::new(|b| b.emoji(true));
    env.reporter.footer();
    let lines = env.lines();
    assert!(lines[0].starts_with("✨ Done in "));
    assert!(lines[0].ends_with('s'));

    let env = TestEnv::new(|b| b.emoji(false));
    env.reporter.footer();
    assert!(env.lines()[0].starts_with("Done in "));
}

#[test]
fn test_verbose_gated_by_flag() {
    let env = TestEnv::new(|b| b.verbose(false));
    env.reporter.verbose("hidden");
    assert!(env.out.contents().is_empty());

    let env = TestEnv::new(|b| b.verbose(true));
    env.reporter.verbose("shown");
    let line = env.lines()[0].clone();
    assert!(line.starts_with("verbose "));
    assert!(line.ends_with(" shown"));
}

#[test]
fn test_error_goes_to_error_stream() {
    let env = TestEnv::new(|b| b);
    env.reporter.error("boom");
    assert!(env.out.contents().is_empty());
    assert_eq!(strip_ansi(&env.err.contents()).trim(), "error boom");
}

// -- Silent mode -------------------------------------------------------------

#[test]
fn test_silent_suppresses_everything_but_errors() {
    let env = TestEnv::new(|b| b.silent(true));
    env.reporter.log("plain");
    env.reporter.info("info");
    env.reporter.warn("warn");
    env.reporter.success("ok");
    env.reporter.list("t", &["a"]);
    env.reporter.map("t", &IndexMap::from([("k", "v")]));
    env.reporter.footer();
    assert!(env.out.contents().is_empty());

    env.reporter.error("boom");
    assert!(env.err.contents().contains("boom"));
}

#[test]
fn test_silent_widgets_are_noops() {
    let env = TestEnv::new(|b| b.silent(true));
    let spinner = env.reporter.activity();
    spinner.tick("ignored");
    spinner.end();
    assert_eq!(env.reporter.spinner_count(), 0);

    let tick = env.reporter.progress(5);
    tick();
    assert!(!env.reporter.has_progress());
    assert!(env.out.contents().is_empty());
}

// -- Widgets -----------------------------------------------------------------

#[test]
fn test_spinner_draws_frame_and_label() {
    let env = TestEnv::new(|b| b.frames(Frames::line()));
    let spinner = env.reporter.activity();
    spinner.tick("compiling");
    env.wait_for(" compiling");
    assert!(env.out.contents().contains('\r'));
    spinner.end();
}

#[test]
fn test_activity_end_removes_spinner_and_stops_redraws() {
    let env = TestEnv::new(|b| b);
    let spinner = env.reporter.activity();
    assert_eq!(env.reporter.spinner_count(), 1);
    spinner.tick("busy");
    env.wait_for(" busy");

    spinner.end();
    assert_eq!(env.reporter.spinner_count(), 0);

    // stop() joins the render thread, so output is frozen from here on.
    let frozen = env.out.byte_len();
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(env.out.byte_len(), frozen);
}

#[test]
fn test_activity_end_twice_is_noop() {
    let env = TestEnv::new(|b| b);
    let spinner = env.reporter.activity();
    spinner.end();
    spinner.end();
    assert_eq!(env.reporter.spinner_count(), 0);
}

#[test]
fn test_concurrent_spinners_register_independently() {
    let env = TestEnv::new(|b| b);
    let first = env.reporter.activity();
    let second = env.reporter.activity();
    assert_eq!(env.reporter.spinner_count(), 2);
    first.end();
    assert_eq!(env.reporter.spinner_count(), 1);
    second.end();
    assert_eq!(env.reporter.spinner_count(), 0);
}

#[test]
fn test_progress_draws_counter() {
    let env = TestEnv::new(|b| b);
    let tick = env.reporter.progress(10);
    env.wait_for("/10");
    tick();
    tick();
    env.wait_for(" 2/10");
    env.reporter.finished();
    assert!(!env.reporter.has_progress());
}

#[test]
fn test_zero_total_progress_is_noop() {
    let env = TestEnv::new(|b| b);
    let tick = env.reporter.progress(0);
    tick();
    tick();
    assert!(!env.reporter.has_progress());
    assert!(env.out.contents().is_empty());
}

#[test]
fn test_no_progress_flag_disables_bar() {
    let env = TestEnv::new(|b| b.no_progress(true));
    let tick = env.reporter.progress(5);
    tick();
    assert!(!env.reporter.has_progress());
}

#[test]
fn test_progress_replaces_previous_bar() {
    let env = TestEnv::new(|b| b);
    let _first = env.reporter.progress(5);
    assert!(env.reporter.has_progress());
    let _second = env.reporter.progress(7);
    assert!(env.reporter.has_progress());
    env.wait_for("/7");
    env.reporter.finished();
    assert!(!env.reporter.has_progress());
}

#[test]
fn test_finished_without_bar_is_noop() {
    let env = TestEnv::new(|b| b);
    env.reporter.finished();
    env.reporter.finished();
    assert!(!env.reporter.has_progress());
}

// -- Tracing bridge ----------------------------------------------------------

#[cfg(feature = "tracing")]
#[test]
fn test_tracing_layer_routes_levels() {
    use tracing_subscriber::layer::SubscriberExt;

    use crate::tracing::reporter_layer;

    let out = Capture::default();
    let err = Capture::default();
    let reporter = Arc::new(
        Reporter::builder()
            .verbose(true)
            .out(out.clone())
            .err(err.clone())
            .build(),
    );

    let subscriber = tracing_subscriber::registry().with(reporter_layer(reporter.clone()));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("routed info");
        tracing::warn!("routed warn");
        tracing::debug!("routed debug");
        tracing::error!("routed error");
    });

    let text = strip_ansi(&out.contents());
    assert!(text.contains("info routed info"));
    assert!(text.contains("warning routed warn"));
    assert!(text.contains("routed debug"));
    assert!(strip_ansi(&err.contents()).contains("error routed error"));
}
