//! Colorful console output for search progress, and result reports.
//!
//! Provides a custom `tracing` layer that formats search events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (search/level start and end)
//! - **DEBUG**: One line per expanded seed
//! - **TRACE**: Candidates the evaluator could not score

pub mod report;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use report::{render_csv, render_regression_rows, render_report};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SEARCH_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::builder()
            .with_default_directive(directive("subgroupforge_search=info"))
            .from_env_lossy();
        for extra in ["subgroupforge=info", "subgroupforge_core=warn"] {
            filter = filter.add_directive(directive(extra));
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SearchConsoleLayer)
            .try_init();
    });
}

fn directive(text: &str) -> Directive {
    text.parse().unwrap_or_else(|_| LevelFilter::INFO.into())
}

fn mark_search_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SEARCH_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SEARCH_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____        _                               _____
/ ___| _   _| |__   __ _ _ __ ___  _   _ _ __|  ___|__  _ __ __ _  ___
\___ \| | | | '_ \ / _` | '__/ _ \| | | | '_ \ |_ / _ \| '__/ _` |/ _ \
 ___) | |_| | |_) | (_| | | | (_) | |_| | |_) |  _| (_) | | | (_| |  __/
|____/ \__,_|_.__/ \__, |_|  \___/ \__,_| .__/|_|  \___/|_|  \__, |\___|
                   |___/                |_|                  |___/
"#;

    let version_line = format!("                        v{VERSION} - Beam Search Subgroup Discovery\n");

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats search events with colors.
pub struct SearchConsoleLayer;

impl<S: Subscriber> Layer<S> for SearchConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("subgroupforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    refinement: Option<String>,
    evaluator: Option<String>,
    seed: Option<String>,
    group: Option<String>,
    attribute: Option<String>,
    relation: Option<String>,
    best_quality: Option<String>,
    depth: Option<u64>,
    width: Option<u64>,
    constraints: Option<u64>,
    threads: Option<u64>,
    level: Option<u64>,
    candidates: Option<u64>,
    children: Option<u64>,
    generated: Option<u64>,
    accepted: Option<u64>,
    beam: Option<u64>,
    evaluated: Option<u64>,
    levels: Option<u64>,
    results: Option<u64>,
    coverage: Option<u64>,
    attributes: Option<u64>,
    rows: Option<u64>,
    duration_ms: Option<u64>,
    quality_floor: Option<f64>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "seed" => self.seed = Some(s),
            "group" => self.group = Some(s),
            "best_quality" => self.best_quality = Some(s),
            "attribute" => self.attribute = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "depth" => self.depth = Some(value),
            "width" => self.width = Some(value),
            "constraints" => self.constraints = Some(value),
            "threads" => self.threads = Some(value),
            "level" => self.level = Some(value),
            "candidates" => self.candidates = Some(value),
            "children" => self.children = Some(value),
            "generated" => self.generated = Some(value),
            "accepted" => self.accepted = Some(value),
            "beam" => self.beam = Some(value),
            "evaluated" => self.evaluated = Some(value),
            "levels" => self.levels = Some(value),
            "results" => self.results = Some(value),
            "coverage" => self.coverage = Some(value),
            "attributes" => self.attributes = Some(value),
            "rows" => self.rows = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "quality_floor" {
            self.quality_floor = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "refinement" => self.refinement = Some(value.to_string()),
            "evaluator" => self.evaluator = Some(value.to_string()),
            "attribute" => self.attribute = Some(value.to_string()),
            "relation" => self.relation = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "search_start" => format_search_start(v),
        "search_end" => format_search_end(v),
        "level_start" => format_level_start(v),
        "level_end" => format_level_end(v),
        "seed_expanded" => format_seed_expanded(v),
        "degenerate_candidate" => format_degenerate(v, level),
        "target_fallback" => format_target_fallback(v),
        "dataset_loaded" => format_dataset_loaded(v),
        "blacklist_unknown" => format_blacklist_unknown(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_search_start(v: &EventVisitor) -> String {
    mark_search_start();
    format!(
        "{} {} Searching │ depth {} │ width {} │ {} constraints │ {} ({}) │ {} refinement │ {} threads",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.depth).bright_yellow(),
        count(v.width).bright_yellow(),
        count(v.constraints).bright_yellow(),
        v.evaluator.as_deref().unwrap_or("?").white().bold(),
        format!("> {}", v.quality_floor.unwrap_or(0.0)).bright_black(),
        v.refinement.as_deref().unwrap_or("?").white(),
        count(v.threads).bright_yellow(),
    )
}

fn format_search_end(v: &EventVisitor) -> String {
    let status = if v.terminated_early.unwrap_or(false) {
        "TERMINATED EARLY".bright_yellow().bold().to_string()
    } else {
        "COMPLETE".bright_green().bold().to_string()
    };
    format!(
        "{} {} Search finished │ {} │ {} levels │ {} evaluated │ {} subgroups │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.levels).white(),
        count(v.evaluated).bright_magenta().bold(),
        count(v.results).bright_yellow(),
        status,
    )
}

fn format_level_start(v: &EventVisitor) -> String {
    format!(
        "{} {} Level {} started │ {} seeds",
        format_elapsed(),
        "▶".bright_blue(),
        count(v.level).white().bold(),
        count(v.candidates).white(),
    )
}

fn format_level_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Level {} ended │ {} │ {} generated │ {} accepted │ beam {} │ best {}",
        format_elapsed(),
        "◀".bright_blue(),
        count(v.level).white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.generated).white(),
        count(v.accepted).bright_magenta().bold(),
        count(v.beam).white(),
        format_best(v.best_quality.as_deref()),
    )
}

fn format_seed_expanded(v: &EventVisitor) -> String {
    format!(
        "{} {} {:>8} children │ {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        count(v.children).white(),
        v.seed.as_deref().unwrap_or("(all)").bright_black(),
    )
}

fn format_degenerate(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }
    format!(
        "{} {} {} │ coverage {}",
        format_elapsed(),
        "✗".bright_red(),
        v.group.as_deref().unwrap_or("?").bright_black(),
        count(v.coverage).bright_black(),
    )
}

fn format_target_fallback(v: &EventVisitor) -> String {
    format!(
        "{} {} No target attribute given, using {}",
        format_elapsed(),
        "!".bright_yellow().bold(),
        v.attribute.as_deref().unwrap_or("?").white().bold(),
    )
}

fn format_dataset_loaded(v: &EventVisitor) -> String {
    format!(
        "{} {} Loaded {} │ {} attributes │ {} rows",
        format_elapsed(),
        "◆".bright_cyan(),
        v.relation.as_deref().unwrap_or("?").white().bold(),
        count(v.attributes).bright_yellow(),
        count(v.rows).bright_yellow(),
    )
}

fn format_blacklist_unknown(v: &EventVisitor) -> String {
    format!(
        "{} {} Blacklisted attribute {} is not in the dataset",
        format_elapsed(),
        "!".bright_yellow().bold(),
        v.attribute.as_deref().unwrap_or("?").white().bold(),
    )
}

// `best_quality` arrives as the Debug form of an `Option<f64>`.
fn format_best(best: Option<&str>) -> String {
    match best
        .and_then(|s| s.strip_prefix("Some(")?.strip_suffix(')'))
        .and_then(|s| s.parse::<f64>().ok())
    {
        Some(q) => format!("{q:.6}").bright_green().to_string(),
        None => "-".white().to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("catalog_attribute".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor, Level::DEBUG).is_empty());
    }

    #[test]
    fn test_degenerate_only_at_trace() {
        let visitor = EventVisitor {
            event: Some("degenerate_candidate".to_string()),
            group: Some("x >= 6.0".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor, Level::DEBUG).is_empty());
        assert!(format_event(&visitor, Level::TRACE).contains("x >= 6.0"));
    }

    #[test]
    fn test_level_end_mentions_counts() {
        let visitor = EventVisitor {
            event: Some("level_end".to_string()),
            level: Some(2),
            generated: Some(12_345),
            best_quality: Some("Some(0.25)".to_string()),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor, Level::INFO);
        assert!(line.contains("12,345"));
        assert!(line.contains("0.250000"));
    }

    #[test]
    fn test_dataset_loaded() {
        let visitor = EventVisitor {
            event: Some("dataset_loaded".to_string()),
            relation: Some("customers".to_string()),
            attributes: Some(5),
            rows: Some(1_200),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor, Level::INFO);
        assert!(line.contains("customers"));
        assert!(line.contains("1,200"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
