//! Colorful console output for optimizer runs.
//!
//! Provides a `tracing` layer that turns the solver's structured events into
//! readable, colored lines. Enabled with the `console` feature.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "seatplan_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times; only the first call has effect. `RUST_LOG`
/// overrides the default `seatplan_solver=info` filter. Does nothing if
/// another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SeatingConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let banner = r#"
  ___  ___  __ _| |_ _ __ | | __ _ _ __
 / __|/ _ \/ _` | __| '_ \| |/ _` | '_ \
 \__ \  __/ (_| | |_| |_) | | (_| | | | |
 |___/\___|\__,_|\__| .__/|_|\__,_|_| |_|
                    |_|
"#;

    let version_line = format!(
        "              v{} - Seating Chart Engine\n",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SeatingConsoleLayer;

impl<S: Subscriber> Layer<S> for SeatingConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("seatplan_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_solver_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    score: Option<String>,
    termination: Option<String>,
    reason: Option<String>,
    constraint_id: Option<String>,
    job_id: Option<String>,
    guest_count: Option<u64>,
    table_count: Option<u64>,
    constraint_count: Option<u64>,
    seed: Option<u64>,
    steps: Option<u64>,
    moves_evaluated: Option<u64>,
    improvements: Option<u64>,
    duration_ms: Option<u64>,
    speed: Option<u64>,
    runs: Option<u64>,
    best_seed: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "event" => &mut self.event,
            "score" => &mut self.score,
            "termination" => &mut self.termination,
            "reason" => &mut self.reason,
            "constraint_id" => &mut self.constraint_id,
            "job_id" => &mut self.job_id,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "guest_count" => &mut self.guest_count,
            "table_count" => &mut self.table_count,
            "constraint_count" => &mut self.constraint_count,
            "seed" => &mut self.seed,
            "steps" => &mut self.steps,
            "moves_evaluated" => &mut self.moves_evaluated,
            "improvements" => &mut self.improvements,
            "duration_ms" => &mut self.duration_ms,
            "speed" => &mut self.speed,
            "runs" => &mut self.runs,
            "best_seed" => &mut self.best_seed,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

fn format_solver_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "progress" => format_progress(v),
        "solve_end" => format_solve_end(v),
        "parallel_end" => format_parallel_end(v),
        "constraint_rejected" | "seed_discarded" => format_warning(v),
        _ => String::new(),
    }
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} guest count ({}), table count ({}), constraint count ({}), seed ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        count(v.guest_count).bright_yellow(),
        count(v.table_count).bright_yellow(),
        count(v.constraint_count).bright_yellow(),
        v.seed.unwrap_or(0).bright_magenta()
    )
}

fn format_progress(v: &EventVisitor) -> String {
    format!(
        "    {} Step {:>9} | {}/sec | best {}",
        "->".bright_blue(),
        count(v.steps).white(),
        count(v.speed).bright_magenta(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_warning(v: &EventVisitor) -> String {
    let subject = match (&v.event, &v.constraint_id) {
        (_, Some(id)) => format!("constraint {id}"),
        (Some(event), None) if event == "seed_discarded" => "initial assignment".to_string(),
        _ => "input".to_string(),
    };
    format!(
        "{} {} {} {} ignored: {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        "[Optimizer]".bright_cyan(),
        subject.white().bold(),
        v.reason.as_deref().unwrap_or("unknown reason")
    )
}

fn format_parallel_end(v: &EventVisitor) -> String {
    format!(
        "{} {} {} best of {} runs: seed ({}), score ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Parallel]".bright_cyan(),
        count(v.runs).bright_yellow(),
        v.best_seed.unwrap_or(0).bright_magenta(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let termination = v.termination.as_deref().unwrap_or("unknown");
    let penalty_free = parse_score(score).is_some_and(|(_, penalty)| penalty == 0.0);

    let mut output = format!(
        "{} {} {} Optimization ended ({}): time spent ({}), best score ({}), steps ({}), moves evaluated ({}), improvements ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        termination.white().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_score(score),
        count(v.steps).white(),
        count(v.moves_evaluated).white(),
        count(v.improvements).white()
    );

    output.push_str("\n\n");
    output.push_str(&"╔══════════════════════════════════════════════════════════╗".bright_cyan().to_string());
    output.push('\n');

    let status_text = if penalty_free {
        "EVERY SEATING RULE MET"
    } else {
        "SOME SEATING RULES BROKEN"
    };
    let status_colored = if penalty_free {
        format!("  {}  ", status_text).bright_green().bold().to_string()
    } else {
        format!("  {}  ", status_text).bright_red().bold().to_string()
    };
    let status_padding = 56 - status_text.len() - 4;
    let left_pad = status_padding / 2;
    let right_pad = status_padding - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(&"╠══════════════════════════════════════════════════════════╣".bright_cyan().to_string());
    output.push('\n');

    output.push_str(&format!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        "Final Score:",
        score,
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(&"╚══════════════════════════════════════════════════════════╝".bright_cyan().to_string());
    output.push('\n');

    output
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
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

// Splits "38affinity/10penalty" into its two parts.
fn parse_score(score: &str) -> Option<(f64, f64)> {
    let (affinity, penalty) = score.split_once('/')?;
    let affinity = affinity.strip_suffix("affinity")?.parse().ok()?;
    let penalty = penalty.strip_suffix("penalty")?.parse().ok()?;
    Some((affinity, penalty))
}

fn format_score(score: &str) -> String {
    let Some((affinity, penalty)) = parse_score(score) else {
        return score.white().to_string();
    };

    let affinity_str = if affinity < 0.0 {
        format!("{}affinity", affinity).yellow().to_string()
    } else if affinity > 0.0 {
        format!("{}affinity", affinity).bright_green().to_string()
    } else {
        format!("{}affinity", affinity).white().to_string()
    };

    let penalty_str = if penalty > 0.0 {
        format!("{}penalty", penalty).bright_red().to_string()
    } else {
        format!("{}penalty", penalty).bright_green().to_string()
    };

    format!("{}/{}", affinity_str, penalty_str)
}

#[cfg(test)]
mod tests {
    use seatplan_core::SeatingScore;

    use super::*;

    #[test]
    fn test_parse_score_reads_display_form() {
        let shown = SeatingScore::of(38.0, 10.5).to_string();
        assert_eq!(parse_score(&shown), Some((38.0, 10.5)));
        assert_eq!(parse_score("-4affinity/0penalty"), Some((-4.0, 0.0)));
        assert_eq!(parse_score("N/A"), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_print_nothing() {
        let visitor = EventVisitor {
            event: Some("step".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_solver_event(&visitor).is_empty());
    }

    #[test]
    fn test_rejected_constraint_names_it() {
        let visitor = EventVisitor {
            event: Some("constraint_rejected".to_string()),
            constraint_id: Some("feud".to_string()),
            reason: Some("empty guest set".to_string()),
            ..EventVisitor::default()
        };
        let line = format_warning(&visitor);
        assert!(line.contains("feud"));
        assert!(line.contains("empty guest set"));
    }
}
