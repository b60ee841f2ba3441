//! Suite reporting.
//!
//! The runner only talks to the [`Reporter`] trait, so output formats are interchangeable:
//! [`ConsoleReporter`] prints a pytest-style progress line and summary, [`JsonReporter`] writes one JSON
//! object per event.

use std::io::{self, Write};

use serde_json::json;

use super::Scenario;
use super::runner::{ScenarioResult, SuiteSummary};

// ============================================================================
// Reporter trait
// ============================================================================

/// Receives suite progress events.
pub trait Reporter {
    /// Called once the filter has been applied.
    fn on_collection_complete(&mut self, scenario_count: usize);

    fn on_scenario_start(&mut self, _scenario: &Scenario) {}

    fn on_scenario_complete(&mut self, scenario: &Scenario, result: &ScenarioResult);

    fn on_run_complete(&mut self, summary: &SuiteSummary);
}

// ============================================================================
// Console
// ============================================================================

/// Default console reporter (pytest-style), writing to stderr.
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn on_collection_complete(&mut self, scenario_count: usize) {
        if scenario_count == 0 {
            eprintln!("No scenarios collected");
            return;
        }
        eprintln!("\x1b[1m=================== scenario session starts ===================\x1b[0m");
        eprintln!("collected {} scenario(s)", scenario_count);
        eprintln!();
    }

    fn on_scenario_start(&mut self, scenario: &Scenario) {
        if self.verbose {
            eprint!("{} [{}] ... ", scenario.name, scenario.fixture);
        }
    }

    fn on_scenario_complete(&mut self, scenario: &Scenario, result: &ScenarioResult) {
        let status = match result {
            ScenarioResult::Passed(d) if self.verbose => format!("\x1b[32mPASSED\x1b[0m ({}ms)", d.as_millis()),
            ScenarioResult::Passed(_) => "\x1b[32m.\x1b[0m".to_string(),
            ScenarioResult::Failed(d, _) if self.verbose => format!("\x1b[31mFAILED\x1b[0m ({}ms)", d.as_millis()),
            ScenarioResult::Failed(..) => "\x1b[31mF\x1b[0m".to_string(),
            ScenarioResult::Skipped(reason) if self.verbose => format!("\x1b[33mSKIPPED\x1b[0m ({})", reason),
            ScenarioResult::Skipped(_) => "\x1b[33ms\x1b[0m".to_string(),
            ScenarioResult::ExpectedFailure(d) if self.verbose => {
                format!("\x1b[32mFAILED AS EXPECTED\x1b[0m ({}ms)", d.as_millis())
            }
            ScenarioResult::ExpectedFailure(_) => "\x1b[32mx\x1b[0m".to_string(),
        };

        if self.verbose {
            eprintln!("{}", status);
        } else {
            eprint!("{}", status);
        }

        if let ScenarioResult::Failed(_, error) = result {
            eprintln!("\n\x1b[1m___________ {} ___________\x1b[0m", scenario.name);
            eprintln!("{}", error);
        }
    }

    fn on_run_complete(&mut self, summary: &SuiteSummary) {
        if !self.verbose {
            eprintln!();
        }
        eprintln!();
        let color = if summary.success() { "\x1b[1;32m" } else { "\x1b[1;31m" };
        eprintln!("{}{}\x1b[0m", color, summary_line(summary));
    }
}

/// `====== 3 passed, 1 failed in 2.50s ======`
pub fn summary_line(summary: &SuiteSummary) -> String {
    let mut parts = Vec::new();
    if summary.passed > 0 {
        parts.push(format!("{} passed", summary.passed));
    }
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed));
    }
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped));
    }
    if summary.expected_failures > 0 {
        parts.push(format!("{} failed as expected", summary.expected_failures));
    }
    if parts.is_empty() {
        parts.push("no scenarios ran".to_string());
    }

    format!(
        "====== {} in {:.2}s ======",
        parts.join(", "),
        summary.duration.as_secs_f64()
    )
}

// ============================================================================
// JSON lines
// ============================================================================

/// Writes one JSON object per line: a `collected` event, a `scenario` event per result and a closing
/// `summary` event.
///
/// Write errors do not interrupt the run; the first one is returned by [`JsonReporter::finish`].
pub struct JsonReporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Hand back the writer, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, event: serde_json::Value) {
        if self.error.is_some() {
            return;
        }
        let written = serde_json::to_writer(&mut self.out, &event)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_collection_complete(&mut self, scenario_count: usize) {
        self.emit(json!({ "event": "collected", "count": scenario_count }));
    }

    fn on_scenario_complete(&mut self, scenario: &Scenario, result: &ScenarioResult) {
        let message = match result {
            ScenarioResult::Failed(_, message) | ScenarioResult::Skipped(message) => Some(message.as_str()),
            ScenarioResult::Passed(_) | ScenarioResult::ExpectedFailure(_) => None,
        };
        self.emit(json!({
            "event": "scenario",
            "name": scenario.name,
            "fixture": scenario.fixture,
            "outcome": result.label(),
            "duration_ms": result.duration().map(|d| d.as_millis() as u64),
            "message": message,
        }));
    }

    fn on_run_complete(&mut self, summary: &SuiteSummary) {
        self.emit(json!({
            "event": "summary",
            "total": summary.total,
            "passed": summary.passed,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "expected_failures": summary.expected_failures,
            "duration_ms": summary.duration.as_millis() as u64,
        }));
        if let Err(err) = self.out.flush() {
            self.error.get_or_insert(err);
        }
    }
}
