//! Output formatting for smokecheck
//!
//! Text output prints one glyph line per check followed by the summary line.
//! JSON and YAML put the full report on stdout and the summary on stderr so
//! the report stays machine-readable.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use smokecheck_core::{CheckKind, CheckRegistry, CheckStatus, RunReport};
use std::io::{self, Write};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// One line per check with coloured glyphs
    #[default]
    Text,
    /// JSON report for machine processing
    Json,
    /// YAML report
    Yaml,
}

/// Rendering view over a run report
pub struct ReportOutput<'a> {
    report: &'a RunReport,
}

impl<'a> ReportOutput<'a> {
    pub fn from_report(report: &'a RunReport) -> Self {
        Self { report }
    }

    /// Render in `format`; `out` receives the report, `err` the summary for
    /// structured formats.
    pub fn render<O: Write, E: Write>(
        &self,
        format: OutputFormat,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.render_text(out),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self.report).map_err(io::Error::other)?;
                writeln!(out, "{}", json)?;
                writeln!(err, "{}", self.report.summary_line())
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(self.report).map_err(io::Error::other)?;
                write!(out, "{}", yaml)?;
                writeln!(err, "{}", self.report.summary_line())
            }
        }
    }

    fn render_text<O: Write>(&self, out: &mut O) -> io::Result<()> {
        for result in self.report.results() {
            writeln!(
                out,
                "{} {}: {}",
                colored_glyph(result.status),
                result.name,
                result.message.as_deref().unwrap_or("")
            )?;
        }
        for name in self.report.skipped() {
            writeln!(out, "{} {}: skipped", "-".dimmed(), name)?;
        }
        writeln!(out, "{}", self.report.summary_line())
    }
}

fn colored_glyph(status: CheckStatus) -> ColoredString {
    let glyph = status.glyph();
    match status {
        CheckStatus::Pass => glyph.green(),
        CheckStatus::Fail => glyph.red(),
        CheckStatus::Error => glyph.yellow(),
    }
}

#[derive(Serialize)]
struct ListedCheck<'a> {
    name: &'a str,
    kind: CheckKind,
}

/// Render the registered check names and kinds
pub fn render_listing<O: Write>(
    registry: &CheckRegistry,
    format: OutputFormat,
    out: &mut O,
) -> io::Result<()> {
    let listed: Vec<ListedCheck<'_>> = registry
        .specs()
        .iter()
        .map(|spec| ListedCheck {
            name: spec.name(),
            kind: spec.kind(),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            let width = listed.iter().map(|c| c.name.len()).max().unwrap_or(0);
            for check in &listed {
                writeln!(out, "{:<width$}  {}", check.name, check.kind, width = width)?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&listed).map_err(io::Error::other)?;
            writeln!(out, "{}", json)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&listed).map_err(io::Error::other)?;
            write!(out, "{}", yaml)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smokecheck_core::{CheckResult, CheckSpec, Observation};

    fn report(skipped: Vec<String>, cancelled: bool) -> RunReport {
        RunReport::new(
            Utc::now(),
            42,
            vec![
                CheckResult::new(
                    "build-output",
                    CheckKind::Filesystem,
                    CheckStatus::Pass,
                    Some("'client/build' exists with 3 entries".to_string()),
                    2,
                ),
                CheckResult::new(
                    "server",
                    CheckKind::Reachability,
                    CheckStatus::Error,
                    Some("connection refused: http://localhost:5000/".to_string()),
                    3,
                ),
            ],
            skipped,
            cancelled,
        )
    }

    fn render(report: &RunReport, format: OutputFormat) -> (String, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let mut err = Vec::new();
        ReportOutput::from_report(report)
            .render(format, &mut out, &mut err)
            .unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_text_lines_and_summary() {
        let (out, err) = render(&report(vec!["task-store".to_string()], false), OutputFormat::Text);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "+ build-output: 'client/build' exists with 3 entries");
        assert_eq!(
            lines[1],
            "! server: connection refused: http://localhost:5000/"
        );
        assert_eq!(lines[2], "- task-store: skipped");
        assert_eq!(
            lines[3],
            "1 passed, 0 failed, 1 errored, 1 skipped (2 checks in 42ms)"
        );
        assert_eq!(lines.len(), 4);
        assert!(err.is_empty());
    }

    #[test]
    fn test_json_report_on_stdout_summary_on_stderr() {
        let (out, err) = render(&report(vec![], true), OutputFormat::Json);

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["overall_status"], "fail");
        assert_eq!(value["results"][1]["status"], "error");
        assert_eq!(value["cancelled"], true);
        assert_eq!(
            err.trim_end(),
            "1 passed, 0 failed, 1 errored (2 checks in 42ms) [cancelled]"
        );
    }

    #[test]
    fn test_yaml_report() {
        let (out, err) = render(&report(vec![], false), OutputFormat::Yaml);
        assert!(out.contains("overall_status: fail"));
        assert!(out.contains("name: build-output"));
        assert_eq!(err.lines().count(), 1);
    }

    #[test]
    fn test_listing_text_is_aligned() {
        let mut registry = CheckRegistry::new();
        registry
            .register(CheckSpec::from_fn("server", || async {
                Ok(Observation::pass("ok"))
            }))
            .unwrap();
        registry
            .register(CheckSpec::from_fn("task-store", || async {
                Ok(Observation::pass("ok"))
            }))
            .unwrap();

        let mut out = Vec::new();
        render_listing(&registry, OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "server      custom\ntask-store  custom\n");
    }
}
