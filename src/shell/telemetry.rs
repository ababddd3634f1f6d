//! Telemetry service menus
//!
//! Metric definitions, report definitions, and reports, plus the
//! bandwidth monitor that polls a report and redraws a throughput
//! table per polling cycle.

use crate::client::{Connection, MetricReport, MetricReportDefinition};
use crate::error::{Error, Result};
use crate::telemetry::BandwidthMonitor;
use rustyline::DefaultEditor;
use serde_json::Value;
use std::time::Duration;

use super::{handle_response, probe, require, run_menu, Flow, Menu};

/// Default report monitored by `bandwidth` when no id is given.
const DEFAULT_BANDWIDTH_REPORT: &str = "SwitchPortTxRx";

/// Default polling interval in seconds.
const DEFAULT_POLL_SECS: u64 = 5;

/// Run the telemetry-service shell against the controller.
pub async fn run(conn: &Connection) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    probe(conn).await;
    run_menu(&mut editor, &MainMenu { conn }).await?;
    Ok(())
}

fn resume(flow: Flow) -> Flow {
    match flow {
        Flow::Exit => Flow::Exit,
        _ => Flow::Continue,
    }
}

// =============================================================================
// Main Menu
// =============================================================================

struct MainMenu<'a> {
    conn: &'a Connection,
}

impl Menu for MainMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)".into()
    }

    fn intro(&self) -> &str {
        "Get/List/Edit/Monitor Metric Definitions and Data"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("def", "Metric Definitions"),
            ("reportdef", "Metric Report Definitions"),
            ("report", "Metric Reports"),
            ("monitor", "Monitor Tools"),
        ]
    }

    async fn dispatch(
        &self,
        editor: &mut DefaultEditor,
        verb: &str,
        _args: &[&str],
    ) -> Result<Flow> {
        let conn = self.conn;
        let flow = match verb {
            "def" => run_menu(editor, &DefinitionsMenu { conn }).await?,
            "reportdef" => run_menu(editor, &ReportDefinitionsMenu { conn }).await?,
            "report" => run_menu(editor, &ReportsMenu { conn }).await?,
            "monitor" => run_menu(editor, &MonitorMenu { conn }).await?,
            _ => {
                println!("*** Unknown command: {verb}");
                Flow::Continue
            }
        };
        Ok(resume(flow))
    }
}

// =============================================================================
// Metric Definitions
// =============================================================================

struct DefinitionsMenu<'a> {
    conn: &'a Connection,
}

impl Menu for DefinitionsMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(definitions)".into()
    }

    fn intro(&self) -> &str {
        "Get/List Metric Definitions"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("list", "List Metric Definitions"),
            ("get", "Get Metric Definition [DEFINITION ID]"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "list" => {
                let response = self.conn.get("/MetricDefinitions").await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [DEFINITION ID]")?;
                let response = self.conn.get(&format!("/MetricDefinitions/{}", args[0])).await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Metric Report Definitions
// =============================================================================

struct ReportDefinitionsMenu<'a> {
    conn: &'a Connection,
}

impl Menu for ReportDefinitionsMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(report definitions)".into()
    }

    fn intro(&self) -> &str {
        "Get/List/Edit Metric Report Definitions"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("list", "List Metric Report Definitions"),
            ("get", "Get Metric Report Definition [DEFINITION ID]"),
            ("patch", "Patch Metric Report Definition [DEFINITION ID] [JSON]"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "list" => {
                let response = self.conn.get("/MetricReportDefinitions").await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [DEFINITION ID]")?;
                let response = self
                    .conn
                    .get(&format!("/MetricReportDefinitions/{}", args[0]))
                    .await?;
                handle_response(&response);
            }
            "patch" => {
                require(args, 2, "patch [DEFINITION ID] [JSON]")?;
                let payload: Value = serde_json::from_str(&args[1..].join(" "))?;
                let response = self
                    .conn
                    .patch(&format!("/MetricReportDefinitions/{}", args[0]), payload)
                    .await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Metric Reports
// =============================================================================

struct ReportsMenu<'a> {
    conn: &'a Connection,
}

impl Menu for ReportsMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(report)".into()
    }

    fn intro(&self) -> &str {
        "Get/List/Monitor Metric Reports"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("list", "List Metric Reports"),
            ("get", "Get Metric Report [REPORT ID]"),
        ]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "list" => {
                let response = self.conn.get("/MetricReports").await?;
                handle_response(&response);
            }
            "get" => {
                require(args, 1, "get [REPORT ID]")?;
                let response = self.conn.get(&format!("/MetricReports/{}", args[0])).await?;
                handle_response(&response);
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// Monitor
// =============================================================================

struct MonitorMenu<'a> {
    conn: &'a Connection,
}

impl MonitorMenu<'_> {
    async fn fetch_report(&self, id: &str) -> Result<Option<MetricReport>> {
        let path = format!("/MetricReports/{id}");
        let response = self.conn.get(&path).await?;
        if !response.ok() {
            println!(
                "Failed to retrieve metric {id}: Status Code: {}",
                response.status()
            );
            return Ok(None);
        }
        Ok(Some(response.parse()?))
    }

    /// Poll the report, computing throughput deltas and redrawing the
    /// table whenever a sample advances. Runs until interrupted.
    async fn bandwidth(&self, id: &str, interval: Duration) -> Result<()> {
        let Some(report) = self.fetch_report(id).await? else {
            return Ok(());
        };

        // The report definition carries the wildcards used to parse
        // the report's property names.
        let def_id = report.definition.id().to_string();
        let response = self
            .conn
            .get(&format!("/MetricReportDefinitions/{def_id}"))
            .await?;
        if !response.ok() {
            println!(
                "Failed to retrieve metric report definition {def_id}: Status Code: {}",
                response.status()
            );
            return Ok(());
        }
        let definition: MetricReportDefinition = response.parse()?;

        let mut monitor = BandwidthMonitor::new(&definition);
        monitor.seed(&report)?;

        println!("Starting Bandwidth Monitor...CTRL+C to exit");
        loop {
            tokio::time::sleep(interval).await;

            let Some(report) = self.fetch_report(id).await? else {
                return Ok(());
            };

            if monitor.update(&report)? {
                // Clear the terminal and redraw from the top.
                print!("\x1b[2J\x1b[H");
                print!("{}", monitor.render());
            }
        }
    }
}

impl Menu for MonitorMenu<'_> {
    fn prompt(&self) -> String {
        "(nnf)(monitor)".into()
    }

    fn intro(&self) -> &str {
        "Monitor Metrics for things like Bandwidth"
    }

    fn verbs(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "bandwidth",
            "Bandwidth Monitor [REPORT ID = SwitchPortTxRx] [INTERVAL = 5]",
        )]
    }

    async fn dispatch(
        &self,
        _editor: &mut DefaultEditor,
        verb: &str,
        args: &[&str],
    ) -> Result<Flow> {
        match verb {
            "bandwidth" => {
                let id = args.first().copied().unwrap_or(DEFAULT_BANDWIDTH_REPORT);
                let secs = match args.get(1) {
                    Some(value) => value
                        .parse()
                        .map_err(|_| Error::Usage("bandwidth [REPORT ID] [INTERVAL]"))?,
                    None => DEFAULT_POLL_SECS,
                };
                self.bandwidth(id, Duration::from_secs(secs)).await?;
            }
            _ => println!("*** Unknown command: {verb}"),
        }
        Ok(Flow::Continue)
    }
}
