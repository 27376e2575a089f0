//! `netmon fetch`: one serialized cycle, then what it recorded.

use serde::Serialize;

use netmon_core::{CycleReport, Monitor, PingHistoryQuery, PingSample, StatsSummary};

use crate::cli::{FetchArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct FetchOutput {
    report: CycleReport,
    summary: StatsSummary,
    pings: Vec<PingSample>,
}

pub async fn handle(args: &FetchArgs, monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let report = monitor.fetch_now().await?;
    let summary = monitor.summary(args.hours)?;
    let pings = monitor.ping_history(&PingHistoryQuery {
        hours: args.hours,
        target: None,
    })?;

    let data = FetchOutput {
        report,
        summary,
        pings,
    };
    let out = output::render_single(
        global.output,
        &data,
        |d| {
            let mut text = output::report_detail(&d.report);
            if !d.pings.is_empty() {
                text.push('\n');
                text.push_str(&output::ping_table(&d.pings));
            }
            text.push('\n');
            text.push_str(&output::summary_detail(&d.summary));
            text
        },
        |d| d.report.timestamp.to_rfc3339(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
