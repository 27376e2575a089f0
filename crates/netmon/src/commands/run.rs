//! `netmon run`: poll until Ctrl-C, printing a summary now and then.

use tokio::time::MissedTickBehavior;
use tracing::info;

use netmon_core::Monitor;

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &RunArgs, monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    if args.report_every.is_zero() {
        return Err(CliError::Validation {
            field: "report-every".into(),
            reason: "must be non-zero".into(),
        });
    }

    monitor.start().await?;

    let mut report = tokio::time::interval(args.report_every);
    report.set_missed_tick_behavior(MissedTickBehavior::Skip);
    report.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupt received, shutting down");
                break;
            }
            _ = report.tick() => {
                let summary = monitor.summary(args.hours)?;
                let out = output::render_single(
                    global.output,
                    &summary,
                    output::summary_detail,
                    |s| format!("{:.1}", s.wan_availability_pct),
                );
                output::print_output(&out, global.quiet);
            }
        }
    }

    monitor.shutdown().await;
    Ok(())
}
