//! `netmon status`: one raw fetch, nothing recorded.

use netmon_core::Monitor;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let payload = monitor.raw_status().await?;
    let out = output::render_single(
        global.output,
        &payload,
        output::render_json_pretty,
        |p| {
            p.pointer("/realtime/wan_state")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_owned()
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
