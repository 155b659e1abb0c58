use std::error::Error;

use bottle_ops::HostBundle;
use tracing::error;

use crate::build::build_bottle;
use crate::config::BuildConfig;
use crate::types::BuildReport;

/// Top-level script entry.
///
/// Any failure is logged, reported to the user through
/// [`CadHost::report_failure`](cad_host::CadHost::report_failure) and
/// returned as the same message.
pub fn run_script(kb: &mut dyn HostBundle, config: &BuildConfig) -> Result<BuildReport, String> {
    match build_bottle(kb, config) {
        Ok(report) => Ok(report),
        Err(err) => {
            error!(error = %err, step = ?err.step(), "build failed");
            let message = failure_message(&err);
            kb.report_failure(&message);
            Err(message)
        }
    }
}

/// `"Failed:\n"` followed by the error and its causes, one per line.
///
/// A cause whose text is already part of the previous line is left out.
pub fn failure_message(err: &dyn Error) -> String {
    let mut message = format!("Failed:\n{}", err);
    let mut last = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !last.contains(&text) {
            message.push_str("\ncaused by: ");
            message.push_str(&text);
        }
        last = text;
        source = cause.source();
    }
    message
}
