use channel_logging::{channel_error, channel_info};
use multipost_core::{CompletionSink, FaultReporter, Phase, UploadResult};

/// Renders tracker callbacks as plain terminal output. Progress goes to
/// stdout; diagnostics go through the logger.
#[derive(Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionSink for ConsoleSink {
    fn on_progress(&mut self, percent: u8, phase: Phase) {
        match phase {
            Phase::Delaying => println!("{percent:>3}%  (waiting out site rate limits)"),
            _ => println!("{percent:>3}%"),
        }
    }

    fn on_unit_succeeded(&mut self, result: &UploadResult) {
        println!("      {} -> {}", result.name, result.link);
    }

    fn on_failure(&mut self, message: &str) {
        println!("  !   {message}");
    }

    fn on_terminal(&mut self, success: bool) {
        if success {
            println!("Upload complete.");
        } else {
            println!("Upload finished with errors; see messages above.");
        }
        channel_info!("job terminal, success={success}");
    }
}

/// Fault-telemetry hook: the original product shipped channel faults to a
/// crash reporter; here they land in the error log.
pub struct LogFaultReporter;

impl FaultReporter for LogFaultReporter {
    fn report(&self, context: &str) {
        channel_error!("channel fault: {context}");
    }
}
