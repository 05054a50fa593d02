use crate::{Phase, UploadResult};

/// Callback surface the tracker renders through. Implemented by the UI
/// layer; the tracker only ever borrows it.
///
/// `on_terminal` is invoked exactly once per tracker, after the channel has
/// shut down, and no callback fires after it.
pub trait CompletionSink {
    fn on_progress(&mut self, percent: u8, phase: Phase);
    fn on_unit_succeeded(&mut self, result: &UploadResult);
    fn on_failure(&mut self, message: &str);
    fn on_terminal(&mut self, success: bool);
}

/// One sink invocation produced by [`crate::update`]. Effects are applied
/// in order by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEffect {
    Progress { percent: u8, phase: Phase },
    UnitSucceeded(UploadResult),
    Failure(String),
    Terminal { success: bool },
}
