use crate::{
    update, CompletionSink, FaultReporter, JobEvent, JobKind, Phase, ProgressState, SinkEffect,
    SiteFailure, TrackerConfig,
};

/// Owns the progress state for one job and drives a borrowed sink.
///
/// One tracker tracks exactly one job; after the terminal event it goes
/// inert and a fresh tracker is needed for the next job.
pub struct JobTracker<'a> {
    kind: JobKind,
    config: TrackerConfig,
    state: ProgressState,
    sink: &'a mut dyn CompletionSink,
    faults: Option<&'a dyn FaultReporter>,
}

impl<'a> JobTracker<'a> {
    pub fn new(kind: JobKind, sink: &'a mut dyn CompletionSink) -> Self {
        Self::with_config(kind, TrackerConfig::default(), sink)
    }

    pub fn with_config(
        kind: JobKind,
        config: TrackerConfig,
        sink: &'a mut dyn CompletionSink,
    ) -> Self {
        // A tracker exists exactly as long as its channel: from open, the
        // job is waiting on its count event.
        let mut state = ProgressState::new();
        state.set_phase(Phase::Counting);
        Self {
            kind,
            config,
            state,
            sink,
            faults: None,
        }
    }

    /// Installs a fault-telemetry collaborator; transport failures are
    /// reported to it in addition to the sink.
    pub fn fault_reporter(mut self, reporter: &'a dyn FaultReporter) -> Self {
        self.faults = Some(reporter);
        self
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.phase() == Phase::Done
    }

    /// Applies one event and renders the resulting effects through the sink.
    pub fn apply(&mut self, event: JobEvent) {
        if !self.is_done() {
            if let (JobEvent::Failed(SiteFailure::Transport), Some(reporter)) =
                (&event, self.faults)
            {
                reporter.report("push channel failed mid-job");
            }
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, self.kind, &self.config, event);
        self.state = state;

        for effect in effects {
            match effect {
                SinkEffect::Progress { percent, phase } => self.sink.on_progress(percent, phase),
                SinkEffect::UnitSucceeded(result) => self.sink.on_unit_succeeded(&result),
                SinkEffect::Failure(message) => self.sink.on_failure(&message),
                SinkEffect::Terminal { success } => self.sink.on_terminal(success),
            }
        }
    }
}
