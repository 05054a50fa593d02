//! Multipost core: pure progress state machine for batch upload jobs.
mod classify;
mod event;
mod sink;
mod state;
mod tracker;
mod update;

pub use classify::{FaultReporter, SiteFailure};
pub use event::{DelayState, JobEvent, UploadResult};
pub use sink::{CompletionSink, SinkEffect};
pub use state::{JobId, JobKind, Phase, ProgressState, TrackerConfig};
pub use tracker::JobTracker;
pub use update::update;
