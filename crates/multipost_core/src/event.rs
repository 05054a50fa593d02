use url::Url;

use crate::SiteFailure;

/// One site upload that finished with a public link.
///
/// Results are kept in arrival order and never deduplicated; two accounts on
/// the same site produce two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub name: String,
    pub link: Url,
}

/// Rate-limit pause signal between submissions of a group job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayState {
    Start,
    Stop,
}

/// A decoded push event for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// Expected number of work units, sent once at the start of the job.
    Count(u64),
    /// One site upload succeeded. Counts toward completion for single jobs;
    /// for group jobs it only carries the per-site link.
    Upload(UploadResult),
    /// One submission within a group finished (group jobs only).
    GroupDone,
    /// The server is pausing between submissions (group jobs only).
    Delay(DelayState),
    /// A unit failed; the job keeps going.
    Failed(SiteFailure),
    /// Terminal event. Nothing is processed after this.
    Done,
}
