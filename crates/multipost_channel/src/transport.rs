use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use multipost_core::{JobId, JobKind};
use url::Url;

/// Errors raised while opening or reading the push channel. All of them are
/// transport-level: the job itself keeps running (or has already failed)
/// server-side, and the client cannot resume mid-job.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid channel endpoint: {0}")]
    Endpoint(String),
    #[error("failed to open channel: {0}")]
    Connect(String),
    #[error("channel rejected with http status {0}")]
    HttpStatus(u16),
    #[error("channel read failed: {0}")]
    Read(String),
}

/// Raw body stream of an open channel.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChannelError>> + Send>>;

/// Builds the job-scoped endpoint. Single and group jobs live on different
/// paths; the job id rides in the query string.
pub fn endpoint_url(base: &Url, kind: JobKind, job_id: JobId) -> Result<Url, ChannelError> {
    let path = match kind {
        JobKind::Single => "upload/art/saved",
        JobKind::Group => "upload/group/post",
    };
    let mut url = base
        .join(path)
        .map_err(|err| ChannelError::Endpoint(err.to_string()))?;
    url.set_query(Some(&format!("id={job_id}")));
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub connect_timeout: Duration,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Seam for opening the event stream, so tests can swap the network out.
#[async_trait::async_trait]
pub trait StreamTransport: Send + Sync {
    async fn open(&self, url: &Url) -> Result<ByteStream, ChannelError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    settings: ChannelSettings,
}

impl ReqwestTransport {
    pub fn new(settings: ChannelSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ChannelError> {
        // No request timeout: the channel stays open for the life of the
        // job, which can legitimately take minutes with inter-submission
        // delays.
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| ChannelError::Connect(err.to_string()))
    }
}

#[async_trait::async_trait]
impl StreamTransport for ReqwestTransport {
    async fn open(&self, url: &Url) -> Result<ByteStream, ChannelError> {
        let client = self.build_client()?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| ChannelError::Connect(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::HttpStatus(status.as_u16()));
        }

        let stream = response
            .bytes_stream()
            .map_err(|err| ChannelError::Read(err.to_string()));
        Ok(Box::pin(stream))
    }
}
