use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use channel_logging::channel_warn;
use futures_util::StreamExt;
use multipost_core::{JobEvent, JobId, JobKind, SiteFailure};
use url::Url;

use crate::{decode_frame, endpoint_url, ChannelError, SseParser, StreamTransport};

/// Owns one open push channel and delivers its decoded events.
///
/// Exactly one channel exists per handle; the stream runs on a background
/// thread with its own runtime and events arrive through [`recv`]. The
/// channel shuts itself down after the terminal event or a transport
/// failure, and [`close`] may be called any number of times on top of that.
///
/// [`recv`]: UploadChannel::recv
/// [`close`]: UploadChannel::close
pub struct UploadChannel {
    event_rx: mpsc::Receiver<JobEvent>,
    shutdown: Arc<AtomicBool>,
    closed: bool,
}

impl UploadChannel {
    /// Opens the kind-specific endpoint for `job_id` and starts pumping
    /// events. Transport failures after this point surface in-band as a
    /// generic failure followed by the terminal event.
    pub fn open(
        transport: Arc<dyn StreamTransport>,
        base: &Url,
        kind: JobKind,
        job_id: JobId,
    ) -> Result<Self, ChannelError> {
        let url = endpoint_url(base, kind, job_id)?;
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = Arc::new(AtomicBool::new(false));

        let stop = shutdown.clone();
        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_stream(transport, url, event_tx, stop));
        });

        Ok(Self {
            event_rx,
            shutdown,
            closed: false,
        })
    }

    /// Blocks until the next event. Returns `None` once the stream has
    /// ended and every buffered event has been drained.
    pub fn recv(&self) -> Option<JobEvent> {
        self.event_rx.recv().ok()
    }

    /// Non-blocking variant of [`UploadChannel::recv`].
    pub fn try_recv(&self) -> Option<JobEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stops the stream. Teardown happens at most once; further calls are
    /// no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for UploadChannel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_stream(
    transport: Arc<dyn StreamTransport>,
    url: Url,
    event_tx: mpsc::Sender<JobEvent>,
    shutdown: Arc<AtomicBool>,
) {
    let mut stream = match transport.open(&url).await {
        Ok(stream) => stream,
        Err(err) => {
            channel_warn!("channel open failed for {url}: {err}");
            send_transport_failure(&event_tx);
            return;
        }
    };

    let mut parser = SseParser::new();
    while let Some(chunk) = stream.next().await {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                channel_warn!("channel read failed for {url}: {err}");
                send_transport_failure(&event_tx);
                return;
            }
        };
        for frame in parser.push(&chunk) {
            let Some(event) = decode_frame(&frame) else {
                continue;
            };
            if event == JobEvent::Failed(SiteFailure::Transport) {
                channel_warn!("channel for {url} pushed an error event");
                send_transport_failure(&event_tx);
                return;
            }
            let terminal = event == JobEvent::Done;
            if event_tx.send(event).is_err() {
                return;
            }
            if terminal {
                // Dropping the stream here is the actual teardown; frames
                // buffered behind the terminal event are discarded.
                return;
            }
        }
    }

    // The server hung up without a terminal event.
    channel_warn!("channel for {url} ended without done");
    send_transport_failure(&event_tx);
}

fn send_transport_failure(event_tx: &mpsc::Sender<JobEvent>) {
    let _ = event_tx.send(JobEvent::Failed(SiteFailure::Transport));
    let _ = event_tx.send(JobEvent::Done);
}
