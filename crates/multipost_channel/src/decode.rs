use channel_logging::{channel_debug, channel_warn};
use multipost_core::{DelayState, JobEvent, SiteFailure, UploadResult};
use serde::Deserialize;
use url::Url;

use crate::SseFrame;

#[derive(Debug, Deserialize)]
struct UploadPayload {
    link: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct BadCredsPayload {
    account: String,
    site: String,
}

#[derive(Debug, Deserialize)]
struct SiteErrorPayload {
    account: String,
    site: String,
    msg: String,
}

#[derive(Debug, Deserialize)]
struct HttpErrorPayload {
    account: String,
    site: String,
    code: u16,
}

/// Maps a wire frame to a typed job event.
///
/// Unknown names (the server also emits things like `validationerror` that
/// no client ever listened to) and malformed payloads are skipped rather
/// than killing the stream; a skipped frame leaves the aggregate exactly as
/// it was.
pub fn decode_frame(frame: &SseFrame) -> Option<JobEvent> {
    match frame.name.as_str() {
        "count" => match frame.data.trim().parse::<u64>() {
            Ok(total) => Some(JobEvent::Count(total)),
            Err(err) => {
                channel_warn!("bad count payload {:?}: {err}", frame.data);
                None
            }
        },
        "upload" => {
            let payload: UploadPayload = parse_json(frame)?;
            match Url::parse(&payload.link) {
                Ok(link) => Some(JobEvent::Upload(UploadResult {
                    name: payload.name,
                    link,
                })),
                Err(err) => {
                    channel_warn!("bad upload link {:?}: {err}", payload.link);
                    None
                }
            }
        }
        "groupdone" => Some(JobEvent::GroupDone),
        // The server has emitted both "stop" and "end" for the resume
        // signal; only "start" opens a pause.
        "delay" => Some(JobEvent::Delay(if frame.data == "start" {
            DelayState::Start
        } else {
            DelayState::Stop
        })),
        "badcreds" => {
            let payload: BadCredsPayload = parse_json(frame)?;
            Some(JobEvent::Failed(SiteFailure::BadCredentials {
                account: payload.account,
                site: payload.site,
            }))
        }
        "siteerror" => {
            let payload: SiteErrorPayload = parse_json(frame)?;
            Some(JobEvent::Failed(SiteFailure::SiteError {
                account: payload.account,
                site: payload.site,
                message: payload.msg,
            }))
        }
        "httperror" => {
            let payload: HttpErrorPayload = parse_json(frame)?;
            Some(JobEvent::Failed(SiteFailure::HttpError {
                account: payload.account,
                site: payload.site,
                status: payload.code,
            }))
        }
        // A frame named "error" reaches the same handler as a channel
        // failure in an EventSource client; it is fatal to the tracker.
        "error" => Some(JobEvent::Failed(SiteFailure::Transport)),
        "done" => Some(JobEvent::Done),
        other => {
            channel_debug!("ignoring unhandled event {other:?}");
            None
        }
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(frame: &SseFrame) -> Option<T> {
    match serde_json::from_str(&frame.data) {
        Ok(payload) => Some(payload),
        Err(err) => {
            channel_warn!("bad {} payload {:?}: {err}", frame.name, frame.data);
            None
        }
    }
}
