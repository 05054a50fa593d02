use std::fmt;

/// A distinguishable per-unit or channel-level failure.
///
/// Application failures (`BadCredentials`, `SiteError`, `HttpError`) never
/// abort the job; `Transport` means the push channel itself died and the
/// tracker is going terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteFailure {
    BadCredentials {
        account: String,
        site: String,
    },
    SiteError {
        account: String,
        site: String,
        message: String,
    },
    HttpError {
        account: String,
        site: String,
        status: u16,
    },
    Transport,
}

impl SiteFailure {
    /// Display-ready message for this failure. The aggregator never looks
    /// inside a failure; it only sees this rendered string.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SiteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteFailure::BadCredentials { account, site } => write!(
                f,
                "Bad credentials for {account} on {site}; re-authentication required."
            ),
            SiteFailure::SiteError {
                account,
                site,
                message,
            } => write!(f, "Error uploading to {account} on {site}: {message}."),
            SiteFailure::HttpError {
                account,
                site,
                status,
            } => write!(f, "HTTP {status} from {site} for {account}."),
            SiteFailure::Transport => {
                write!(f, "A site error occurred, please try again later.")
            }
        }
    }
}

/// External fault-telemetry collaborator. Transport failures are reported
/// here in addition to the completion sink.
pub trait FaultReporter {
    fn report(&self, context: &str);
}
