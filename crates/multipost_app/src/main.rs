mod console;
mod logging;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use multipost_channel::{ChannelSettings, ReqwestTransport, UploadChannel};
use multipost_core::{JobKind, JobTracker};
use url::Url;

use crate::console::{ConsoleSink, LogFaultReporter};
use crate::logging::LogDestination;

/// Follow the progress of an upload job already running on the server.
#[derive(Debug, Parser)]
#[command(name = "multipost", version, about)]
struct Args {
    /// Id of the job to follow.
    job_id: u64,

    /// The job is a group upload rather than a single submission.
    #[arg(long)]
    group: bool,

    /// Server the job is running on.
    #[arg(long, default_value = "http://localhost:5000/")]
    base_url: Url,

    /// Where log output goes.
    #[arg(long, value_enum, default_value = "term")]
    log: LogChoice,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogChoice {
    File,
    Term,
    Both,
}

impl From<LogChoice> for LogDestination {
    fn from(choice: LogChoice) -> Self {
        match choice {
            LogChoice::File => LogDestination::File,
            LogChoice::Term => LogDestination::Terminal,
            LogChoice::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(args.log.into());

    let kind = if args.group {
        JobKind::Group
    } else {
        JobKind::Single
    };

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let mut channel = UploadChannel::open(transport, &args.base_url, kind, args.job_id)
        .context("opening push channel")?;

    let reporter = LogFaultReporter;
    let mut sink = ConsoleSink::new();
    let had_error = {
        let mut tracker = JobTracker::new(kind, &mut sink).fault_reporter(&reporter);
        while let Some(event) = channel.recv() {
            tracker.apply(event);
            if tracker.is_done() {
                break;
            }
        }
        tracker.state().had_error()
    };
    channel.close();

    if had_error {
        std::process::exit(1);
    }
    Ok(())
}
