use crate::{DelayState, JobEvent, JobKind, Phase, ProgressState, SinkEffect, TrackerConfig};

/// Pure update function: applies one push event to the progress state and
/// returns the sink invocations it produced.
///
/// `Done` is terminal: once the phase reaches it, every later event is
/// swallowed without state change or effects.
pub fn update(
    mut state: ProgressState,
    kind: JobKind,
    config: &TrackerConfig,
    event: JobEvent,
) -> (ProgressState, Vec<SinkEffect>) {
    if state.phase() == Phase::Done {
        return (state, Vec::new());
    }

    let effects = match event {
        JobEvent::Count(total) => {
            // Last value wins if the server repeats itself.
            state.set_expected_total(total);
            if matches!(state.phase(), Phase::Idle | Phase::Counting) {
                state.set_phase(Phase::Uploading);
            }
            vec![SinkEffect::Progress {
                percent: state.percent(),
                phase: state.phase(),
            }]
        }
        JobEvent::Upload(result) => {
            let mut effects = Vec::new();
            if config.collect_links {
                state.record_link(result.clone());
                effects.push(SinkEffect::UnitSucceeded(result));
            }
            // Only single jobs count sites; group jobs count whole
            // submissions via GroupDone.
            if kind == JobKind::Single {
                state.increment_completed();
                effects.push(SinkEffect::Progress {
                    percent: state.percent(),
                    phase: state.phase(),
                });
            }
            effects
        }
        JobEvent::GroupDone => {
            if kind == JobKind::Group {
                state.increment_completed();
                vec![SinkEffect::Progress {
                    percent: state.percent(),
                    phase: state.phase(),
                }]
            } else {
                Vec::new()
            }
        }
        JobEvent::Delay(delay) => {
            if kind != JobKind::Group {
                return (state, Vec::new());
            }
            let next = match (delay, state.phase()) {
                (DelayState::Start, Phase::Uploading) => Some(Phase::Delaying),
                (DelayState::Stop, Phase::Delaying) => Some(Phase::Uploading),
                _ => None,
            };
            match next {
                Some(phase) => {
                    state.set_phase(phase);
                    vec![SinkEffect::Progress {
                        percent: state.percent(),
                        phase,
                    }]
                }
                None => Vec::new(),
            }
        }
        JobEvent::Failed(failure) => {
            let message = failure.message();
            state.mark_error(message.clone());
            vec![SinkEffect::Failure(message)]
        }
        JobEvent::Done => {
            state.set_phase(Phase::Done);
            vec![SinkEffect::Terminal {
                success: !state.had_error(),
            }]
        }
    };

    (state, effects)
}
