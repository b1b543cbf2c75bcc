//! Sustained-violation debounce
//!
//! A single noisy sample must not fail a run; only a contiguous out-of-
//! envelope interval whose cumulative duration reaches the configured
//! threshold counts. One compliant sample resets the accumulator completely,
//! so a fresh contiguous run is required after any clean reading.

use serde::Serialize;
use tracing::{debug, info};

use crate::channels::Channel;
use crate::series::Sample;

/// Final determination for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Verdict {
    Pass,
    Fail {
        /// Timestamp at which the cumulative violation duration first
        /// reached the threshold (seconds)
        time: f64,
        /// Channels out of their envelope at that instant
        channels: Vec<Channel>,
    },
}

impl Verdict {
    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail { .. })
    }
}

/// Every channel non-compliant at this sample, for diagnostics
fn failing_channels(sample: &Sample) -> Vec<Channel> {
    let mut channels = Vec::new();
    if !sample.tps_ok {
        channels.push(Channel::Tps);
    }
    if !sample.lambda_ok {
        channels.push(Channel::Lambda);
    }
    if !sample.fuel_ok {
        channels.push(Channel::Fuel);
    }
    if !sample.ect_ok {
        channels.push(Channel::Ect);
    }
    if sample.iat_ok == Some(false) {
        channels.push(Channel::Iat);
    }
    channels
}

/// Left-to-right fold over the flagged series: accumulate `dt` while
/// violating, reset to zero on any compliant sample, and stop at the first
/// sample where the accumulator reaches `threshold` (inclusive). `dt` comes
/// from the retained series's timestamps, monotonic by construction, so it
/// is never negative; the first sample contributes `dt = 0`.
pub fn run_debounce(samples: &[Sample], threshold: f64) -> Verdict {
    let mut cum = 0.0_f64;
    let mut prev_time: Option<f64> = None;

    for sample in samples {
        let dt = prev_time.map_or(0.0, |t| sample.time - t);
        prev_time = Some(sample.time);

        if sample.out {
            cum += dt;
            if cum >= threshold {
                let channels = failing_channels(sample);
                info!(time = sample.time, ?channels, "sustained violation");
                return Verdict::Fail {
                    time: sample.time,
                    channels,
                };
            }
        } else {
            cum = 0.0;
        }
    }

    debug!(samples = samples.len(), "no sustained violation");
    Verdict::Pass
}
