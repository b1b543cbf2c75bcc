//! Per-sample compliance evaluation
//!
//! Range checks per channel, the over-ambient temperature check, and the
//! configured combination/temperature policies collapse each cleaned point
//! into a flagged `Sample`.

use crate::config::{CombinationPolicy, RuleConfig, TemperaturePolicy};
use crate::series::{Sample, SamplePoint};

/// Evaluate one cleaned point against the envelope.
///
/// Range checks are inclusive; the temperature check is
/// `value <= ambient + offset` (inclusive). The combined `out` flag follows
/// the combination policy over the three range-checked channels, gated by the
/// temperature policy over every resolved temperature channel.
pub fn flags_for(point: &SamplePoint, ambient_temp: f64, config: &RuleConfig) -> Sample {
    let tps_ok = config.tps.contains(point.tps);
    let lambda_ok = config.lambda.contains(point.lambda);
    let fuel_ok = config.fuel.contains(point.fuel);
    let ect_ok = point.ect <= ambient_temp + config.ect_offset;
    let iat_ok = point.iat.map(|v| v <= ambient_temp + config.iat_offset);

    let range_failures =
        usize::from(!tps_ok) + usize::from(!lambda_ok) + usize::from(!fuel_ok);

    let ranges_violate = match config.combination {
        CombinationPolicy::AllFail => range_failures == 3,
        CombinationPolicy::CountFail(k) => range_failures >= k,
    };

    let temps_in_bounds = ect_ok && iat_ok.unwrap_or(true);
    let temps_out_of_bounds = !ect_ok && !iat_ok.unwrap_or(false);

    let out = match config.temperature {
        TemperaturePolicy::Excluded => ranges_violate,
        TemperaturePolicy::RequireOutOfBounds => ranges_violate && temps_out_of_bounds,
        TemperaturePolicy::RequireInBounds => ranges_violate && temps_in_bounds,
    };

    Sample {
        time: point.time,
        tps: point.tps,
        lambda: point.lambda,
        fuel: point.fuel,
        ect: point.ect,
        iat: point.iat,
        tps_ok,
        lambda_ok,
        fuel_ok,
        ect_ok,
        iat_ok,
        out,
    }
}
