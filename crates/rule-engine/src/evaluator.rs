//! Evaluation pipeline
//!
//! `evaluate` is the single entry point callers use: resolve channels, clean
//! the series, flag each sample, and run the debounce. One sequential pass,
//! no shared state; concurrent evaluations of different tables are
//! independent.

use tracing::info;

use table_loader::Table;

use crate::channels::ChannelMap;
use crate::compliance::flags_for;
use crate::config::RuleConfig;
use crate::debounce::{run_debounce, Verdict};
use crate::error::EvalError;
use crate::series::{clean_rows, CleanedSeries};

/// Evaluate a loaded table against the operating envelope.
///
/// Returns the cleaned, flagged series (for display/export) together with
/// the verdict. Fails with `EvalError::Schema` when a required channel does
/// not resolve and `EvalError::Data` when no usable rows survive cleaning;
/// it never returns a verdict alongside an error.
pub fn evaluate(
    table: &Table,
    ambient_temp: f64,
    config: &RuleConfig,
) -> Result<(CleanedSeries, Verdict), EvalError> {
    let map = ChannelMap::resolve(table, &config.channels)?;
    let points = clean_rows(table, &map, config)?;

    let samples: Vec<_> = points
        .iter()
        .map(|p| flags_for(p, ambient_temp, config))
        .collect();

    let verdict = run_debounce(&samples, config.debounce_threshold);
    info!(
        samples = samples.len(),
        fail = verdict.is_fail(),
        "evaluation complete"
    );

    let series = CleanedSeries {
        has_iat: map.iat.is_some(),
        samples,
    };
    Ok((series, verdict))
}
