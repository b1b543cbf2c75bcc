//! Rule configuration
//!
//! Thresholds vary per deployment (different engine classes run different
//! envelopes), so everything here is an explicit config object handed to the
//! evaluator, never a hard-coded constant.

use serde::{Deserialize, Serialize};

use crate::channels::ChannelKeywords;
use crate::error::EvalError;

/// Stoichiometric air-fuel ratio reference for gasoline
pub const AFR_STOICH: f64 = 14.7;

/// Inclusive [min, max] envelope for one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive containment check
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// What the AFR/Lambda columns actually carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LambdaSource {
    /// Columns are air-fuel ratios; divide the per-sample mean by 14.7
    #[default]
    Afr,
    /// Columns are already lambda ratios; use the mean directly
    Lambda,
}

/// How per-channel range failures combine into a sample-level violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// Violation only when TPS, Lambda, and Fuel are all out of range at once
    AllFail,
    /// Violation when at least `k` of the range-checked channels are out
    CountFail(usize),
}

impl Default for CombinationPolicy {
    fn default() -> Self {
        Self::AllFail
    }
}

/// Whether the over-ambient temperature check participates in the violation
/// condition, and with which polarity. Observed rule variants disagree on
/// this, so it is an explicit per-deployment choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperaturePolicy {
    /// Temperature channels are validated and reported but never gate the
    /// violation condition
    #[default]
    Excluded,
    /// A violation additionally requires every resolved temperature channel
    /// to be over its ambient-offset limit
    RequireOutOfBounds,
    /// A violation additionally requires every resolved temperature channel
    /// to be within its ambient-offset limit
    RequireInBounds,
}

/// Full evaluator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Throttle position envelope (%)
    pub tps: Range,
    /// Lambda envelope (dimensionless)
    pub lambda: Range,
    /// Fuel pressure envelope
    pub fuel: Range,
    /// Allowed ECT excess over ambient (°C)
    pub ect_offset: f64,
    /// Allowed IAT excess over ambient (°C); only used when an IAT column
    /// resolves
    pub iat_offset: f64,
    /// Interpretation of the AFR/Lambda columns
    #[serde(default)]
    pub lambda_source: LambdaSource,
    /// Violation combination policy
    #[serde(default)]
    pub combination: CombinationPolicy,
    /// Temperature participation policy
    #[serde(default)]
    pub temperature: TemperaturePolicy,
    /// Sustained-violation duration needed to fail (seconds)
    pub debounce_threshold: f64,
    /// Channel resolution keyword lists
    #[serde(default)]
    pub channels: ChannelKeywords,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            tps: Range::new(90.0, 105.0),
            lambda: Range::new(0.75, 1.05),
            fuel: Range::new(40.0, 60.0),
            ect_offset: 20.0,
            iat_offset: 20.0,
            lambda_source: LambdaSource::default(),
            combination: CombinationPolicy::default(),
            temperature: TemperaturePolicy::default(),
            debounce_threshold: 0.5,
            channels: ChannelKeywords::default(),
        }
    }
}

/// Parse an operator-supplied ambient temperature. Accepts `.` or `,` as the
/// decimal separator and strips surrounding whitespace.
pub fn parse_ambient_temp(raw: &str) -> Result<f64, EvalError> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().map_err(|_| EvalError::InvalidAmbient {
        raw: raw.to_string(),
    })
}
