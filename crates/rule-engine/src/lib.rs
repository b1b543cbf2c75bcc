//! Rule Evaluator
//!
//! Maps logical channels onto a loaded table's columns, cleans the numeric
//! series, evaluates per-sample operating-envelope compliance, and runs the
//! temporal debounce that turns instantaneous excursions into a single
//! pass/fail verdict:
//! - Priority-ordered keyword resolution of channels (multi-sensor lambda
//!   columns are averaged)
//! - Strict row cleaning: numeric coercion, dropout filtering, monotonic time
//! - Configurable combination and temperature policies
//! - Reset-on-compliance debounce with an inclusive trigger threshold

pub mod channels;
pub mod compliance;
pub mod config;
pub mod debounce;
pub mod error;
pub mod evaluator;
pub mod series;

pub use channels::{Channel, ChannelKeywords, ChannelMap};
pub use compliance::flags_for;
pub use config::{
    parse_ambient_temp, CombinationPolicy, LambdaSource, Range, RuleConfig, TemperaturePolicy,
    AFR_STOICH,
};
pub use debounce::{run_debounce, Verdict};
pub use error::EvalError;
pub use evaluator::evaluate;
pub use series::{clean_rows, CleanedSeries, Sample, SamplePoint};
