//! Series cleaning and the cleaned-output table
//!
//! Raw data rows become `Sample`s through numeric coercion, dropout
//! filtering, and monotonic-time enforcement. Cells that fail to parse are
//! missing, not errors; a row missing any required channel is dropped whole.

use serde::Serialize;
use tracing::debug;

use table_loader::Table;

use crate::channels::ChannelMap;
use crate::config::{LambdaSource, RuleConfig, AFR_STOICH};
use crate::error::EvalError;

/// One cleaned, flagged sample of the run
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub time: f64,
    pub tps: f64,
    /// Derived lambda (AFR ÷ 14.7 or native ratio, per config)
    pub lambda: f64,
    pub fuel: f64,
    pub ect: f64,
    /// Present only when the logger records intake air temperature
    pub iat: Option<f64>,
    pub tps_ok: bool,
    pub lambda_ok: bool,
    pub fuel_ok: bool,
    pub ect_ok: bool,
    pub iat_ok: Option<bool>,
    /// Combined violation flag per the configured policies
    pub out: bool,
}

/// The cleaned, flagged series handed back to the caller for display/export
#[derive(Debug, Clone, Serialize)]
pub struct CleanedSeries {
    pub samples: Vec<Sample>,
    /// Whether the IAT columns exist in this log (controls export layout)
    pub has_iat: bool,
}

impl CleanedSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Render the series as a delimited file, one row per retained sample,
    /// in the column order the downstream report expects.
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        out.push_str("Time,TPS,Lambda,Fuel Pressure,ECT");
        if self.has_iat {
            out.push_str(",IAT");
        }
        out.push_str(",TPS_OK,Lambda_OK,Fuel_OK,ECT_OK");
        if self.has_iat {
            out.push_str(",IAT_OK");
        }
        out.push_str(",OUT\n");

        for s in &self.samples {
            out.push_str(&format!(
                "{},{},{},{},{}",
                s.time, s.tps, s.lambda, s.fuel, s.ect
            ));
            if self.has_iat {
                match s.iat {
                    Some(v) => out.push_str(&format!(",{v}")),
                    None => out.push(','),
                }
            }
            out.push_str(&format!(
                ",{},{},{},{}",
                s.tps_ok, s.lambda_ok, s.fuel_ok, s.ect_ok
            ));
            if self.has_iat {
                match s.iat_ok {
                    Some(v) => out.push_str(&format!(",{v}")),
                    None => out.push(','),
                }
            }
            out.push_str(&format!(",{}\n", s.out));
        }
        out
    }
}

/// A cleaned numeric row before compliance flagging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub time: f64,
    pub tps: f64,
    pub lambda: f64,
    pub fuel: f64,
    pub ect: f64,
    pub iat: Option<f64>,
}

fn parse_cell(cell: Option<&str>) -> Option<f64> {
    let v: f64 = cell?.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Mean of the parseable lambda-source cells in a row; `None` when every
/// sensor column is missing
fn lambda_mean(table: &Table, row: usize, cols: &[usize]) -> Option<f64> {
    let values: Vec<f64> = cols
        .iter()
        .filter_map(|&c| parse_cell(table.cell(row, c)))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Coerce, filter, and derive the numeric series.
///
/// Retention rules:
/// - Time, TPS, AFR/Lambda, Fuel Pressure, and ECT must all parse, or the
///   row is dropped (IAT never blocks a row)
/// - Non-positive TPS, AFR/Lambda, Fuel, or ECT values are sensor-dropout
///   sentinels; the row is dropped
/// - A timestamp below the previously retained row's timestamp drops the row
///
/// Fails only when nothing survives.
pub fn clean_rows(
    table: &Table,
    map: &ChannelMap,
    config: &RuleConfig,
) -> Result<Vec<SamplePoint>, EvalError> {
    let mut points: Vec<SamplePoint> = Vec::new();
    let mut last_time = f64::NEG_INFINITY;
    let total = table.row_count();

    for row in 0..total {
        let time = parse_cell(table.cell(row, map.time));
        let tps = parse_cell(table.cell(row, map.tps));
        let raw_lambda = lambda_mean(table, row, &map.lambda);
        let fuel = parse_cell(table.cell(row, map.fuel));
        let ect = parse_cell(table.cell(row, map.ect));

        let (Some(time), Some(tps), Some(raw_lambda), Some(fuel), Some(ect)) =
            (time, tps, raw_lambda, fuel, ect)
        else {
            continue;
        };

        if tps <= 0.0 || raw_lambda <= 0.0 || fuel <= 0.0 || ect <= 0.0 {
            continue;
        }

        if time < last_time {
            continue;
        }
        last_time = time;

        let lambda = match config.lambda_source {
            LambdaSource::Afr => raw_lambda / AFR_STOICH,
            LambdaSource::Lambda => raw_lambda,
        };

        let iat = map.iat.and_then(|c| parse_cell(table.cell(row, c)));

        points.push(SamplePoint {
            time,
            tps,
            lambda,
            fuel,
            ect,
            iat,
        });
    }

    debug!(retained = points.len(), total, "series cleaned");
    if points.is_empty() {
        return Err(EvalError::Data {
            reason: "all rows had missing required values or regressing timestamps",
        });
    }
    Ok(points)
}
