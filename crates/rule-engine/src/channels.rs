//! Logical channel resolution
//!
//! Logger column names vary wildly across ECU firmwares ("TPS (Main)",
//! "Section Time", "Lambda 1"), so channels resolve by case-insensitive
//! token-boundary keyword matching against priority-ordered candidate lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use table_loader::Table;

use crate::error::EvalError;

/// A logical measurement channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Time,
    Tps,
    Lambda,
    Fuel,
    Ect,
    Iat,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Time => "Time",
            Channel::Tps => "TPS",
            Channel::Lambda => "Lambda",
            Channel::Fuel => "Fuel",
            Channel::Ect => "ECT",
            Channel::Iat => "IAT",
        };
        write!(f, "{name}")
    }
}

/// Keyword candidates per channel, tried in order. Earlier entries win:
/// "section time" is tried before bare "time" so a lap/sector time column
/// never shadows the log timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelKeywords {
    pub time: Vec<String>,
    pub tps: Vec<String>,
    pub lambda: Vec<String>,
    pub fuel: Vec<String>,
    pub ect: Vec<String>,
    pub iat: Vec<String>,
}

fn keywords(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ChannelKeywords {
    fn default() -> Self {
        Self {
            time: keywords(&["section time", "time"]),
            tps: keywords(&["tps"]),
            lambda: keywords(&["lambda", "afr"]),
            fuel: keywords(&["fuel pressure", "fuel press", "fuel"]),
            ect: keywords(&["ect", "coolant"]),
            iat: keywords(&["iat", "intake air"]),
        }
    }
}

/// Resolved column indices for every logical channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    pub time: usize,
    pub tps: usize,
    /// All matching lambda-type columns (one per exhaust sensor); averaged
    /// per sample
    pub lambda: Vec<usize>,
    pub fuel: usize,
    pub ect: usize,
    /// Optional; absent when the logger records no intake air temperature
    pub iat: Option<usize>,
}

/// First column matching any keyword, keywords tried in priority order
fn resolve_single(table: &Table, candidates: &[String]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|kw| table.find_column(&kw.to_lowercase()))
}

/// All columns matching the highest-priority keyword that matches anything
fn resolve_multi(table: &Table, candidates: &[String]) -> Vec<usize> {
    for kw in candidates {
        let cols = table.find_columns(&kw.to_lowercase());
        if !cols.is_empty() {
            return cols;
        }
    }
    Vec::new()
}

impl ChannelMap {
    /// Resolve every logical channel against the table's column labels.
    /// Fails with a schema error naming every channel that did not resolve.
    pub fn resolve(table: &Table, keywords: &ChannelKeywords) -> Result<Self, EvalError> {
        let time = resolve_single(table, &keywords.time);
        let tps = resolve_single(table, &keywords.tps);
        let lambda = resolve_multi(table, &keywords.lambda);
        let fuel = resolve_single(table, &keywords.fuel);
        let ect = resolve_single(table, &keywords.ect);
        let iat = resolve_single(table, &keywords.iat);

        let mut missing = Vec::new();
        if time.is_none() {
            missing.push(Channel::Time.to_string());
        }
        if tps.is_none() {
            missing.push(Channel::Tps.to_string());
        }
        if lambda.is_empty() {
            missing.push(Channel::Lambda.to_string());
        }
        if fuel.is_none() {
            missing.push(Channel::Fuel.to_string());
        }
        if ect.is_none() {
            missing.push(Channel::Ect.to_string());
        }
        if !missing.is_empty() {
            return Err(EvalError::Schema { channels: missing });
        }

        let map = Self {
            time: time.unwrap(),
            tps: tps.unwrap(),
            lambda,
            fuel: fuel.unwrap(),
            ect: ect.unwrap(),
            iat,
        };
        debug!(?map, "channels resolved");
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_loader::{load, LoaderConfig};

    fn table_for(header: &str) -> Table {
        let text = format!("{header}\n1,1,1,1,1,1,1\n");
        load(text.as_bytes(), &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_link_ecu_names() {
        let table = table_for("Section Time,TPS (Main),Lambda 1,Fuel Pressure,ECT,IAT,RPM");
        let map = ChannelMap::resolve(&table, &ChannelKeywords::default()).unwrap();
        assert_eq!(map.time, 0);
        assert_eq!(map.tps, 1);
        assert_eq!(map.lambda, vec![2]);
        assert_eq!(map.fuel, 3);
        assert_eq!(map.ect, 4);
        assert_eq!(map.iat, Some(5));
    }

    #[test]
    fn test_section_time_preferred_over_lap_time() {
        let table = table_for("Lap Time,Section Time,TPS,Lambda 1,Fuel Pressure,ECT,x");
        let map = ChannelMap::resolve(&table, &ChannelKeywords::default()).unwrap();
        assert_eq!(map.time, 1);
    }

    #[test]
    fn test_multiple_lambda_sensors_all_collected() {
        let table = table_for("Section Time,TPS,Lambda 1,Lambda 2,Fuel Pressure,ECT,x");
        let map = ChannelMap::resolve(&table, &ChannelKeywords::default()).unwrap();
        assert_eq!(map.lambda, vec![2, 3]);
    }

    #[test]
    fn test_afr_fallback_when_no_lambda() {
        let table = table_for("Section Time,TPS,AFR Bank 1,Fuel Pressure,ECT,x,y");
        let map = ChannelMap::resolve(&table, &ChannelKeywords::default()).unwrap();
        assert_eq!(map.lambda, vec![2]);
    }

    #[test]
    fn test_missing_fuel_named_in_error() {
        let table = table_for("Section Time,TPS,Lambda 1,ECT,a,b,c");
        match ChannelMap::resolve(&table, &ChannelKeywords::default()) {
            Err(EvalError::Schema { channels }) => assert_eq!(channels, vec!["Fuel"]),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_ect_never_matches_section_time() {
        // "ect" is a substring of "Section"; token-boundary matching must
        // skip the time column
        let table = table_for("Section Time,TPS,Lambda 1,Fuel Pressure,ECT,a,b");
        let map = ChannelMap::resolve(&table, &ChannelKeywords::default()).unwrap();
        assert_eq!(map.ect, 4);
    }

    #[test]
    fn test_iat_is_optional() {
        let table = table_for("Section Time,TPS,Lambda 1,Fuel Pressure,ECT,a,b");
        let map = ChannelMap::resolve(&table, &ChannelKeywords::default()).unwrap();
        assert_eq!(map.iat, None);
    }
}
