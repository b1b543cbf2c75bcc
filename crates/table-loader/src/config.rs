//! Loader configuration

use serde::{Deserialize, Serialize};

/// Keywords a header row must collectively contain (lowercased substring match)
pub const DEFAULT_HEADER_KEYWORDS: &[&str] = &["section", "time"];

/// Maximum number of rows scanned for a header before giving up
pub const DEFAULT_SCAN_WINDOW: usize = 50;

/// How the header row is located
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRule {
    /// Scan the first `max_scan` rows top-down; the first row whose cells,
    /// lowercased, collectively contain every keyword is the header.
    Detect {
        keywords: Vec<String>,
        max_scan: usize,
    },

    /// The row at this index is the header unconditionally. Used for logger
    /// formats with a fixed banner length.
    FixedRow(usize),
}

impl Default for HeaderRule {
    fn default() -> Self {
        Self::Detect {
            keywords: DEFAULT_HEADER_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_scan: DEFAULT_SCAN_WINDOW,
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Header location policy
    #[serde(default)]
    pub header_rule: HeaderRule,

    /// Field delimiter; `None` sniffs among `,`, `;` and tab
    #[serde(default)]
    pub delimiter: Option<char>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_is_detect() {
        match LoaderConfig::default().header_rule {
            HeaderRule::Detect { keywords, max_scan } => {
                assert_eq!(keywords, vec!["section", "time"]);
                assert_eq!(max_scan, DEFAULT_SCAN_WINDOW);
            }
            HeaderRule::FixedRow(_) => panic!("default should be Detect"),
        }
    }
}
