//! Table construction and header discovery

use tracing::{debug, info};

use crate::config::{HeaderRule, LoaderConfig};
use crate::error::FormatError;
use crate::parser::{parse_rows, sniff_delimiter};

/// A rectangular view over the data body of a logger export: column labels
/// taken verbatim from the discovered header row, and only data rows beneath
/// it. Labels are not guaranteed unique and may carry units or suffixes;
/// channel resolution is the evaluator's job.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Column labels, verbatim from the header row
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (row, column index); `None` when the physical row was shorter
    /// than the header
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Index of the first column matching `needle` (lowercased by the caller)
    pub fn find_column(&self, needle: &str) -> Option<usize> {
        self.columns.iter().position(|c| label_matches(c, needle))
    }

    /// Indices of every column matching `needle`
    pub fn find_columns(&self, needle: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| label_matches(c, needle))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Case-insensitive substring match at token boundaries: the needle must not
/// be flanked by alphanumerics. "ect" matches "ECT (°C)" but not
/// "Section Time"; "tps" matches "TPS (Main)".
fn label_matches(label: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let label = label.to_lowercase();
    let step = needle.chars().next().map_or(1, char::len_utf8);
    let mut start = 0;
    while let Some(pos) = label[start..].find(needle) {
        let at = start + pos;
        let end = at + needle.len();
        let before_ok = at == 0 || !label.as_bytes()[at - 1].is_ascii_alphanumeric();
        let after_ok = end == label.len() || !label.as_bytes()[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        start = at + step;
    }
    false
}

/// True when the row's cells collectively contain every keyword,
/// case-insensitively
fn is_header_row(row: &[String], keywords: &[String]) -> bool {
    keywords.iter().all(|kw| {
        row.iter()
            .any(|cell| cell.to_lowercase().contains(kw.as_str()))
    })
}

/// Locate the header row index according to the configured rule
fn find_header(rows: &[Vec<String>], rule: &HeaderRule) -> Result<usize, FormatError> {
    match rule {
        HeaderRule::Detect { keywords, max_scan } => {
            let window = rows.len().min(*max_scan);
            for (i, row) in rows[..window].iter().enumerate() {
                if is_header_row(row, keywords) {
                    debug!(row = i, "header row detected");
                    return Ok(i);
                }
            }
            Err(FormatError::HeaderNotFound {
                scanned: window,
                keywords: keywords.clone(),
            })
        }
        HeaderRule::FixedRow(row) => {
            if *row >= rows.len() {
                return Err(FormatError::HeaderRowOutOfRange {
                    row: *row,
                    rows: rows.len(),
                });
            }
            Ok(*row)
        }
    }
}

/// Parse raw bytes into a `Table`.
///
/// Bytes are decoded lossily (stray bytes from a logger must not abort the
/// parse), lines that do not split cleanly are dropped, the header is located
/// per `config.header_rule`, and fully-empty rows below it are discarded.
pub fn load(raw: &[u8], config: &LoaderConfig) -> Result<Table, FormatError> {
    let text = String::from_utf8_lossy(raw);

    let delimiter = config.delimiter.unwrap_or_else(|| sniff_delimiter(&text));
    let rows = parse_rows(&text, delimiter);
    if rows.is_empty() {
        return Err(FormatError::EmptyFile);
    }

    let header_idx = find_header(&rows, &config.header_rule)?;
    let columns = rows[header_idx].clone();

    let body: Vec<Vec<String>> = rows[header_idx + 1..]
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .cloned()
        .collect();

    if body.is_empty() {
        return Err(FormatError::NoDataRows);
    }

    info!(
        columns = columns.len(),
        rows = body.len(),
        header_row = header_idx,
        "table loaded"
    );

    Ok(Table {
        columns,
        rows: body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detect_config() -> LoaderConfig {
        LoaderConfig::default()
    }

    #[test]
    fn test_header_after_banner() {
        let mut text = String::new();
        for i in 0..23 {
            text.push_str(&format!("banner line {i},metadata\n"));
        }
        text.push_str("Section Time,TPS (Main),Lambda 1,Fuel Pressure,ECT\n");
        text.push_str("0.0,95,13.2,50,40\n");
        text.push_str("0.1,96,13.1,51,41\n");

        let table = load(text.as_bytes(), &detect_config()).unwrap();
        assert_eq!(table.columns()[0], "Section Time");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), Some("0.0"));
    }

    #[test]
    fn test_no_header_found() {
        let text = "a,b,c\n1,2,3\n";
        match load(text.as_bytes(), &detect_config()) {
            Err(FormatError::HeaderNotFound { .. }) => {}
            other => panic!("expected HeaderNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_header_but_no_data() {
        let text = "Section Time,TPS\n\n,,\n";
        match load(text.as_bytes(), &detect_config()) {
            Err(FormatError::NoDataRows) => {}
            other => panic!("expected NoDataRows, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file() {
        match load(b"", &detect_config()) {
            Err(FormatError::EmptyFile) => {}
            other => panic!("expected EmptyFile, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_row_header() {
        let text = "banner\nSection Time,TPS\n1.0,95\n";
        let config = LoaderConfig {
            header_rule: HeaderRule::FixedRow(1),
            delimiter: Some(','),
        };
        let table = load(text.as_bytes(), &config).unwrap();
        assert_eq!(table.columns(), &["Section Time", "TPS"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_fixed_row_out_of_range() {
        let config = LoaderConfig {
            header_rule: HeaderRule::FixedRow(19),
            delimiter: Some(','),
        };
        match load(b"only,one,row\n", &config) {
            Err(FormatError::HeaderRowOutOfRange { row: 19, .. }) => {}
            other => panic!("expected HeaderRowOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_semicolon_file_sniffed() {
        let text = "meta;stuff\nSection Time;TPS;Lambda 1;Fuel Pressure;ECT\n0.0;95;13.2;50;40\n";
        let table = load(text.as_bytes(), &detect_config()).unwrap();
        assert_eq!(table.columns().len(), 5);
        assert_eq!(table.cell(0, 1), Some("95"));
    }

    #[test]
    fn test_short_rows_yield_missing_cells() {
        let text = "Section Time,TPS,Lambda 1\n0.0,95\n";
        let table = load(text.as_bytes(), &detect_config()).unwrap();
        assert_eq!(table.cell(0, 2), None);
    }

    #[test]
    fn test_label_matching_respects_token_boundaries() {
        let text = "Section Time,ECT (°C),TPS (Main)\n0.0,40,95\n";
        let table = load(text.as_bytes(), &detect_config()).unwrap();
        // "ect" must not match the "ect" inside "Section"
        assert_eq!(table.find_column("ect"), Some(1));
        assert_eq!(table.find_column("tps"), Some(2));
        assert_eq!(table.find_column("time"), Some(0));
        assert_eq!(table.find_column("rpm"), None);
    }

    #[test]
    fn test_find_columns_multiple_lambda() {
        let text = "Section Time,Lambda 1,Lambda 2,TPS\n0.0,0.9,1.0,95\n";
        let table = load(text.as_bytes(), &detect_config()).unwrap();
        assert_eq!(table.find_columns("lambda"), vec![1, 2]);
        assert_eq!(table.find_column("tps"), Some(3));
    }

    proptest! {
        // For any banner depth i < scan window, the loader picks row i as the
        // header when it is the first row carrying the keywords.
        #[test]
        fn prop_header_found_at_any_offset(offset in 0usize..49) {
            let mut text = String::new();
            for n in 0..offset {
                text.push_str(&format!("logger metadata {n}\n"));
            }
            text.push_str("Section Time,TPS,Lambda 1,Fuel Pressure,ECT\n");
            text.push_str("0.0,95,13.2,50,40\n");

            let table = load(text.as_bytes(), &LoaderConfig::default()).unwrap();
            prop_assert_eq!(table.columns()[0].as_str(), "Section Time");
            prop_assert_eq!(table.row_count(), 1);
        }
    }
}
