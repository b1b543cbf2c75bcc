//! Permissive delimited-text parsing
//!
//! Logger exports are messy: banner lines, stray bytes, truncated rows,
//! occasionally a line with unterminated quoting. Parsing never aborts on a
//! bad line; it keeps what splits cleanly and drops the rest.

use tracing::debug;

/// Candidate delimiters, in tie-break priority order
const DELIMITER_CANDIDATES: &[char] = &[',', ';', '\t'];

/// How many lines the sniffer samples
const SNIFF_WINDOW: usize = 50;

/// Pick the delimiter with the highest total occurrence count over the first
/// lines of the file. Ties resolve to the earlier candidate, so a file with
/// no delimiter at all sniffs as comma.
pub fn sniff_delimiter(text: &str) -> char {
    let mut counts = [0usize; 3];
    for line in text.lines().take(SNIFF_WINDOW) {
        let mut in_quotes = false;
        for ch in line.chars() {
            if ch == '"' {
                in_quotes = !in_quotes;
            } else if !in_quotes {
                if let Some(i) = DELIMITER_CANDIDATES.iter().position(|&d| d == ch) {
                    counts[i] += 1;
                }
            }
        }
    }

    let best = (0..DELIMITER_CANDIDATES.len())
        .max_by_key(|&i| (counts[i], usize::MAX - i))
        .unwrap_or(0);
    debug!(delimiter = ?DELIMITER_CANDIDATES[best], counts = ?counts, "sniffed delimiter");
    DELIMITER_CANDIDATES[best]
}

/// Split one physical line into cells. Double-quoted fields may contain the
/// delimiter; a doubled quote inside a quoted field is a literal quote.
/// Returns `None` when quoting never terminates, in which case the caller
/// discards the line.
pub fn split_line(line: &str, delimiter: char) -> Option<Vec<String>> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == delimiter {
            cells.push(std::mem::take(&mut cell));
        } else {
            cell.push(ch);
        }
    }

    if in_quotes {
        return None;
    }
    cells.push(cell);
    Some(cells)
}

/// Parse the whole text into rows, skipping lines that do not split cleanly.
pub fn parse_rows(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        match split_line(line, delimiter) {
            Some(cells) => rows.push(cells),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "discarded malformed lines during parse");
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_comma() {
        let text = "a,b,c\n1,2,3\n4,5,6\n";
        assert_eq!(sniff_delimiter(text), ',');
    }

    #[test]
    fn test_sniff_semicolon() {
        let text = "a;b;c\n1;2;3\n4;5;6\n";
        assert_eq!(sniff_delimiter(text), ';');
    }

    #[test]
    fn test_sniff_tab() {
        let text = "a\tb\tc\n1\t2\t3\n";
        assert_eq!(sniff_delimiter(text), '\t');
    }

    #[test]
    fn test_sniff_no_delimiter_defaults_to_comma() {
        assert_eq!(sniff_delimiter("just a banner line\n"), ',');
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(
            split_line("a,b,c", ',').unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_split_quoted_delimiter() {
        assert_eq!(
            split_line("\"a,b\",c", ',').unwrap(),
            vec!["a,b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_split_doubled_quote() {
        assert_eq!(
            split_line("\"he said \"\"go\"\"\",x", ',').unwrap(),
            vec!["he said \"go\"".to_string(), "x".to_string()]
        );
    }

    #[test]
    fn test_split_unterminated_quote_is_discarded() {
        assert!(split_line("\"never closed,b,c", ',').is_none());
    }

    #[test]
    fn test_parse_rows_skips_bad_lines() {
        let text = "a,b\n\"broken,oops\nnope\"more\n1,2\n";
        let rows = parse_rows(text, ',');
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[1], vec!["1", "2"]);
    }

    #[test]
    fn test_parse_keeps_short_rows() {
        let rows = parse_rows("a,b,c\n1\n", ',');
        assert_eq!(rows[1], vec!["1"]);
    }
}
