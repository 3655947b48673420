//! Update message parser
//!
//! An update message is `"{header}\n{JSON}"` where the JSON block is the
//! `[topRuns, lesserRuns]` pair. Decode failures never surface as errors:
//! both run lists come back empty and the header is kept as-is.

use super::types::{ScoreDetails, UpdateMessage};

/// Separator between cells of the old plain-text table
const LEGACY_CELL_SEPARATOR: char = '|';

/// Header and separator lines preceding legacy table rows
const LEGACY_HEADER_LINES: usize = 2;

/// Parse a raw update message
pub fn parse_update_message(raw: &str) -> UpdateMessage {
    let (header, remainder) = raw.split_once('\n').unwrap_or((raw, ""));

    match decode_score_details(remainder) {
        Some(ScoreDetails(top_runs, lesser_runs)) => UpdateMessage {
            header: header.to_string(),
            top_runs,
            lesser_runs,
            legacy_rows: Vec::new(),
        },
        None => UpdateMessage {
            header: header.to_string(),
            top_runs: Vec::new(),
            lesser_runs: Vec::new(),
            legacy_rows: parse_legacy_rows(remainder),
        },
    }
}

/// Decode the JSON pair, `None` on any syntax or shape mismatch
fn decode_score_details(remainder: &str) -> Option<ScoreDetails> {
    let trimmed = remainder.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<ScoreDetails>(trimmed) {
        Ok(details) => Some(details),
        Err(e) => {
            tracing::debug!(error = %e, "Update message body is not a score details pair");
            None
        }
    }
}

/// Collect the cells of an old pipe-delimited table
fn parse_legacy_rows(remainder: &str) -> Vec<Vec<String>> {
    remainder
        .lines()
        .filter(|line| line.contains(LEGACY_CELL_SEPARATOR))
        .skip(LEGACY_HEADER_LINES)
        .map(|line| {
            line.split(LEGACY_CELL_SEPARATOR)
                .map(|cell| cell.trim().to_string())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::types::RunResult;

    fn sample_runs() -> (Vec<RunResult>, Vec<RunResult>) {
        let top = vec![
            RunResult::new("Celeste", "Any%", 40.25),
            RunResult::new("Celeste", "Any%", 12.0).level("Forsaken City", 0.5),
        ];
        let lesser = vec![RunResult::new("Hollow Knight", "112%", 3.5)];
        (top, lesser)
    }

    #[test]
    fn test_parse_well_formed() {
        let (top, lesser) = sample_runs();
        let raw = UpdateMessage::new("Updated Ava with 55.75 points", top.clone(), lesser.clone())
            .to_wire()
            .unwrap();

        let parsed = parse_update_message(&raw);
        assert_eq!(parsed.header, "Updated Ava with 55.75 points");
        assert_eq!(parsed.top_runs, top);
        assert_eq!(parsed.lesser_runs, lesser);
        assert!(parsed.legacy_rows.is_empty());
    }

    #[test]
    fn test_header_kept_unchanged() {
        let raw = "  spaced header: 1.00 pts  \n[[],[]]";
        let parsed = parse_update_message(raw);
        assert_eq!(parsed.header, "  spaced header: 1.00 pts  ");
        assert!(parsed.has_no_rows());
    }

    #[test]
    fn test_malformed_json_degrades() {
        let parsed = parse_update_message("Header\n[[{\"gameName\": oops");
        assert_eq!(parsed.header, "Header");
        assert!(parsed.top_runs.is_empty());
        assert!(parsed.lesser_runs.is_empty());
    }

    #[test]
    fn test_wrong_shape_degrades() {
        for body in [r#"{"top": []}"#, "[[]]", "[[],[],[]]", "[1, 2]", "42"] {
            let parsed = parse_update_message(&format!("Header\n{}", body));
            assert_eq!(parsed.header, "Header", "body: {}", body);
            assert!(parsed.top_runs.is_empty(), "body: {}", body);
            assert!(parsed.lesser_runs.is_empty(), "body: {}", body);
        }
    }

    #[test]
    fn test_no_newline_is_header_only() {
        let parsed = parse_update_message("User not found");
        assert_eq!(parsed.header, "User not found");
        assert!(parsed.has_no_rows());
    }

    #[test]
    fn test_splits_on_first_newline_only() {
        let raw = "Header\n[[],\n[]]";
        let parsed = parse_update_message(raw);
        assert_eq!(parsed.header, "Header");
        assert!(parsed.top_runs.is_empty());
        assert!(parsed.legacy_rows.is_empty());
    }

    #[test]
    fn test_legacy_table() {
        let raw = "Updated Ava\nGame - Category | Points\n--- | ---\nCeleste - Any% | 40.25\nSM64 - 16 Star | 12.00";
        let parsed = parse_update_message(raw);

        assert_eq!(parsed.header, "Updated Ava");
        assert!(parsed.top_runs.is_empty());
        assert_eq!(
            parsed.legacy_rows,
            vec![
                vec!["Celeste - Any%".to_string(), "40.25".to_string()],
                vec!["SM64 - 16 Star".to_string(), "12.00".to_string()],
            ]
        );
    }
}
