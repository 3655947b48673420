//! Score table rendering
//!
//! Rows are numbered by a running, weighted position: each row adds its
//! level fraction to the total, so an individual-level run only counts as
//! part of a full-game run. The total starts at zero for the top runs and
//! keeps going through the lesser runs, since both tables are pages of a
//! single ranking.

use super::types::{RunResult, UpdateMessage};
use std::fmt;

/// Label above the top runs table
pub const TOP_RUNS_LABEL: &str = "Top 100 runs:";

/// Label above the lesser runs table
pub const LESSER_RUNS_LABEL: &str = "Other runs:";

/// Column titles of every score table
pub const COLUMN_TITLES: [&str; 3] = ["#", "Game - Category (Level)", "Points"];

/// Running weighted position across one rendering
#[derive(Debug, Clone, Default)]
pub struct PositionAccumulator {
    total: f64,
}

impl PositionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row's level fraction and return the rounded position
    pub fn advance(&mut self, level_fraction: f64) -> f64 {
        self.total += level_fraction;
        round_position(self.total)
    }

    /// Raw (unrounded) running total
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Round a position to 2 decimal places
pub fn round_position(position: f64) -> f64 {
    (position * 100.0).round() / 100.0
}

/// Display a rounded position without trailing zeros (`0.5`, `1`, `2.25`)
pub fn format_position(position: f64) -> String {
    let rounded = round_position(position);
    // Avoid "-0" for tiny negative totals
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// One displayed table row
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub position: String,
    pub description: String,
    pub points: String,
}

impl RenderedRow {
    fn from_run(run: &RunResult, accumulator: &mut PositionAccumulator) -> Self {
        Self {
            position: format_position(accumulator.advance(run.level_fraction)),
            description: run.description(),
            points: format!("{:.2}", run.points),
        }
    }
}

/// A labelled table
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSection {
    /// `None` for an old plain-text table, which never had a label
    pub label: Option<&'static str>,
    pub rows: Vec<RenderedRow>,
}

/// Header text plus the non-empty table sections
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedScoreboard {
    pub header: String,
    pub sections: Vec<ScoreSection>,
}

/// Render a parsed update message
///
/// Empty run lists produce no section at all, so a message without rows
/// renders as its header alone.
pub fn render_score_table(message: &UpdateMessage) -> RenderedScoreboard {
    let mut accumulator = PositionAccumulator::new();
    let mut sections = Vec::new();

    if !message.top_runs.is_empty() {
        sections.push(render_section(TOP_RUNS_LABEL, &message.top_runs, &mut accumulator));
    }

    if !message.lesser_runs.is_empty() {
        sections.push(render_section(LESSER_RUNS_LABEL, &message.lesser_runs, &mut accumulator));
    }

    if sections.is_empty() && !message.legacy_rows.is_empty() {
        sections.push(render_legacy_section(&message.legacy_rows));
    }

    RenderedScoreboard {
        header: message.header.clone(),
        sections,
    }
}

fn render_section(
    label: &'static str,
    runs: &[RunResult],
    accumulator: &mut PositionAccumulator,
) -> ScoreSection {
    ScoreSection {
        label: Some(label),
        rows: runs
            .iter()
            .map(|run| RenderedRow::from_run(run, accumulator))
            .collect(),
    }
}

fn render_legacy_section(rows: &[Vec<String>]) -> ScoreSection {
    ScoreSection {
        label: None,
        rows: rows
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                let (description, rest) = cells.split_first().map_or(("", &[][..]), |(first, rest)| {
                    (first.as_str(), rest)
                });
                RenderedRow {
                    position: (i + 1).to_string(),
                    description: description.to_string(),
                    points: rest.join(" | "),
                }
            })
            .collect(),
    }
}

impl RenderedScoreboard {
    /// Position column of every row, in display order
    pub fn positions(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter().map(|r| r.position.as_str()))
            .collect()
    }
}

impl fmt::Display for RenderedScoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header.trim())?;

        for section in &self.sections {
            writeln!(f)?;
            if let Some(label) = section.label {
                writeln!(f)?;
                write!(f, "{}", label)?;
            }

            let position_width = section
                .rows
                .iter()
                .map(|r| r.position.len())
                .chain(std::iter::once(COLUMN_TITLES[0].len()))
                .max()
                .unwrap_or(1);
            let description_width = section
                .rows
                .iter()
                .map(|r| r.description.chars().count())
                .chain(std::iter::once(COLUMN_TITLES[1].len()))
                .max()
                .unwrap_or(1);

            writeln!(f)?;
            write!(
                f,
                "{:<pw$}  {:<dw$}  {}",
                COLUMN_TITLES[0],
                COLUMN_TITLES[1],
                COLUMN_TITLES[2],
                pw = position_width,
                dw = description_width
            )?;
            for row in &section.rows {
                writeln!(f)?;
                write!(
                    f,
                    "{:<pw$}  {:<dw$}  {}",
                    row.position,
                    row.description,
                    row.points,
                    pw = position_width,
                    dw = description_width
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fraction: f64) -> RunResult {
        RunResult::new("Game", "Cat", 1.0).fraction(fraction)
    }

    #[test]
    fn test_weighted_positions() {
        let message = UpdateMessage::new("h", vec![run(0.5), run(0.5), run(1.0)], vec![]);
        let rendered = render_score_table(&message);
        assert_eq!(rendered.positions(), vec!["0.5", "1", "2"]);
    }

    #[test]
    fn test_positions_continue_into_lesser_runs() {
        let message = UpdateMessage::new("h", vec![run(0.5), run(0.5), run(1.0)], vec![run(1.0)]);
        let rendered = render_score_table(&message);

        assert_eq!(rendered.sections.len(), 2);
        assert_eq!(rendered.sections[1].label, Some(LESSER_RUNS_LABEL));
        assert_eq!(rendered.sections[1].rows[0].position, "3");
    }

    #[test]
    fn test_each_render_starts_from_zero() {
        let message = UpdateMessage::new("h", vec![run(1.0), run(1.0)], vec![]);
        let first = render_score_table(&message);
        let second = render_score_table(&message);
        assert_eq!(first.positions(), second.positions());
        assert_eq!(second.positions(), vec!["1", "2"]);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let mut acc = PositionAccumulator::new();
        assert_eq!(acc.advance(0.1), 0.1);
        assert_eq!(acc.advance(0.2), 0.3);
        assert_eq!(acc.advance(0.333), 0.63);
        assert_eq!(format_position(0.6333), "0.63");
    }

    #[test]
    fn test_points_two_decimals() {
        let message = UpdateMessage::new(
            "h",
            vec![RunResult::new("Celeste", "Any%", 40.0).level("1A", 0.25)],
            vec![],
        );
        let row = &render_score_table(&message).sections[0].rows[0];
        assert_eq!(row.points, "40.00");
        assert_eq!(row.description, "Celeste - Any% (1A)");
        assert_eq!(row.position, "0.25");
    }

    #[test]
    fn test_empty_sections_omitted() {
        let only_lesser = UpdateMessage::new("h", vec![], vec![run(1.0)]);
        let rendered = render_score_table(&only_lesser);
        assert_eq!(rendered.sections.len(), 1);
        assert_eq!(rendered.sections[0].label, Some(LESSER_RUNS_LABEL));

        let empty = UpdateMessage::new("Only a header", vec![], vec![]);
        let rendered = render_score_table(&empty);
        assert!(rendered.sections.is_empty());
        assert_eq!(rendered.to_string(), "Only a header");
    }

    #[test]
    fn test_legacy_rows_use_ordinals() {
        let mut message = UpdateMessage::new("h", vec![], vec![]);
        message.legacy_rows = vec![
            vec!["A - B".to_string(), "10.00".to_string()],
            vec!["C - D".to_string(), "5.00".to_string()],
        ];
        let rendered = render_score_table(&message);
        assert_eq!(rendered.sections[0].label, None);
        assert_eq!(rendered.positions(), vec!["1", "2"]);
        assert_eq!(rendered.sections[0].rows[1].points, "5.00");
    }

    #[test]
    fn test_text_output() {
        let message = UpdateMessage::new("Updated", vec![run(1.0)], vec![]);
        let text = render_score_table(&message).to_string();
        assert!(text.starts_with("Updated\n\nTop 100 runs:\n"));
        assert!(text.contains("Game - Cat"));
        assert!(text.ends_with("1.00"));
    }
}
