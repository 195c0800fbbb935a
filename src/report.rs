//! Markdown report artifact.
//!
//! The report is deliberately plain: a fixed heading followed by the full
//! analysis text. It carries no timestamps, so identical input produces a
//! byte-identical file.

use anyhow::{Context, Result};
use std::path::Path;

const REPORT_HEADING: &str = "# BIM Analysis Report";

/// Render the report content from the full analysis text.
pub fn render_report(analysis: &str) -> String {
    format!("{}\n\n{}\n", REPORT_HEADING, analysis)
}

/// Write the report to a local file.
pub fn write_report(path: &Path, analysis: &str) -> Result<()> {
    std::fs::write(path, render_report(analysis))
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_has_heading_then_full_text() {
        let rendered = render_report("The model looks consistent.");

        assert!(rendered.starts_with("# BIM Analysis Report\n\n"));
        assert!(rendered.contains("The model looks consistent."));
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_report(&path, "full analysis text").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert_eq!(content, render_report("full analysis text"));
    }

    #[test]
    fn test_write_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("report.md");

        assert!(write_report(&path, "text").is_err());
    }
}
