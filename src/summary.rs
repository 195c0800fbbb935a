//! Plain-text data summary sent to the language model.
//!
//! The summary keeps the prompt small: per-type counts over a bounded
//! sample plus, when checks ran, the first few consistency findings.

use crate::models::TypeTally;

/// Findings beyond this many are counted but not rendered.
pub const MAX_FINDINGS_SHOWN: usize = 10;

/// Render the data summary for the prompt.
///
/// `findings` is `None` when no checks were configured; the inconsistency
/// section is omitted entirely in that case.
pub fn render_data_summary(
    total_objects: usize,
    sampled_objects: usize,
    tally: &TypeTally,
    findings: Option<&[String]>,
) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("Objects in model: {}\n", total_objects));
    summary.push_str(&format!("Objects sampled: {}\n", sampled_objects));

    summary.push_str("Types found:\n");
    if tally.is_empty() {
        summary.push_str("- (none)\n");
    }
    for (type_tag, count) in tally.iter() {
        summary.push_str(&format!("- {}: {}\n", type_tag, count));
    }

    if let Some(findings) = findings {
        summary.push('\n');
        if findings.is_empty() {
            summary.push_str("No inconsistencies found.\n");
        } else {
            if findings.len() > MAX_FINDINGS_SHOWN {
                summary.push_str(&format!(
                    "Inconsistencies found: {} (showing first {})\n",
                    findings.len(),
                    MAX_FINDINGS_SHOWN
                ));
            } else {
                summary.push_str(&format!("Inconsistencies found: {}\n", findings.len()));
            }
            for finding in findings.iter().take(MAX_FINDINGS_SHOWN) {
                summary.push_str(&format!("- {}\n", finding));
            }
        }
    }

    summary
}
