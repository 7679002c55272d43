//! Local export of the current note list. No store round-trip.

use notes_types::Note;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

pub fn export_notes(notes: &[Note], format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(notes).unwrap_or_default(),
        ExportFormat::Markdown => notes
            .iter()
            .map(|n| {
                let tag = match n.tag_str() {
                    "" => String::new(),
                    t => format!(" [{}]", t),
                };
                format!("<!-- note {}{} @ {} -->\n{}\n", n.id, tag, n.timestamp, n.markdown.trim_end())
            })
            .collect::<Vec<_>>()
            .join("\n---\n\n"),
    }
}
