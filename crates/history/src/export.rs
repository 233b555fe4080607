//! Render the history as CSV, HTML or Markdown.

use std::fs;
use std::io;
use std::path::Path;

use catalog::{PickerError, Result};
use tracing::info;

use crate::entry::HistoryEntry;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const CSV_HEADER: &str = "Discogs ID,Artist,Title,Year,Listened Date,Rating,Notes";

const HTML_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; background: #f5f5f5; }
h1 { color: #333; }
table { width: 100%; border-collapse: collapse; background: white; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
th { background: #333; color: white; padding: 12px; text-align: left; }
td { padding: 10px; border-bottom: 1px solid #ddd; }
tr:hover { background: #f9f9f9; }
.rating { color: #f39c12; }
";

/// Output formats for `export_to_file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
    Markdown,
}

impl ExportFormat {
    /// Usual file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }

    pub fn render(self, entries: &[HistoryEntry]) -> String {
        match self {
            Self::Csv => render_csv(entries),
            Self::Html => render_html(entries),
            Self::Markdown => render_markdown(entries),
        }
    }
}

/// Render `entries` and write them to `path`, replacing any existing file
pub fn export_to_file(format: ExportFormat, entries: &[HistoryEntry], path: &Path) -> Result<()> {
    fs::write(path, format.render(entries)).map_err(|source: io::Error| PickerError::HistoryIo {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

fn display_date(entry: &HistoryEntry) -> String {
    entry.listened_at().format(DATE_FORMAT).to_string()
}

fn stars(entry: &HistoryEntry) -> String {
    entry
        .rating()
        .map(|rating| "★".repeat(rating.stars() as usize))
        .unwrap_or_default()
}

fn escape_csv(text: &str) -> String {
    text.replace('"', "\"\"")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
}

fn render_csv(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "{},\"{}\",\"{}\",\"{}\",\"{}\",{},\"{}\"\n",
            entry.item_id(),
            escape_csv(entry.artist()),
            escape_csv(entry.title()),
            escape_csv(entry.year()),
            display_date(entry),
            entry.rating().map(|r| r.to_string()).unwrap_or_default(),
            escape_csv(entry.note().unwrap_or_default()),
        ));
    }
    out
}

fn render_html(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    out.push_str("<title>Listening History</title>\n<style>\n");
    out.push_str(HTML_STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str("<h1>🎵 Listening History</h1>\n");
    out.push_str(&format!(
        "<p>Total albums: <strong>{}</strong></p>\n",
        entries.len()
    ));
    out.push_str("<table>\n");
    out.push_str("<tr><th>Artist</th><th>Title</th><th>Year</th><th>Date</th><th>Rating</th></tr>\n");
    for entry in entries {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"rating\">{}</td></tr>\n",
            escape_html(entry.artist()),
            escape_html(entry.title()),
            escape_html(entry.year()),
            display_date(entry),
            stars(entry),
        ));
    }
    out.push_str("</table>\n</body>\n</html>\n");
    out
}

fn render_markdown(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    out.push_str("# 🎵 Listening History\n\n");
    out.push_str(&format!("Total albums: **{}**\n\n", entries.len()));
    out.push_str("| Artist | Title | Year | Date | Rating |\n");
    out.push_str("|--------|-------|------|------|--------|\n");
    for entry in entries {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_markdown(entry.artist()),
            escape_markdown(entry.title()),
            escape_markdown(entry.year()),
            display_date(entry),
            stars(entry),
        ));
    }
    out
}
