use crate::types::SummaryDocument;
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the document as pretty-printed UTF-8 JSON.
pub fn save_json(document: &SummaryDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    info!("Saved: {}", path.display());
    Ok(())
}

/// Reads a document previously written by [`save_json`].
pub fn load_json(path: &Path) -> Result<SummaryDocument> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Renders every non-empty summary as a `[<Label> Page]` section.
pub fn render_text(document: &SummaryDocument) -> String {
    document
        .summaries
        .iter()
        .filter_map(|(label, page)| {
            let summary = page.summary.trim();
            (!summary.is_empty()).then(|| format!("[{} Page]\n{}\n", title_case(label), summary))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Upper-cases the first letter of each alphabetic run and lower-cases the rest.
fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut at_word_start = true;
    for c in label.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
