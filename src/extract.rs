use crate::{Result, ScraperError};
use scraper::{Html, Node, Selector};
use tracing::instrument;

/// Elements whose text never counts as visible page content.
const SKIPPED_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Flattens an HTML document into its visible text.
///
/// Every text node outside `script`, `style` and `noscript` is trimmed, blank
/// nodes are dropped and the rest are joined with newlines. A page with no
/// visible text yields an empty string rather than an error.
#[instrument(skip(html), fields(html_length = html.len()))]
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => SKIPPED_TAGS.contains(&element.name()),
                _ => false,
            });
            let trimmed = text.trim();
            (!hidden && !trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the raw `href` value of every anchor in the document, in document order.
pub fn anchor_hrefs(html: &str) -> Result<Vec<String>> {
    let selector = Selector::parse("a[href]")
        .map_err(|e| ScraperError::ExtractionError(format!("invalid anchor selector: {e}")))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect())
}
