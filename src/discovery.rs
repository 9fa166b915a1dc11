use crate::fetch::PageFetcher;
use crate::types::{DiscoveryResult, KeywordTaxonomy};
use crate::{extract, Result, ScraperError};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};
use url::Url;

/// Returns the network location of `url`: its host, plus the port when one is spelled out.
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Fetches the homepage and picks the internal links that match the taxonomy.
///
/// # Arguments
///
/// * `fetcher` - The strategy used to retrieve the homepage.
/// * `root_url` - The company homepage.
/// * `keywords` - The labels to look for.
///
/// # Returns
///
/// A `DiscoveryResult`, or a `DiscoveryError` if the homepage could not be retrieved.
#[instrument(skip(fetcher, keywords), fields(strategy = fetcher.name()))]
pub async fn discover(
    fetcher: &dyn PageFetcher,
    root_url: &str,
    keywords: &KeywordTaxonomy,
) -> Result<DiscoveryResult> {
    let root = Url::parse(root_url)
        .map_err(|e| ScraperError::DiscoveryError(format!("Invalid company URL {root_url}: {e}")))?;
    let company = network_location(&root).ok_or_else(|| {
        ScraperError::DiscoveryError(format!("Company URL has no host: {root_url}"))
    })?;

    let html = fetcher
        .fetch_html(&root)
        .await
        .map_err(|e| ScraperError::DiscoveryError(format!("Failed to retrieve homepage: {e}")))?;

    let links = internal_links(&html, &root)?;
    debug!("Found {} unique internal links", links.len());

    let pages = label_pages(&links, keywords);
    let result = DiscoveryResult {
        company,
        root_url: root,
        pages,
    };

    info!(
        "Discovered key pages: {}",
        serde_json::to_string_pretty(&result)?
    );
    Ok(result)
}

/// Resolves every anchor against `root` and keeps the unique ones on the same network location.
fn internal_links(html: &str, root: &Url) -> Result<BTreeSet<Url>> {
    let origin = network_location(root);

    Ok(extract::anchor_hrefs(html)?
        .iter()
        .filter_map(|href| root.join(href).ok())
        .filter(|link| network_location(link) == origin)
        .collect())
}

/// Maps each keyword to one matching link.
///
/// A link can fill several labels. When several links share a label the
/// highest-scoring one wins, then the lexicographically smallest URL.
fn label_pages(links: &BTreeSet<Url>, keywords: &KeywordTaxonomy) -> IndexMap<String, Url> {
    let mut best: HashMap<&str, (usize, &Url)> = HashMap::new();

    for link in links {
        let matched = keywords.matches(link.as_str());
        let score = matched.len();
        if score == 0 {
            continue;
        }

        for keyword in matched {
            // BTreeSet order means an equal score never displaces an earlier URL.
            let replace = best
                .get(keyword)
                .map_or(true, |(current, _)| score > *current);
            if replace {
                best.insert(keyword, (score, link));
            }
        }
    }

    keywords
        .iter()
        .filter_map(|keyword| {
            best.get(keyword)
                .map(|(_, link)| (keyword.to_string(), (*link).clone()))
        })
        .collect()
}
