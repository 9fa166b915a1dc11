use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// The topic labels looked for in a site's internal links, in priority order.
pub const TARGET_KEYWORDS: &[&str] = &[
    "about",
    "team",
    "mission",
    "values",
    "services",
    "solutions",
    "products",
    "industries",
    "clients",
    "case-studies",
    "projects",
    "blog",
    "insights",
    "resources",
    "news",
    "careers",
    "jobs",
    "contact",
];

/// An ordered list of lowercase topic labels used to score and label links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordTaxonomy(Vec<String>);

impl From<Vec<String>> for KeywordTaxonomy {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<KeywordTaxonomy> for Vec<String> {
    fn from(taxonomy: KeywordTaxonomy) -> Self {
        taxonomy.0
    }
}

impl Default for KeywordTaxonomy {
    fn default() -> Self {
        Self::new(TARGET_KEYWORDS.iter().copied())
    }
}

impl KeywordTaxonomy {
    /// Builds a taxonomy from the given labels. Labels are lowercased, blanks and repeats dropped.
    pub fn new(labels: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim().to_lowercase();
            if !label.is_empty() && !keywords.contains(&label) {
                keywords.push(label);
            }
        }
        Self(keywords)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|k| k == label)
    }

    /// Returns the keywords occurring anywhere in the lowercased `url`.
    pub fn matches<'a>(&'a self, url: &str) -> Vec<&'a str> {
        let lowered = url.to_lowercase();
        self.iter().filter(|kw| lowered.contains(kw)).collect()
    }

    /// Relevance of a link: how many keywords it contains.
    pub fn score(&self, url: &str) -> usize {
        self.matches(url).len()
    }
}

/// The labeled subset of a site's internal links chosen for summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// The network location of the root URL, e.g. `example.com`.
    pub company: String,
    pub root_url: Url,
    /// Label to page URL, in taxonomy order.
    pub pages: IndexMap<String, Url>,
}

/// A single page's generated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub summary: String,
}

/// The aggregated output for one company. Pages that failed are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub company: String,
    pub summaries: IndexMap<String, PageSummary>,
}

impl SummaryDocument {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            summaries: IndexMap::new(),
        }
    }
}

/// What an extraction request answers with: the document, or a single error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Document(SummaryDocument),
    Error { error: String },
}

impl ExtractionOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ExtractionOutcome::Error { .. })
    }
}
