//! Selector-based extraction from GitHub HTML pages.
//!
//! Extraction is best effort: a selector that matches nothing yields `None`
//! or skips the entry, never an error. The only error is an invalid selector
//! literal.

use scraper::{ElementRef, Html, Selector};

use crate::result::{LanguageStats, RepositoryDetail, SearchHit};
use crate::{CrawlError, Result};

const SEARCH_MATCH: &str = ".search-match";
const OWNER_PRIMARY: &str = "span.author";
const OWNER_BREADCRUMB: &str = r#"nav[role="navigation"] ul li:first-child a"#;
const LANGUAGE_LINKS: &str = "div.Layout-sidebar li > a.Link--secondary";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CrawlError::Parse(format!("Failed to parse selector: {:?}", e)))
}

/// A parsed HTML document with first/all selection helpers.
pub struct Dom {
    html: Html,
}

impl Dom {
    /// Parses a document. Malformed markup is repaired, never rejected.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Returns the first element matching `css`.
    pub fn select_first(&self, css: &str) -> Result<Option<ElementRef<'_>>> {
        let selector = selector(css)?;
        Ok(self.html.select(&selector).next())
    }

    /// Returns every element matching `css`, in document order.
    pub fn select_all(&self, css: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = selector(css)?;
        Ok(self.html.select(&selector).collect())
    }
}

/// Concatenated text content of an element.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Attribute value of an element.
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

fn has_descendant(element: ElementRef<'_>, selector: &Selector) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|el| selector.matches(&el))
}

/// Extracts every anchor wrapping a highlighted search match.
///
/// Anchors without `href` are kept with `href: None`.
pub fn extract_search_results(html: &str) -> Result<Vec<SearchHit>> {
    let dom = Dom::parse(html);
    let marker = selector(SEARCH_MATCH)?;

    let hits = dom
        .select_all("a")?
        .into_iter()
        .filter(|anchor| has_descendant(*anchor, &marker))
        .map(|anchor| SearchHit {
            href: attr(anchor, "href"),
        })
        .collect();

    Ok(hits)
}

/// Extracts the owner and language breakdown of a repository page.
pub fn extract_repository_detail(html: &str) -> Result<RepositoryDetail> {
    let dom = Dom::parse(html);

    let owner_element = match dom.select_first(OWNER_PRIMARY)? {
        Some(element) => Some(element),
        None => dom.select_first(OWNER_BREADCRUMB)?,
    };
    let owner = owner_element.map(|el| text(el).trim().to_string());

    let span = selector("span")?;
    let mut language_stats = LanguageStats::new();
    for link in dom.select_all(LANGUAGE_LINKS)? {
        let mut spans = link.select(&span);
        let (Some(name), Some(share)) = (spans.next(), spans.next()) else {
            continue;
        };
        language_stats.insert(text(name).trim().to_string(), parse_percentage(&text(share)));
    }

    Ok(RepositoryDetail {
        owner,
        language_stats,
    })
}

/// Parses `"46.4%"` into `46.4`.
fn parse_percentage(value: &str) -> Option<f64> {
    value.replace('%', "").trim().parse().ok()
}
