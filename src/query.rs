//! Search kind and query representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CrawlError;

/// Category of content searched on the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Repositories,
    Issues,
    Wikis,
}

impl SearchKind {
    /// All supported kinds.
    pub const ALL: [SearchKind; 3] = [Self::Repositories, Self::Issues, Self::Wikis];

    /// Returns the value sent as the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repositories => "repositories",
            Self::Issues => "issues",
            Self::Wikis => "wikis",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CrawlError::InvalidSearchKind(s.to_string()))
    }
}

/// A search against the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search terms, combined disjunctively.
    pub terms: Vec<String>,
    /// Kind of results requested.
    pub kind: SearchKind,
}

impl SearchQuery {
    /// Creates a new query for the given terms and kind.
    pub fn new<I, S>(terms: I, kind: SearchKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// Joins the terms with the site's `OR` operator.
    pub fn query_string(&self) -> String {
        self.terms.join(" OR ")
    }

    /// Returns the query parameters for the search page.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query_string()),
            ("type", self.kind.as_str().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_kind_from_str() {
        assert_eq!("repositories".parse::<SearchKind>().unwrap(), SearchKind::Repositories);
        assert_eq!("issues".parse::<SearchKind>().unwrap(), SearchKind::Issues);
        assert_eq!("wikis".parse::<SearchKind>().unwrap(), SearchKind::Wikis);
    }

    #[test]
    fn test_search_kind_rejects_unknown() {
        let err = "invalid".parse::<SearchKind>().unwrap_err();
        assert!(matches!(err, CrawlError::InvalidSearchKind(ref v) if v == "invalid"));
        assert_eq!(err.to_string(), "Unsupported search type: invalid");
    }

    #[test]
    fn test_search_kind_is_case_sensitive() {
        assert!("Repositories".parse::<SearchKind>().is_err());
        assert!("".parse::<SearchKind>().is_err());
    }

    #[test]
    fn test_search_kind_display_round_trips() {
        for kind in SearchKind::ALL {
            assert_eq!(kind.to_string().parse::<SearchKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_search_kind_serialization() {
        let json = serde_json::to_string(&SearchKind::Wikis).unwrap();
        assert_eq!(json, "\"wikis\"");
        let kind: SearchKind = serde_json::from_str("\"issues\"").unwrap();
        assert_eq!(kind, SearchKind::Issues);
    }

    #[test]
    fn test_query_string_joins_with_or() {
        let query = SearchQuery::new(["openstack", "nova", "css"], SearchKind::Issues);
        assert_eq!(query.query_string(), "openstack OR nova OR css");
    }

    #[test]
    fn test_query_string_single_term() {
        let query = SearchQuery::new(["wagtail-json-widget"], SearchKind::Repositories);
        assert_eq!(query.query_string(), "wagtail-json-widget");
    }

    #[test]
    fn test_query_params() {
        let query = SearchQuery::new(["flask", "fastapi"], SearchKind::Repositories);
        assert_eq!(
            query.params(),
            vec![
                ("q", "flask OR fastapi".to_string()),
                ("type", "repositories".to_string()),
            ]
        );
    }
}
