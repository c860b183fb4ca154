//! Paginated listings

use serde::{Deserialize, Serialize};

/// Position of a page within a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub previous: Option<String>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// `{results, count, next, previous}` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// A single page holding every result.
    pub fn complete(results: Vec<T>) -> Self {
        let count = results.len() as u64;

        Self {
            results,
            pagination: Pagination {
                count,
                next: None,
                previous: None,
            },
        }
    }
}

/// Listing endpoints answer with either a bare list or a page envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Page<T>),
    List(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_page(self) -> Page<T> {
        match self {
            Listing::Page(page) => page,
            Listing::List(results) => Page::complete(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bare_lists_become_a_single_page() -> TestResult {
        let listing: Listing<u32> = serde_json::from_str("[1, 2, 3]")?;
        let page = listing.into_page();

        assert_eq!(page.results, vec![1, 2, 3]);
        assert_eq!(page.pagination.count, 3);
        assert!(!page.pagination.has_next());

        Ok(())
    }

    #[test]
    fn envelopes_keep_their_cursors() -> TestResult {
        let listing: Listing<u32> = serde_json::from_str(
            r#"{
                "results": [4],
                "count": 11,
                "next": "/orders/?page=3",
                "previous": "/orders/?page=1"
            }"#,
        )?;
        let page = listing.into_page();

        assert_eq!(page.results, vec![4]);
        assert_eq!(page.pagination.count, 11);
        assert!(page.pagination.has_next());
        assert!(page.pagination.has_previous());

        Ok(())
    }
}
