use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::pagination::{self, DEFAULT_ITEMS_PER_PAGE};

/// Entity specific sort field accepted by a list endpoint.
pub trait SortKey: Copy + Eq + Default + Debug + Send + Sync + 'static {
    /// Value sent as `sort_by`.
    fn as_str(&self) -> &'static str;
    /// Parses a `sort_by` value, rejecting fields the endpoint does not know.
    fn parse(value: &str) -> Option<Self>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Everything that determines which slice of a list is fetched.
///
/// Equal descriptors describe the same request, so the controller never
/// fetches the same descriptor twice in a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDescriptor<S> {
    /// Trimmed search term, `None` when blank.
    pub search: Option<String>,
    /// Active filters only.
    pub filters: BTreeMap<String, String>,
    pub sort_by: S,
    pub order: SortDirection,
    /// 1-indexed page number.
    pub page: usize,
    pub per_page: usize,
}

impl<S: SortKey> Default for QueryDescriptor<S> {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl<S: SortKey> QueryDescriptor<S> {
    pub fn new(per_page: usize) -> Self {
        Self {
            search: None,
            filters: BTreeMap::new(),
            sort_by: S::default(),
            order: SortDirection::default(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn with_sort(mut self, sort_by: S, order: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = normalize_search(search);
        self
    }

    pub fn with_filter(mut self, name: &str, value: &str) -> Self {
        self.filters.insert(name.to_string(), value.to_string());
        self
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    pub fn skip(&self) -> usize {
        pagination::skip(self.page, self.per_page)
    }

    pub fn page_count(&self, total: usize) -> usize {
        pagination::page_count(total, self.per_page)
    }

    /// Query string parameters of the list endpoint.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 5);
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.extend(
            self.filters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        pairs.push(("sort_by".to_string(), self.sort_by.as_str().to_string()));
        pairs.push(("order".to_string(), self.order.as_str().to_string()));
        pairs.push(("skip".to_string(), self.skip().to_string()));
        pairs.push(("limit".to_string(), self.per_page.to_string()));
        pairs
    }
}

/// Trims a raw search term; blank input means no search.
pub fn normalize_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::product::ProductSort;

    #[test]
    fn serializes_only_active_parts() {
        let query = QueryDescriptor::<ProductSort>::new(10)
            .with_sort(ProductSort::Price, SortDirection::Asc)
            .with_filter("category_id", "c-1");
        let query = QueryDescriptor { page: 3, ..query };

        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("category_id".to_string(), "c-1".to_string()),
                ("sort_by".to_string(), "price".to_string()),
                ("order".to_string(), "asc".to_string()),
                ("skip".to_string(), "20".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn equality_is_by_value() {
        let a = QueryDescriptor::<ProductSort>::default().with_search("  laptop ");
        let b = QueryDescriptor::<ProductSort>::default().with_search("laptop");
        assert_eq!(a, b);
        assert_ne!(a, QueryDescriptor::default());
    }

    #[test]
    fn blank_search_is_absent() {
        assert_eq!(normalize_search("   "), None);
        assert_eq!(normalize_search(" tv "), Some("tv".to_string()));
    }

    #[test]
    fn parses_direction_case_insensitively() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("sideways"), None);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }
}
