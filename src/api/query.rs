//! Request parameters and filters
//!
//! [`Params`] collects optional query parameters in insertion order. Unset
//! values are dropped and the API key is resolved only when the request is
//! about to be sent.

use url::Url;

use super::error::{RebrickError, RebrickResult};

/// Name of the API key parameter
pub const KEY_PARAM: &str = "key";

/// Name of the page parameter
pub const PAGE_PARAM: &str = "page";

// ============================================================================
// Pagination
// ============================================================================

/// Position within a paginated result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Explicit page number (1-indexed)
    Page(u32),
    /// `next` URL returned by the server
    Url(String),
}

impl Cursor {
    /// Extract the page number carried by this cursor
    pub fn page_number(&self) -> RebrickResult<String> {
        match self {
            Cursor::Page(page) => Ok(page.to_string()),
            Cursor::Url(url) => page_from_url(url),
        }
    }
}

impl From<u32> for Cursor {
    fn from(page: u32) -> Self {
        Cursor::Page(page)
    }
}

impl From<String> for Cursor {
    fn from(url: String) -> Self {
        Cursor::Url(url)
    }
}

/// Read the `page` query parameter from a `next` URL
fn page_from_url(raw: &str) -> RebrickResult<String> {
    let url = Url::parse(raw)
        .map_err(|e| RebrickError::InvalidCursor(format!("{}: {}", raw, e)))?;

    url.query_pairs()
        .find(|(name, _)| name == PAGE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| RebrickError::InvalidCursor(raw.to_string()))
}

/// Paging options shared by all list endpoints
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Page to fetch, first page when unset
    pub page: Option<Cursor>,
    /// Number of results per page
    pub page_size: Option<u32>,
    /// Field used for ordering, prefix with `-` for descending
    pub ordering: Option<String>,
}

impl PageRequest {
    /// Request a specific page
    pub fn at(cursor: impl Into<Cursor>) -> Self {
        PageRequest {
            page: Some(cursor.into()),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Ordered request parameters with optional values
#[derive(Debug, Clone, Default)]
pub struct Params {
    pairs: Vec<(&'static str, Option<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous value with the same name
    pub fn set<T: ToString>(mut self, name: &'static str, value: Option<T>) -> Self {
        let value = value.map(|v| v.to_string());
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
        self
    }

    /// Add a boolean flag sent as `0` or `1`
    pub fn flag(self, name: &'static str, value: bool) -> Self {
        self.set(name, Some(u8::from(value)))
    }

    /// Add a multi-valued parameter as a comma separated list
    pub fn list(self, name: &'static str, values: &[String]) -> Self {
        let joined = if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        };
        self.set(name, joined)
    }

    /// Add paging options
    pub fn page(self, page: &PageRequest) -> Self {
        let cursor = page.page.as_ref().map(|c| match c {
            Cursor::Page(n) => n.to_string(),
            Cursor::Url(url) => url.clone(),
        });

        self.set(PAGE_PARAM, cursor)
            .set("page_size", page.page_size)
            .set("ordering", page.ordering.as_deref())
    }

    /// Override the API key for this request only
    pub fn key(self, api_key: &str) -> Self {
        self.set(KEY_PARAM, Some(api_key))
    }

    /// Current value of a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Produce the final parameter list
    ///
    /// Unset values are dropped, the default API key is injected when none was
    /// given, and a page cursor URL is reduced to its page number.
    pub fn resolve(self, default_key: Option<&str>) -> RebrickResult<Vec<(&'static str, String)>> {
        let mut resolved: Vec<(&'static str, String)> = self
            .pairs
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .filter(|(name, value)| *name != KEY_PARAM || !value.is_empty())
            .collect();

        // Set default API key
        if !resolved.iter().any(|(name, _)| *name == KEY_PARAM) {
            let key = default_key
                .filter(|k| !k.is_empty())
                .ok_or(RebrickError::MissingApiKey)?;
            resolved.push((KEY_PARAM, key.to_string()));
        }

        // Parse page number from cursor URL
        for (name, value) in resolved.iter_mut() {
            if *name == PAGE_PARAM && value.starts_with("http") {
                *value = Cursor::Url(std::mem::take(value)).page_number()?;
            }
        }

        Ok(resolved)
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Filters for set searches
#[derive(Debug, Clone, Default)]
pub struct SetFilter {
    pub search: Option<String>,
    pub theme_id: Option<u32>,
    pub min_year: Option<u32>,
    pub max_year: Option<u32>,
    pub min_pieces: Option<u32>,
    pub max_pieces: Option<u32>,
}

/// Filters for minifig searches
#[derive(Debug, Clone, Default)]
pub struct MinifigFilter {
    pub search: Option<String>,
    /// Only minifigs contained in this set
    pub set_id: Option<String>,
    /// Only minifigs appearing in this theme
    pub theme_id: Option<u32>,
    pub min_pieces: Option<u32>,
    pub max_pieces: Option<u32>,
}

/// Filters for catalog part searches
#[derive(Debug, Clone, Default)]
pub struct PartFilter {
    pub search: Option<String>,
    pub part_id: Option<String>,
    pub part_ids: Vec<String>,
    pub part_cat_id: Option<u32>,
    pub color_id: Option<i32>,
    pub bricklink_id: Option<String>,
    pub brickowl_id: Option<String>,
    pub lego_id: Option<String>,
    pub ldraw_id: Option<String>,
    pub part_details: bool,
}

/// Filters for parts owned by a user
#[derive(Debug, Clone, Default)]
pub struct UserPartFilter {
    /// Free text search, honoured by the part list search only
    /// (`users::get_partlists_elements`); ignored for all owned parts
    pub search: Option<String>,
    pub part_id: Option<String>,
    pub part_cat_id: Option<u32>,
    pub color_id: Option<i32>,
    pub part_details: bool,
}

/// Detail flags for element listings
#[derive(Debug, Clone, Copy)]
pub struct ElementDetails {
    /// Include full part details
    pub part_details: bool,
    /// Include full color details (external IDs and names)
    pub color_details: bool,
    /// Include parts of minifigs contained in a set
    pub minifig_parts: bool,
}

impl Default for ElementDetails {
    fn default() -> Self {
        ElementDetails {
            part_details: false,
            color_details: true,
            minifig_parts: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_params_are_dropped() {
        let params = Params::new()
            .set("search", Some("castle"))
            .set::<u32>("theme_id", None)
            .set("min_year", Some(1980));

        let resolved = params.resolve(Some("abc")).unwrap();

        assert_eq!(
            resolved,
            vec![
                ("search", "castle".to_string()),
                ("min_year", "1980".to_string()),
                ("key", "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_explicit_key_wins() {
        let resolved = Params::new().key("mine").resolve(Some("default")).unwrap();
        assert_eq!(resolved, vec![("key", "mine".to_string())]);
    }

    #[test]
    fn test_missing_key_fails() {
        let result = Params::new().set("search", Some("x")).resolve(None);
        assert!(matches!(result, Err(RebrickError::MissingApiKey)));

        let result = Params::new().key("").resolve(Some(""));
        assert!(matches!(result, Err(RebrickError::MissingApiKey)));
    }

    #[test]
    fn test_cursor_url_is_reduced_to_page_number() {
        let page = PageRequest::at(
            "https://rebrickable.com/api/v3/lego/colors/?key=abc&page=3&page_size=100".to_string(),
        );
        let resolved = Params::new().page(&page).resolve(Some("abc")).unwrap();

        assert_eq!(resolved[0], ("page", "3".to_string()));
    }

    #[test]
    fn test_cursor_url_without_page_fails_resolve() {
        let cursor = "https://rebrickable.com/api/v3/lego/colors/?key=abc".to_string();
        let result = Params::new().page(&PageRequest::at(cursor)).resolve(Some("abc"));

        assert!(matches!(result, Err(RebrickError::InvalidCursor(_))));
    }

    #[test]
    fn test_cursor_without_page_is_invalid() {
        let cursor = Cursor::Url("https://rebrickable.com/api/v3/lego/colors/?key=abc".to_string());
        assert!(matches!(cursor.page_number(), Err(RebrickError::InvalidCursor(_))));
        assert_eq!(Cursor::Page(7).page_number().unwrap(), "7");
    }

    #[test]
    fn test_flags_and_lists() {
        let params = Params::new()
            .flag("inc_part_details", true)
            .flag("inc_color_details", false)
            .list("part_nums", &["3001".to_string(), "3002".to_string()])
            .list("empty", &[]);

        assert_eq!(params.get("inc_part_details"), Some("1"));
        assert_eq!(params.get("inc_color_details"), Some("0"));
        assert_eq!(params.get("part_nums"), Some("3001,3002"));
        assert_eq!(params.get("empty"), None);
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let params = Params::new().set("page", Some(1)).set("page", Some(2));
        assert_eq!(params.get("page"), Some("2"));
    }

    #[test]
    fn test_element_details_default() {
        let details = ElementDetails::default();
        assert!(!details.part_details);
        assert!(details.color_details);
        assert!(!details.minifig_parts);
    }
}
