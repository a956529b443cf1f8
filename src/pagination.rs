//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The page number, starting at 1.
    pub number: u64,
    /// The maximum number of records on the page.
    pub size: u64,
}

impl Page {
    /// Build a page from raw query parameters.
    ///
    /// Missing, non-numeric or non-positive values fall back to the defaults
    /// in `config`, and the page size is clamped to `config.max_page_size`.
    pub fn from_params(page: Option<&str>, per_page: Option<&str>, config: &PaginationConfig) -> Self {
        let number = parse_positive(page).unwrap_or(config.default_page.max(1));
        let size = parse_positive(per_page)
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));

        Self { number, size }
    }

    /// The first page with the default size.
    pub fn first(config: &PaginationConfig) -> Self {
        Self::from_params(None, None, config)
    }

    /// The number of records to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    /// The maximum number of records on this page.
    pub fn limit(&self) -> u64 {
        self.size
    }
}

fn parse_positive(text: Option<&str>) -> Option<u64> {
    text.and_then(|text| text.trim().parse::<i64>().ok())
        .filter(|number| *number >= 1)
        .map(|number| number as u64)
}

#[cfg(test)]
mod tests {
    use crate::pagination::{Page, PaginationConfig};

    #[test]
    fn defaults_to_first_page_of_ten() {
        let page = Page::from_params(None, None, &PaginationConfig::default());

        assert_eq!(page, Page { number: 1, size: 10 });
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn computes_offset_from_page_number() {
        let page = Page::from_params(Some("3"), Some("10"), &PaginationConfig::default());

        assert_eq!(page.offset(), 20);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn page_below_one_is_first_page() {
        let config = PaginationConfig::default();

        assert_eq!(Page::from_params(Some("0"), None, &config).number, 1);
        assert_eq!(Page::from_params(Some("-4"), None, &config).number, 1);
    }

    #[test]
    fn non_numeric_values_use_defaults() {
        let page = Page::from_params(Some("two"), Some("lots"), &PaginationConfig::default());

        assert_eq!(page, Page { number: 1, size: 10 });
    }

    #[test]
    fn page_size_is_clamped() {
        let config = PaginationConfig::default();

        assert_eq!(Page::from_params(None, Some("0"), &config).size, 10);
        assert_eq!(Page::from_params(None, Some("1000"), &config).size, 100);
    }
}
