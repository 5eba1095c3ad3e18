//! Target site description: where to search and how its result cards are laid out.

use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{validate_selector, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.walgreens.com";
pub const DEFAULT_SEARCH_PATH: &str = "/search/results.jsp?Ntt={query}";
const QUERY_PLACEHOLDER: &str = "{query}";

/// CSS selectors for the parts of a results page the extractor reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// One element per product card
    pub card: String,
    /// Title anchor inside a card; its `href` is the product link
    pub title_link: String,
    /// Wrapper around all price information inside a card
    pub price_container: String,
    /// Non-numeric message ("Out of stock") inside the price container
    pub price_message: String,
    /// Element whose children hold the split price digits
    pub price_value: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            card: ".wag-product-cards".to_string(),
            title_link: ".wag-prod-title > a".to_string(),
            price_container: ".wag-prod-price-info".to_string(),
            price_message: ".wag-price-msg".to_string(),
            price_value: ".product__price > .product__price".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub base_url: String,
    /// Path and query template; `{query}` is replaced by the encoded search text
    pub search_path: String,
    #[serde(default)]
    pub selectors: SiteSelectors,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            selectors: SiteSelectors::default(),
        }
    }
}

impl SiteProfile {
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        format!(
            "{}{}",
            self.base_url,
            self.search_path.replace(QUERY_PLACEHOLDER, &encoded)
        )
    }

    /// Product links on the results page are site-relative; they are
    /// prefixed with the base URL as-is.
    pub fn absolute_url(&self, href: &str) -> String {
        format!("{}{}", self.base_url, href)
    }
}

impl Validate for SiteProfile {
    fn validate(&self) -> Result<()> {
        validate_url("site.base_url", &self.base_url)?;

        if !self.search_path.contains(QUERY_PLACEHOLDER) {
            return Err(MatchError::InvalidConfigValueError {
                field: "site.search_path".to_string(),
                value: self.search_path.clone(),
                reason: format!("Search path must contain the {} placeholder", QUERY_PLACEHOLDER),
            });
        }

        let selectors = &self.selectors;
        validate_selector("site.selectors.card", &selectors.card)?;
        validate_selector("site.selectors.title_link", &selectors.title_link)?;
        validate_selector("site.selectors.price_container", &selectors.price_container)?;
        validate_selector("site.selectors.price_message", &selectors.price_message)?;
        validate_selector("site.selectors.price_value", &selectors.price_value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_percent_encodes_query() {
        let site = SiteProfile::default();
        assert_eq!(
            site.search_url("Advil Liqui-Gels 200mg"),
            "https://www.walgreens.com/search/results.jsp?Ntt=Advil%20Liqui-Gels%20200mg"
        );
        assert_eq!(
            site.search_url("A&B"),
            "https://www.walgreens.com/search/results.jsp?Ntt=A%26B"
        );
    }

    #[test]
    fn test_absolute_url_is_plain_concatenation() {
        let site = SiteProfile::default();
        assert_eq!(
            site.absolute_url("/store/c/advil/ID=prod123-product"),
            "https://www.walgreens.com/store/c/advil/ID=prod123-product"
        );
    }

    #[test]
    fn test_default_profile_is_valid() {
        assert!(SiteProfile::default().validate().is_ok());
    }

    #[test]
    fn test_search_path_without_placeholder_is_rejected() {
        let site = SiteProfile {
            search_path: "/search?q=".to_string(),
            ..SiteProfile::default()
        };
        assert!(site.validate().is_err());
    }
}
