use crate::config::SiteProfile;
use crate::core::extractor::extract_records;
use crate::core::matcher::find_best_match;
use crate::domain::model::{CandidateRecord, MatchResult};
use crate::domain::ports::PageSource;
use crate::utils::error::{MatchError, Result};
use tracing::debug;

/// Searches the target site for one query and returns the closest listing.
pub struct ProductSearch<P: PageSource> {
    pages: P,
    site: SiteProfile,
    min_score: f64,
}

impl<P: PageSource> ProductSearch<P> {
    pub fn new(pages: P, site: SiteProfile) -> Self {
        Self {
            pages,
            site,
            min_score: 0.0,
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    /// `Ok(None)` means the site returned no usable candidates. Page faults
    /// are reported as `SearchFailed`, except those that mean the engine
    /// itself is gone, which are passed through unchanged.
    pub async fn search(&self, query: &str) -> Result<Option<MatchResult>> {
        let url = self.site.search_url(query);
        debug!("Opening: {}", url);

        let page = match self.pages.render(&url).await {
            Ok(page) => page,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                return Err(MatchError::SearchFailed {
                    query: query.to_string(),
                    cause: e.to_string(),
                })
            }
        };

        let records = extract_records(&page.html, &self.site);
        debug!("Extracted {} candidates from {}", records.len(), page.url);

        select_best(query, records, self.min_score)
    }
}

/// Score `records` against `query` and keep the best one, if any clears
/// `min_score`.
pub fn select_best(
    query: &str,
    mut records: Vec<CandidateRecord>,
    min_score: f64,
) -> Result<Option<MatchResult>> {
    if records.is_empty() {
        return Ok(None);
    }

    let titles: Vec<&str> = records.iter().map(CandidateRecord::title_or_empty).collect();
    let best = find_best_match(query, &titles)?;

    if best.score < min_score {
        debug!(
            "Best candidate for '{}' scored {:.3}, below minimum {:.3}",
            query, best.score, min_score
        );
        return Ok(None);
    }

    Ok(Some(MatchResult {
        record: records.swap_remove(best.index),
        score: best.score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RenderedPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixturePage {
        html: String,
        requested: Mutex<Vec<String>>,
    }

    impl FixturePage {
        fn new(html: &str) -> Self {
            Self {
                html: html.to_string(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource for FixturePage {
        async fn render(&self, url: &str) -> Result<RenderedPage> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(RenderedPage {
                url: url.to_string(),
                html: self.html.clone(),
            })
        }
    }

    struct FailingPage {
        fatal: bool,
    }

    #[async_trait]
    impl PageSource for FailingPage {
        async fn render(&self, url: &str) -> Result<RenderedPage> {
            if self.fatal {
                Err(MatchError::EngineUnavailable {
                    message: "browser process exited".to_string(),
                })
            } else {
                Err(MatchError::NavigationFailed {
                    url: url.to_string(),
                    message: "net::ERR_TIMED_OUT".to_string(),
                })
            }
        }
    }

    const RESULTS: &str = r#"
        <div class="wag-product-cards">
          <div class="wag-prod-title"><a href="/p/1">Advil Tablets 200mg</a></div>
          <div class="wag-prod-price-info"><span class="wag-price-msg">Out of stock</span></div>
        </div>
        <div class="wag-product-cards">
          <div class="wag-prod-title"><a href="/p/2">Tylenol Caplets</a></div>
        </div>
        <div class="wag-product-cards">
          <div class="wag-prod-title"><a href="/p/3">Advil Liqui-Gels</a></div>
          <div class="wag-prod-price-info">
            <div class="product__price"><span class="product__price">10<sup>49</sup></span></div>
          </div>
        </div>
    "#;

    #[tokio::test]
    async fn test_search_selects_closest_candidate() {
        let search = ProductSearch::new(FixturePage::new(RESULTS), SiteProfile::default());

        let matched = search.search("Advil").await.unwrap().unwrap();
        assert_eq!(matched.record.title.as_deref(), Some("Advil Liqui-Gels"));
        assert_eq!(
            matched.record.url.as_deref(),
            Some("https://www.walgreens.com/p/3")
        );
        assert_eq!(matched.record.price.as_deref(), Some("10.49"));
        assert!(matched.score > 0.4 && matched.score <= 1.0);

        let requested = search.pages.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec!["https://www.walgreens.com/search/results.jsp?Ntt=Advil".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_results_is_no_result() {
        let search = ProductSearch::new(
            FixturePage::new("<html><body><p>No results</p></body></html>"),
            SiteProfile::default(),
        );
        assert!(search.search("Unobtainium").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_page_fault_becomes_search_failed() {
        let search = ProductSearch::new(FailingPage { fatal: false }, SiteProfile::default());
        let err = search.search("Advil").await.unwrap_err();
        match err {
            MatchError::SearchFailed { query, cause } => {
                assert_eq!(query, "Advil");
                assert!(cause.contains("ERR_TIMED_OUT"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_engine_fault_is_passed_through() {
        let search = ProductSearch::new(FailingPage { fatal: true }, SiteProfile::default());
        let err = search.search("Advil").await.unwrap_err();
        assert!(matches!(err, MatchError::EngineUnavailable { .. }));
    }

    #[test]
    fn test_min_score_filters_weak_matches() {
        let records = vec![CandidateRecord {
            title: Some("Tylenol Caplets".to_string()),
            url: None,
            price: None,
        }];
        assert!(select_best("Advil", records.clone(), 0.0).unwrap().is_some());
        assert!(select_best("Advil", records, 0.1).unwrap().is_none());
    }

    #[test]
    fn test_untitled_candidates_compare_as_empty() {
        let records = vec![
            CandidateRecord::default(),
            CandidateRecord {
                title: Some("Advil".to_string()),
                url: None,
                price: Some("5.99".to_string()),
            },
        ];
        let matched = select_best("advil", records, 0.0).unwrap().unwrap();
        assert_eq!(matched.record.price.as_deref(), Some("5.99"));
    }
}
