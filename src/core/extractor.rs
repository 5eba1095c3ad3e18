//! Turns a rendered search-results page into candidate records.
//!
//! Extraction never fails: a card whose structure does not match the
//! configured selectors yields `None` fields rather than an error, so a
//! layout change on the target site shows up as `N.A.` columns in the
//! output instead of aborting the search.

use crate::adapters::dom::HtmlDocument;
use crate::config::{SiteProfile, SiteSelectors};
use crate::domain::model::CandidateRecord;
use crate::domain::ports::{DomChild, DomNode};

/// Parse `html` and extract one record per product card, in document order.
pub fn extract_records(html: &str, site: &SiteProfile) -> Vec<CandidateRecord> {
    let document = HtmlDocument::parse(html);
    extract_from(&document.root(), site)
}

pub fn extract_from<N: DomNode>(root: &N, site: &SiteProfile) -> Vec<CandidateRecord> {
    root.locate_all(&site.selectors.card)
        .iter()
        .map(|card| extract_card(card, site))
        .collect()
}

fn extract_card<N: DomNode>(card: &N, site: &SiteProfile) -> CandidateRecord {
    let link = card.locate(&site.selectors.title_link);

    let title = link.as_ref().and_then(direct_text);
    let url = link
        .as_ref()
        .and_then(|link| link.attribute("href"))
        .map(|href| site.absolute_url(&href));

    CandidateRecord {
        title,
        url,
        price: extract_price(card, &site.selectors),
    }
}

/// Only the link's own text nodes count; badges and icons nested inside
/// the anchor are skipped.
fn direct_text<N: DomNode>(link: &N) -> Option<String> {
    let title: String = link
        .child_nodes()
        .into_iter()
        .filter_map(|child| match child {
            DomChild::Text(text) => Some(text.trim().to_string()),
            _ => None,
        })
        .collect();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn extract_price<N: DomNode>(card: &N, selectors: &SiteSelectors) -> Option<String> {
    let container = card.locate(&selectors.price_container)?;

    if let Some(message) = container.locate(&selectors.price_message) {
        let text = message.rendered_text();
        return if text.is_empty() { None } else { Some(text) };
    }

    container
        .locate(&selectors.price_value)
        .and_then(|price| join_price_fragments(&price))
}

/// Rebuilds a price rendered as separate digit runs (`<span>12</span><sup>99</sup>`)
/// into `12.99`. Fragments that are not purely digits (currency symbols,
/// icons) are dropped. More than two digit runs are joined the same way,
/// so `1`, `299`, `00` becomes `1.299.00`.
fn join_price_fragments<N: DomNode>(price: &N) -> Option<String> {
    let fragments: Vec<String> = price
        .child_nodes()
        .into_iter()
        .filter_map(|child| match child {
            DomChild::Text(text) => Some(text.trim().to_string()),
            DomChild::Element(element) => Some(element.rendered_text()),
            DomChild::Other => None,
        })
        .filter(|fragment| !fragment.is_empty() && fragment.chars().all(|c| c.is_ascii_digit()))
        .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join("."))
    }
}
