use catalog_match::config::{SiteProfile, SiteSelectors};
use catalog_match::core::extractor::extract_records;
use catalog_match::core::search::select_best;
use catalog_match::domain::model::NOT_AVAILABLE;
use catalog_match::{CatalogEntry, OutputRow};

fn custom_site() -> SiteProfile {
    SiteProfile {
        base_url: "https://shop.example.com".to_string(),
        search_path: "/find?q={query}".to_string(),
        selectors: SiteSelectors {
            card: "li.result".to_string(),
            title_link: "h3 > a".to_string(),
            price_container: ".pricing".to_string(),
            price_message: ".notice".to_string(),
            price_value: ".amount".to_string(),
        },
    }
}

const CUSTOM_RESULTS: &str = r#"
<ul>
  <li class="result">
    <h3><a href="/item/55">Motrin IB</a></h3>
    <div class="pricing"><span class="amount">$<b>7</b><i class="icon"></i><b>49</b></span></div>
  </li>
  <li class="result">
    <h3>Untitled listing</h3>
    <div class="pricing"><span class="notice">Temporarily unavailable</span></div>
  </li>
</ul>
"#;

#[test]
fn test_extraction_follows_configured_selectors() {
    let records = extract_records(CUSTOM_RESULTS, &custom_site());
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].title.as_deref(), Some("Motrin IB"));
    assert_eq!(
        records[0].url.as_deref(),
        Some("https://shop.example.com/item/55")
    );
    assert_eq!(records[0].price.as_deref(), Some("7.49"));

    assert_eq!(records[1].title, None);
    assert_eq!(records[1].url, None);
    assert_eq!(records[1].price.as_deref(), Some("Temporarily unavailable"));
}

#[test]
fn test_default_selectors_find_nothing_on_other_layouts() {
    let records = extract_records(CUSTOM_RESULTS, &SiteProfile::default());
    assert!(records.is_empty());
}

#[test]
fn test_missing_fields_become_sentinel_in_output_row() {
    let records = extract_records(CUSTOM_RESULTS, &custom_site());

    // Only the untitled card is offered, so it wins by default.
    let matched = select_best("Motrin", records[1..].to_vec(), 0.0)
        .unwrap()
        .unwrap();
    let row = OutputRow::from_match(&CatalogEntry::new("7", "Motrin"), &matched);

    assert_eq!(row.title, NOT_AVAILABLE);
    assert_eq!(row.url, NOT_AVAILABLE);
    assert_eq!(row.price, "Temporarily unavailable");
    assert_eq!(row.catalog_id, "7");
}

#[test]
fn test_search_url_encodes_query() {
    let site = custom_site();
    assert_eq!(
        site.search_url("Advil 200mg & more"),
        "https://shop.example.com/find?q=Advil%20200mg%20%26%20more"
    );
}
