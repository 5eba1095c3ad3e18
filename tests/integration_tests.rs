use catalog_match::config::SiteProfile;
use catalog_match::{
    app, BatchRunner, CsvCatalog, CsvSink, HttpPageSource, MatchError, ProductSearch, TomlConfig,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

const ADVIL_RESULTS: &str = r#"
<html><body>
  <div class="wag-product-cards">
    <div class="wag-prod-title"><a href="/store/c/tylenol/ID=1-product">Tylenol Extra Strength</a></div>
    <div class="wag-prod-price-info"><span class="wag-price-msg">Out of stock</span></div>
  </div>
  <div class="wag-product-cards">
    <div class="wag-prod-title"><a href="/store/c/advil/ID=2-product">Advil Ibuprofen Tablets</a></div>
    <div class="wag-prod-price-info">
      <div class="product__price"><span class="product__price">$<span>12</span><sup>99</sup></span></div>
    </div>
  </div>
</body></html>
"#;

const ZYRTEC_RESULTS: &str = r#"
<html><body>
  <div class="wag-product-cards">
    <div class="wag-prod-title"><a href="/store/c/zyrtec/ID=9-product">Zyrtec Allergy</a></div>
  </div>
</body></html>
"#;

const NO_RESULTS: &str = "<html><body><h1>No results found</h1></body></html>";

fn write_catalog(dir: &TempDir) -> String {
    let path = dir.path().join("catalog.csv");
    std::fs::write(
        &path,
        "id,title\n101,Advil\n102,Unobtainium\n103,Zyrtec\n",
    )
    .unwrap();
    path.to_str().unwrap().to_string()
}

fn mock_results<'a>(server: &'a MockServer, query: &str, html: &str) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/search/results.jsp")
            .query_param("Ntt", query);
        then.status(200)
            .header("Content-Type", "text/html")
            .body(html);
    })
}

#[tokio::test]
async fn test_end_to_end_match_over_http() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write_catalog(&temp_dir);
    let output_path = temp_dir.path().join("out").join("matches.csv");

    let server = MockServer::start();
    let advil = mock_results(&server, "Advil", ADVIL_RESULTS);
    let unknown = mock_results(&server, "Unobtainium", NO_RESULTS);
    let zyrtec = mock_results(&server, "Zyrtec", ZYRTEC_RESULTS);

    let site = SiteProfile {
        base_url: server.base_url(),
        ..SiteProfile::default()
    };
    let pages = HttpPageSource::new(Duration::from_secs(5)).unwrap();
    let search = ProductSearch::new(pages, site);
    let sink = CsvSink::create(&output_path, false).unwrap();

    let mut runner = BatchRunner::new(CsvCatalog::new(catalog_path), search, sink)
        .with_delay(Duration::from_millis(5));
    let summary = runner.run().await.unwrap();

    advil.assert();
    unknown.assert();
    zyrtec.assert();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.not_found, 1);

    let content = std::fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "TITLE,URL,PRICE,DB_ID,DB_TITLE");
    assert_eq!(
        lines[1],
        format!(
            "Advil Ibuprofen Tablets,{}/store/c/advil/ID=2-product,12.99,101,Advil",
            server.base_url()
        )
    );
    assert_eq!(
        lines[2],
        format!(
            "Zyrtec Allergy,{}/store/c/zyrtec/ID=9-product,N.A.,103,Zyrtec",
            server.base_url()
        )
    );
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn test_server_error_skips_entry() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write_catalog(&temp_dir);

    let server = MockServer::start();
    let advil = server.mock(|when, then| {
        when.method(GET)
            .path("/search/results.jsp")
            .query_param("Ntt", "Advil");
        then.status(503);
    });
    mock_results(&server, "Unobtainium", NO_RESULTS);
    mock_results(&server, "Zyrtec", ZYRTEC_RESULTS);

    let site = SiteProfile {
        base_url: server.base_url(),
        ..SiteProfile::default()
    };
    let pages = HttpPageSource::new(Duration::from_secs(5)).unwrap();
    let search = ProductSearch::new(pages, site);
    let sink = CsvSink::from_writer(Vec::new()).unwrap();

    let mut runner = BatchRunner::new(CsvCatalog::new(catalog_path), search, sink)
        .with_delay(Duration::ZERO);
    let summary = runner.run().await.unwrap();

    advil.assert();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.matched, 1);

    let output = String::from_utf8(runner.into_sink().into_inner().unwrap()).unwrap();
    assert!(!output.contains(",101,"));
    assert!(output.contains(",103,Zyrtec"));
}

#[tokio::test]
async fn test_app_run_with_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write_catalog(&temp_dir);
    let output_path = temp_dir.path().join("matches.csv");

    let server = MockServer::start();
    mock_results(&server, "Advil", ADVIL_RESULTS);
    mock_results(&server, "Unobtainium", NO_RESULTS);
    mock_results(&server, "Zyrtec", ZYRTEC_RESULTS);

    let toml_content = format!(
        r#"
[site]
base_url = "{base_url}"
search_path = "/search/results.jsp?Ntt={{query}}"

[catalog]
type = "csv"
path = '{catalog}'

[fetch]
mode = "http"
navigation_timeout_ms = 5000

[batch]
delay_ms = 0
skip = 1

[output]
path = '{output}'
"#,
        base_url = server.base_url(),
        catalog = catalog_path,
        output = output_path.to_str().unwrap(),
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let report = app::run(&config).await.unwrap();
    let summary = report.summary;

    assert_eq!(report.output_path, output_path.to_str().unwrap());
    assert_eq!(summary.total, 3);
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.matched, 1);

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("Zyrtec Allergy"));
    assert!(!content.contains("Advil"));
}

#[tokio::test]
async fn test_app_run_rejects_invalid_config() {
    let toml_content = r#"
[site]
base_url = "not a url"
search_path = "/search?q={query}"

[catalog]
type = "csv"
path = "catalog.csv"
"#;

    let config = TomlConfig::from_toml_str(toml_content).unwrap();
    let err = app::run(&config).await.unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfigValueError { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_app_run_missing_catalog_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("matches.csv");

    let toml_content = format!(
        r#"
[catalog]
type = "csv"
path = '{catalog}'

[fetch]
mode = "http"

[output]
path = '{output}'
"#,
        catalog = temp_dir.path().join("missing.csv").to_str().unwrap(),
        output = output_path.to_str().unwrap(),
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let err = app::run(&config).await.unwrap_err();
    assert!(matches!(err, MatchError::CatalogUnavailable { .. }));
    assert_eq!(err.exit_code(), 2);
}
