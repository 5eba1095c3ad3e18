use crate::adapters::catalog::CatalogBackend;
use crate::adapters::sink::CsvSink;
use crate::context::AppContext;
use crate::core::batch::BatchRunner;
use crate::core::search::ProductSearch;
use crate::domain::model::BatchSummary;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: BatchSummary,
    /// Output file actually written, after placeholder expansion
    pub output_path: String,
}

/// Replace `{timestamp}` in an output path with the current UTC time, so
/// repeated runs can write to separate files.
pub fn resolve_output_path(template: &str) -> String {
    template.replace(
        "{timestamp}",
        &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
    )
}

/// Validate `config`, set up the context, run the whole batch and tear the
/// context down again, whatever the batch result.
pub async fn run<C: ConfigProvider + Validate>(config: &C) -> Result<RunReport> {
    config.validate()?;

    let output_path = resolve_output_path(config.output_path());
    let catalog = CatalogBackend::from(config.catalog()?);
    let sink = CsvSink::create(&output_path, config.append_output())?;
    info!("Writing matches to {}", output_path);

    let context = AppContext::init(config).await?;

    let result = {
        let search =
            ProductSearch::new(&context.pages, config.site()).with_min_score(config.min_score());
        let mut runner = BatchRunner::new(catalog, search, sink)
            .with_delay(config.request_delay())
            .with_window(config.window());
        runner.run().await
    };

    context.shutdown().await;
    result.map(|summary| RunReport {
        summary,
        output_path,
    })
}
