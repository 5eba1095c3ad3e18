use catalog_match::config::LogFormat;
use catalog_match::utils::logger;
use catalog_match::app::{self, RunReport};
use catalog_match::{CliConfig, MatchError, TomlConfig};
use clap::Parser;

fn init_logging(verbose: bool, format: LogFormat) {
    match format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }
}

fn report_failure(e: &MatchError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code().max(1));
}

fn report_success(report: &RunReport) {
    let summary = &report.summary;
    tracing::info!("✅ Run completed");
    println!(
        "✅ Matched {} of {} entries ({} not found, {} failed) in {:.1}s",
        summary.matched,
        summary.attempted,
        summary.not_found,
        summary.failed,
        summary.elapsed.as_secs_f64()
    );
    println!("📁 Output saved to: {}", report.output_path);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match &cli.config {
        Some(path) => {
            let config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };

            init_logging(cli.verbose || config.verbose(), config.log_format());
            tracing::info!("Starting catalog-match with configuration from {}", path);

            match app::run(&config).await {
                Ok(report) => report_success(&report),
                Err(e) => report_failure(&e),
            }
        }
        None => {
            init_logging(cli.verbose, cli.log_format);
            tracing::info!("Starting catalog-match");
            tracing::debug!("CLI config: {:?}", cli);

            match app::run(&cli).await {
                Ok(report) => report_success(&report),
                Err(e) => report_failure(&e),
            }
        }
    }
}
