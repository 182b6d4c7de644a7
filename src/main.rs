#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use spotify_etl::config::PipelineKind;
#[cfg(feature = "cli")]
use spotify_etl::utils::{logger, validation::Validate};
#[cfg(feature = "cli")]
use spotify_etl::workflow::{WorkflowConfig, WorkflowRunner};
#[cfg(feature = "cli")]
use spotify_etl::{CliConfig, EtlError};

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting spotify-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(output) => {
            tracing::info!("✅ ETL process completed successfully!");
            tracing::info!("📁 Output saved to: {}", output);
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                spotify_etl::utils::error::ErrorSeverity::Low => 0,
                spotify_etl::utils::error::ErrorSeverity::Medium => 2,
                spotify_etl::utils::error::ErrorSeverity::High => 1,
                spotify_etl::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

#[cfg(feature = "cli")]
async fn run(config: &CliConfig) -> spotify_etl::Result<String> {
    let options = config.run_options();

    if config.pipeline == "workflow" {
        let workflow = WorkflowConfig::from_file(&config.workflow_file)?;
        let results = WorkflowRunner::new(workflow, options).execute_all().await?;

        let outputs: Vec<&str> = results.iter().map(|r| r.output_path.as_str()).collect();
        return Ok(outputs.join(", "));
    }

    let kind = PipelineKind::parse(&config.pipeline).ok_or_else(|| {
        EtlError::InvalidConfigValueError {
            field: "pipeline".to_string(),
            value: config.pipeline.clone(),
            reason: "Expected top-tracks, recently-played, tweets, or workflow".to_string(),
        }
    })?;

    spotify_etl::app::run_named_pipeline(kind, &options).await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("spotify-etl was built without the `cli` feature");
    std::process::exit(1);
}
