use clap::Parser;
use lead_etl::config::app_config::AppConfig;
use lead_etl::core::lookalike::{LookalikeSettings, LOOKALIKE_PRIORITY_FIELDS};
use lead_etl::utils::{logger, validation::Validate};
use lead_etl::{
    AiArkPeopleClient, CliConfig, DiscoLikeClient, EtlEngine, LeadError, LocalStorage,
    LookalikePipeline,
};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init(cli.verbose, cli.json_logs);

    tracing::info!("Starting lead-etl lookalike finder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Lookalike run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> Result<(), LeadError> {
    cli.validate()?;

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    if config.discovery.api_key.is_empty() {
        return Err(LeadError::MissingConfigError {
            field: "DISCOLIKE_API_KEY".to_string(),
        });
    }
    if !cli.skip_people && config.enrichment.api_key.is_empty() {
        tracing::warn!(
            "⚠️ AIARK_API_KEY is not set, people enrichment will return no contacts"
        );
    }

    let settings = LookalikeSettings {
        icp_text: cli.icp_text.clone(),
        limit: cli.limit,
        skip_people: cli.skip_people,
        output_dir: cli.output_dir.clone(),
        rate_limit_delay: Duration::from_millis(config.enrichment.rate_limit_delay_ms),
        export: config.export.export_options(&LOOKALIKE_PRIORITY_FIELDS),
    };

    // 輸出路徑已包含 output_dir，以目前工作目錄為根
    let storage = LocalStorage::new(".");
    let discovery = DiscoLikeClient::new(config.discovery.clone())?;
    let enrichment = AiArkPeopleClient::new(config.enrichment.clone())?;
    let pipeline = LookalikePipeline::new(storage, discovery, enrichment, settings);

    let report = EtlEngine::new(pipeline).run().await?;

    println!("{}", "=".repeat(60));
    println!("✅ SUCCESS!");
    println!("Rows exported: {}", report.exported_rows);
    println!("📁 CSV: {}", report.output_path);
    println!("{}", "=".repeat(60));

    Ok(())
}
