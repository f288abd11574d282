use clap::Parser;
use lead_etl::config::app_config::AppConfig;
use lead_etl::core::request::{DEFAULT_RESULTS_DIR, LEAD_PRIORITY_FIELDS};
use lead_etl::utils::{logger, validation::Validate};
use lead_etl::{AiArcLeadClient, EtlEngine, LeadError, LocalStorage, RequestPipeline};

#[derive(Debug, Parser)]
#[command(name = "process_request")]
#[command(about = "Build an audience from a JSON request file and export it as CSV")]
struct Args {
    /// Path to the request JSON file
    request_file: String,

    /// Directory for result CSV files
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    results_dir: String,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init(args.verbose, args.json_logs);

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ Request processing failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(args: Args) -> Result<(), LeadError> {
    let config = AppConfig::load(args.config.as_deref())?;
    config.validate()?;

    // request 檔與輸出目錄都相對於目前工作目錄
    let storage = LocalStorage::new(".");
    let search = AiArcLeadClient::new(config.leads.clone())?;
    let export = config.export.export_options(&LEAD_PRIORITY_FIELDS);

    let pipeline =
        RequestPipeline::open(storage, search, &args.request_file, &args.results_dir, export)
            .await?;

    let report = EtlEngine::new(pipeline).run().await?;

    println!("✅ Done! Results: {}", report.output_path);
    Ok(())
}
