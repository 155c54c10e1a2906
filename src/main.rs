use clap::{CommandFactory, Parser};
use session_log_hasher::utils::{logger, validation::Validate};
use session_log_hasher::{
    CliConfig, RunConfig, RunSummary, SanitizeEngine, Sha256Hasher, StreamDriver, TomlConfig,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 沒有輸入檔時只顯示用法
    let Some(input) = args.input.as_deref() else {
        CliConfig::command().print_help()?;
        println!();
        return Ok(());
    };

    let file_config = match args.config.as_deref() {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 建議: {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };
    let config = RunConfig::resolve(args.output_dir.as_deref(), &file_config);

    // 驗證配置
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose, config.log_level.as_deref());
    }
    tracing::debug!("Resolved config: {:?}", config);

    let driver = StreamDriver::from_config(&config, Sha256Hasher);
    let engine = SanitizeEngine::new(driver);

    match engine
        .run(Path::new(input), Path::new(&config.output_dir))
        .await
    {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("✅ Done!");
    println!("📄 Input:  {}", summary.input_path.display());
    println!("📁 Output: {}", summary.output_path.display());
    println!("🔢 Lines processed: {}", summary.lines_processed);
    println!("⚠️  Errors: {}", summary.error_count);
    println!("#️⃣  Payloads hashed: {}", summary.payloads_hashed);
    println!(
        "📦 Size: {:.2} MB -> {:.2} MB ({:.1}% smaller)",
        summary.input_mb(),
        summary.output_mb(),
        summary.reduction_percent()
    );
}
