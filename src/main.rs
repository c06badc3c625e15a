use clap::Parser;
use daily_phrase::utils::logger;
use daily_phrase::{AppConfig, DeliveryEngine, GeminiProvider, SmtpDispatcher};

#[derive(Debug, Parser)]
#[command(name = "daily-phrase")]
#[command(about = "Fetches an inspirational phrase and delivers it by email")]
struct Cli {
    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 先載入 .env(如果存在),再讀取環境變數
    dotenvy::dotenv().ok();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting daily-phrase");

    // 驗證配置:一次回報所有缺漏,不碰網路
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ Error: Missing or invalid configuration:");
            for issue in &e.issues {
                eprintln!("  - {}", issue);
            }
            eprintln!("💡 Please check your .env file or environment variables.");
            std::process::exit(1);
        }
    };

    let provider = GeminiProvider::new(config.api_key.clone());
    let dispatcher = SmtpDispatcher::new(&config);
    let engine = DeliveryEngine::new(provider, dispatcher);

    tracing::info!(
        "Delivering to {} via {}:{}",
        config.recipient,
        config.smtp_server,
        config.smtp_port
    );

    match engine.run().await {
        Ok(record) => {
            tracing::info!(
                "✅ Delivered \"{}\" by {}",
                record.phrase,
                record.author
            );
            println!("✅ Email sent successfully!");
        }
        Err(e) => {
            tracing::error!("❌ {} stage failed: {}", e.stage(), e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}
