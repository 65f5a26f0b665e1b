use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_drivers::domain::tts::SynthesisOptions;
use tts_drivers::infrastructure::config::{Config, LogFormat};
use tts_drivers::DriverManager;

const USAGE: &str = "usage: tts-drivers <source> [driver]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    let mut args = std::env::args().skip(1);
    let source = args.next().ok_or(USAGE)?;
    let driver = args.next();

    let manager = DriverManager::new(config.tts);
    tracing::info!(
        driver = driver.as_deref().unwrap_or(manager.default_driver()),
        "Starting TTS conversion"
    );

    let converter = manager.driver(driver.as_deref()).await?;
    match converter.convert(&source, &SynthesisOptions::default()).await? {
        Some(stored) => println!("{} ({})", stored.path.display(), stored.format),
        None => println!("driver [{}] performed no conversion", converter.driver_name()),
    }

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_drivers=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_drivers=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
