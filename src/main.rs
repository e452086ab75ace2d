use std::process::ExitCode;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use stockprices::config::{Config, OutputFormat};
use stockprices::db;
use stockprices::models::PriceIncreaseReport;
use stockprices::services::{PgPriceProvider, PriceIncreaseCalculator, PriceIncreaseService, PriceProvider};
use stockprices::utils::{extract_clean_error, RetrievalError};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["stockprices=debug", "sqlx=warn"] {
        match directive.parse::<Directive>() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive '{}': {}", directive, e),
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Initializing database...");
    let pool = match db::init_db(&config).await {
        Ok(p) => {
            info!("Database initialized successfully");
            p
        }
        Err(e) => {
            error!("Failed to initialize database: {}", extract_clean_error(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    if config.seed_on_start {
        info!("Seeding stockprices table");
        match db::stockprices::seed_prices(&pool, Utc::now()).await {
            Ok(rows) => debug!("Inserted {} seed rows", rows),
            Err(e) => {
                error!("Unable to insert into stockprices table: {}", extract_clean_error(&e.to_string()));
                return ExitCode::FAILURE;
            }
        }
    }

    let provider = PgPriceProvider::new(pool);

    match provider.latest().await {
        Ok(latest) => info!("Latest price {} at {}", latest.price(), latest.timestamp()),
        Err(RetrievalError::NoRows) => warn!("No prices recorded yet"),
        Err(e) => warn!("Unable to fetch latest price: {}", extract_clean_error(&e.to_string())),
    }

    let calculator = PriceIncreaseService::new(provider);
    let increase = match calculator.price_increase().await {
        Ok(v) => v,
        Err(e) => {
            error!("Price increase unavailable: {}", extract_clean_error(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    match config.output_format {
        OutputFormat::Plain => println!("{}", increase),
        OutputFormat::Json => match serde_json::to_string(&PriceIncreaseReport { price_increase: increase }) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Unable to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
