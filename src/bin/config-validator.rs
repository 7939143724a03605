//! # Gateway Configuration Validator
//!
//! Command-line tool that loads a gateway configuration file, validates it and
//! reports the readiness of every integration it seeds.

use clap::{Parser, ValueEnum};
use integration_core::config::ConfigManager;
use integration_core::registry::{integration_status, InMemoryIntegrationRegistry};
use std::path::PathBuf;
use std::process;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate gateway configuration and report integration readiness")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the gateway YAML configuration
    #[arg(short, long, default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let manager = match ConfigManager::load_from_file(&cli.config) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Configuration invalid: {e}");
            eprintln!("❌ {e}");
            process::exit(1);
        }
    };

    let config = manager.config();
    let registry = InMemoryIntegrationRegistry::from_config(config);
    let report: Vec<_> = registry
        .ids()
        .into_iter()
        .map(|id| {
            let availability = integration_status(&registry, &id);
            (id, availability)
        })
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "environment": manager.environment(),
                "execution": config.execution,
                "ledger": config.ledger,
                "integrations": report
                    .iter()
                    .map(|(id, a)| serde_json::json!({
                        "id": id,
                        "available": a.available,
                        "status": a.status,
                        "message": a.message,
                    }))
                    .collect::<Vec<_>>(),
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("❌ Failed to render report: {e}");
                    process::exit(1);
                }
            }
        }
        OutputFormat::Table => {
            println!("✅ {} is valid ({})", cli.config.display(), manager.environment());
            println!(
                "   timeout {}ms | max retries {} | retry delay {}ms | ledger capacity {}",
                config.execution.timeout_ms,
                config.execution.max_retries,
                config.execution.retry_delay_ms,
                config.ledger.capacity
            );
            println!();
            println!("{:<24} {:<10} {:<16} MESSAGE", "INTEGRATION", "READY", "STATUS");
            for (id, availability) in &report {
                println!(
                    "{:<24} {:<10} {:<16} {}",
                    id,
                    if availability.available { "yes" } else { "no" },
                    availability.status,
                    availability.message
                );
            }
        }
    }
}
