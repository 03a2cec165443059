//! Purser Server CLI
//!
//! Starts the HTTP server that turns uploaded receipts into expense drafts.

use purser_server::config::{api_key_from_env, ServerConfig};
use purser_server::start_server;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 2 && args[1] == "--config" {
        Some(args[2].as_str())
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        None
    };

    let config = ServerConfig::load(config_path)?;
    let api_key = api_key_from_env()?;

    start_server(config, api_key).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_help() {
    println!("Purser Server - Receipt and Invoice Extraction API");
    println!();
    println!("USAGE:");
    println!("    purser-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    GEMINI_API_KEY               Provider API key (required)");
    println!("    PURSER_CONFIG                Config file path (alternative to --config)");
    println!("    PURSER_BIND_ADDR             Bind address, e.g. 0.0.0.0:8080");
    println!("    PURSER_REGISTRY_URL          File/category registry base URL");
    println!("    PURSER_REGISTRY_KEY          Registry service credential");
    println!("    PURSER_GEMINI_MODEL          Vision model name");
    println!("    PURSER_GEMINI_ENDPOINT       Provider endpoint override");
    println!("    PURSER_RETRY_MAX_ATTEMPTS    Provider attempts per call");
    println!("    PURSER_RETRY_BASE_DELAY_MS   Base backoff delay");
    println!("    PURSER_REQUEST_TIMEOUT_SECS  Single request timeout");
    println!("    PURSER_PROVIDER_TIMEOUT_SECS Overall provider call budget");
    println!();
}
