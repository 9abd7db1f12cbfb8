//! AIR CLI - gateway health, audit and chat
//!
//! Talks to an AIR gateway directly, without wiring an agent framework.

mod config;

use std::fs;
use std::time::Duration;

use air::ChatMessage;
use air_client::{AirClient, ChatOptions, GatewayConfig, DEFAULT_MODEL};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "air")]
#[command(about = "AIR CLI - record and audit every LLM call", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the config file and environment
#[derive(Args)]
struct GatewayArgs {
    /// Gateway URL (overrides AIR_GATEWAY_URL and the config file)
    #[arg(long, global = true)]
    gateway: Option<String>,
    /// Provider API key (overrides OPENAI_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<f64>,
    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,

    /// Show audit chain status
    Audit {
        /// Gateway key (falls back to AIR_GATEWAY_KEY)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Export the signed evidence package
    Export {
        /// Gateway key (falls back to AIR_GATEWAY_KEY)
        #[arg(short, long)]
        key: Option<String>,
        /// Write the package to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Send a chat completion through the gateway
    Chat {
        /// User prompt
        prompt: String,
        /// Model name
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,
        /// Optional system message
        #[arg(short, long)]
        system: Option<String>,
        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show or update configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show resolved configuration
    Show,
    /// Persist values to the config file
    Set {
        #[arg(long)]
        gateway_url: Option<String>,
        /// Provider API key
        #[arg(long)]
        provider_key: Option<String>,
        #[arg(long)]
        gateway_key: Option<String>,
        #[arg(long)]
        timeout_secs: Option<f64>,
        /// Static header as NAME=VALUE (repeatable)
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Health => cmd_health(&client(&config, &cli.gateway)?).await,
        Commands::Audit { key } => {
            let key = key.or_else(|| config.resolve_gateway_key(env));
            cmd_audit(&client(&config, &cli.gateway)?, key.as_deref()).await
        }
        Commands::Export { key, output } => {
            let key = key.or_else(|| config.resolve_gateway_key(env));
            cmd_export(&client(&config, &cli.gateway)?, key.as_deref(), output).await
        }
        Commands::Chat { prompt, model, system, temperature, json } => {
            let client = client(&config, &cli.gateway)?;
            cmd_chat(&client, prompt, &model, system, temperature, json).await
        }
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => cmd_config_show(&config, &cli.gateway),
            ConfigAction::Set { gateway_url, provider_key, gateway_key, timeout_secs, headers } => {
                cmd_config_set(config, gateway_url, provider_key, gateway_key, timeout_secs, headers)
            }
        },
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Defaults, then config file, then environment, then flags
fn resolve(config: &Config, args: &GatewayArgs) -> Result<GatewayConfig> {
    let mut gateway = config.gateway_config(env)?;

    if let Some(url) = &args.gateway {
        gateway.gateway_url = url.trim_end_matches('/').to_string();
    }
    if let Some(api_key) = &args.api_key {
        gateway = gateway.with_api_key(api_key);
    }
    if let Some(secs) = args.timeout {
        let timeout = Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .with_context(|| format!("--timeout must be a positive number of seconds, got {secs}"))?;
        gateway = gateway.with_timeout(timeout);
    }
    if args.insecure {
        gateway = gateway.with_verify_tls(false);
    }

    debug!(gateway = %gateway.gateway_url, "Resolved gateway configuration");
    Ok(gateway)
}

fn client(config: &Config, args: &GatewayArgs) -> Result<AirClient> {
    AirClient::new(resolve(config, args)?).context("Failed to create AIR client")
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_health(client: &AirClient) -> Result<()> {
    print!("Checking {}... ", client.config().gateway_url.cyan());

    match client.health().await {
        Ok(health) => {
            println!("{}", health.status.green());
            for (key, value) in &health.details {
                println!("  {}: {}", key.dimmed(), display_value(value));
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Gateway unreachable: {}", e);
        }
    }
}

async fn cmd_audit(client: &AirClient, key: Option<&str>) -> Result<()> {
    let report = client.audit(key).await.context("Audit request failed")?;

    println!("{}", "Audit chain:".bold());
    print_fields(&report);

    Ok(())
}

async fn cmd_export(client: &AirClient, key: Option<&str>, output: Option<String>) -> Result<()> {
    let package = client
        .export_evidence(key)
        .await
        .context("Evidence export failed")?;
    let content = serde_json::to_string_pretty(&package).context("Failed to encode evidence")?;

    match output {
        Some(path) => {
            fs::write(&path, content).with_context(|| format!("Failed to write {}", path))?;
            eprintln!("{} Evidence package written to {}", "✓".green(), path);
        }
        // stdout stays clean for piping
        None => println!("{}", content),
    }

    Ok(())
}

async fn cmd_chat(
    client: &AirClient,
    prompt: String,
    model: &str,
    system: Option<String>,
    temperature: Option<f64>,
    json: bool,
) -> Result<()> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));

    let mut options = ChatOptions::new();
    if let Some(t) = temperature {
        options.insert("temperature".to_string(), Value::from(t));
    }

    let response = client.chat(&messages, model, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.into_json())?);
        return Ok(());
    }

    eprintln!(
        "{} {} {}",
        "run".dimmed(),
        empty_as_dash(&response.air.run_id).cyan(),
        model.dimmed()
    );
    println!("{}", response.content().unwrap_or_default());

    Ok(())
}

fn cmd_config_show(config: &Config, args: &GatewayArgs) -> Result<()> {
    let resolved = resolve(config, args)?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Gateway URL: {}", resolved.gateway_url.cyan());
    println!(
        "  API Key: {}",
        if resolved.api_key.is_empty() { "Not set".red() } else { "Set".green() }
    );
    println!(
        "  Gateway Key: {}",
        if config.resolve_gateway_key(env).is_some() { "Set".green() } else { "Not set".yellow() }
    );
    println!("  Timeout: {}s", resolved.timeout.as_secs_f64());
    println!("  Verify TLS: {}", resolved.verify_tls);
    for (name, value) in &resolved.extra_headers {
        println!("  Header {}: {}", name.cyan(), value);
    }

    Ok(())
}

fn cmd_config_set(
    mut config: Config,
    gateway_url: Option<String>,
    api_key: Option<String>,
    gateway_key: Option<String>,
    timeout_secs: Option<f64>,
    headers: Vec<(String, String)>,
) -> Result<()> {
    if let Some(url) = gateway_url {
        config.gateway_url = Some(url);
    }
    if let Some(key) = api_key {
        config.api_key = Some(key);
    }
    if let Some(key) = gateway_key {
        config.gateway_key = Some(key);
    }
    if let Some(secs) = timeout_secs {
        config.timeout_secs = Some(secs);
    }
    config.headers.extend(headers);

    // Reject values the client would refuse later
    config.gateway_config(|_| None)?;
    config.save()?;

    println!("{} Config saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

fn print_fields(fields: &Map<String, Value>) {
    for (key, value) in fields {
        println!("  {}: {}", key.cyan(), display_value(value));
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn empty_as_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Team = research").unwrap(),
            ("X-Team".to_string(), "research".to_string())
        );
        assert!(parse_header("no-equals").is_err());
        assert!(parse_header("=value").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            gateway_url: Some("http://file:8080".to_string()),
            ..Default::default()
        };
        let args = GatewayArgs {
            gateway: Some("http://flag:9000/".to_string()),
            api_key: Some("sk-flag".to_string()),
            timeout: Some(3.0),
            insecure: true,
        };

        let gateway = resolve(&config, &args).unwrap();
        assert_eq!(gateway.gateway_url, "http://flag:9000");
        assert_eq!(gateway.api_key, "sk-flag");
        assert_eq!(gateway.timeout, Duration::from_secs(3));
        assert!(!gateway.verify_tls);
    }

    #[test]
    fn test_zero_timeout_flag_rejected() {
        let args = GatewayArgs {
            gateway: None,
            api_key: None,
            timeout: Some(0.0),
            insecure: false,
        };
        assert!(resolve(&Config::default(), &args).is_err());
    }

    #[test]
    fn test_cli_parses_chat() {
        let cli = Cli::try_parse_from(["air", "chat", "hello", "--model", "gpt-4o", "-s", "be brief"])
            .unwrap();
        match cli.command {
            Commands::Chat { prompt, model, system, .. } => {
                assert_eq!(prompt, "hello");
                assert_eq!(model, "gpt-4o");
                assert_eq!(system.as_deref(), Some("be brief"));
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_cli_chat_default_model() {
        let cli = Cli::try_parse_from(["air", "chat", "hello"]).unwrap();
        match cli.command {
            Commands::Chat { model, .. } => assert_eq!(model, DEFAULT_MODEL),
            _ => panic!("expected chat command"),
        }
    }
}
