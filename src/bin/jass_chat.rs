//! jass-chat: terminal chat widget
//!
//! Usage:
//!   jass-chat [--offline] [--backend <url>]    Start an interactive conversation
//!   jass-chat health [--backend <url>]         Query the proxy health endpoint
//!   jass-chat test [--backend <url>]           Ask the proxy to probe the upstream API

use jass_gpt::client::{CompletionBackend, ProxyClient};
use jass_gpt::config::ClientConfig;
use jass_gpt::{ChatSession, ConsoleSink, FallbackOrchestrator};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_usage() {
    println!(
        r#"jass-chat: JASS GPT terminal chat

USAGE:
    jass-chat [COMMAND] [OPTIONS]

COMMANDS:
    (none)                      Start an interactive conversation
    health                      Query the proxy health endpoint
    test                        Ask the proxy to probe the upstream API
    help                        Show this help message

OPTIONS:
    --offline                   Never call the proxy; answer with canned replies
    --backend <url>             Proxy base URL (default: http://localhost:3000)

ENVIRONMENT:
    JASS_BACKEND_URL            Proxy base URL
    JASS_USE_API                Set to false to start offline
    JASS_HTTP_TIMEOUT_SECS      Remote call timeout (default 30)
    RUST_LOG                    Log filter (default: warn)"#
    );
}

fn resolve_config(args: &[String]) -> jass_gpt::Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    for (i, arg) in args.iter().enumerate() {
        match arg.as_str() {
            "--offline" => config = config.with_use_api(false),
            "--backend" => {
                if let Some(url) = args.get(i + 1) {
                    let timeout = config.timeout;
                    let use_api = config.use_api;
                    config = ClientConfig::new(url)?
                        .with_timeout(timeout)
                        .with_use_api(use_api);
                }
            }
            _ => {}
        }
    }
    Ok(config)
}

async fn cmd_health(config: ClientConfig) -> anyhow::Result<()> {
    let client = ProxyClient::new(config)?;
    let health = client.health().await?;
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

async fn cmd_test(config: ClientConfig) -> anyhow::Result<()> {
    let client = ProxyClient::new(config)?;
    let status = client.test_connection().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

async fn cmd_chat(config: ClientConfig) -> anyhow::Result<()> {
    let backend: Option<Arc<dyn CompletionBackend>> = if config.use_api {
        Some(Arc::new(ProxyClient::new(config.clone())?))
    } else {
        None
    };

    if backend.is_some() {
        println!("JASS GPT (proxy: {}). Type a message, Ctrl-D to quit.", config.backend_url);
    } else {
        println!("JASS GPT (offline). Type a message, Ctrl-D to quit.");
    }

    let session = ChatSession::new(
        FallbackOrchestrator::with_backend(backend),
        ConsoleSink::stdout(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session.submit(&line).await;
    }
    session.cancel();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help") {
        print_usage();
        return Ok(());
    }
    let command = args.first().map(String::as_str).filter(|a| !a.starts_with("--"));

    match command {
        None => cmd_chat(resolve_config(&args)?).await,
        Some("health") => cmd_health(resolve_config(&args[1..])?).await,
        Some("test") => cmd_test(resolve_config(&args[1..])?).await,
        Some("help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
