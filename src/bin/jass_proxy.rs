//! jass-proxy: forwards widget chat messages to the upstream completion API.
//!
//! Configuration comes from the environment (`OPENAI_API_KEY`, `PORT`, `JASS_MODEL`, ...).

use jass_gpt::config::ProxyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = ProxyConfig::from_env()?;
    if let Err(e) = config.require_api_key() {
        tracing::error!("{}", e);
        eprintln!("ERROR: OPENAI_API_KEY not found in environment");
        std::process::exit(1);
    }

    jass_gpt::proxy::serve(config).await?;
    Ok(())
}
