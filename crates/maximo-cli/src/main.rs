mod bridge;
mod conversation;
mod prompt;
mod session;
mod tools;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::env;

use bridge::BridgeClient;
use maximo_agent::providers::configs::{
    GeminiProviderConfig, OpenAiProviderConfig, ProviderConfig, GEMINI_HOST, GEMINI_MODEL,
    OPENAI_HOST, OPENAI_MODEL,
};
use maximo_agent::providers::factory;
use prompt::cliclack::CliclackPrompt;
use session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Provider option (gemini or openai)
    #[arg(short, long, default_value = "gemini")]
    #[arg(value_enum)]
    provider: CliProviderVariant,

    /// Provider API key (can also be set via GOOGLE_API_KEY or
    /// OPENAI_API_KEY environment variables)
    #[arg(long)]
    api_key: Option<String>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the tool bridge
    #[arg(long, default_value = "http://127.0.0.1:5001")]
    bridge_url: String,

    /// Process a single message and exit
    #[arg(long)]
    message: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum CliProviderVariant {
    Gemini,
    OpenAi,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let provider = factory::get_provider(create_provider_config(&cli)?)?;
    let bridge = BridgeClient::new(cli.bridge_url.clone());
    let manifest = bridge.fetch_manifest().await?;

    let mut session = Session::new(provider, bridge, Box::new(CliclackPrompt::new()), manifest);

    if let Some(message) = cli.message {
        session.headless_start(message).await
    } else {
        println!(
            "Maximo assistant {}",
            style("- type \"exit\" to end the session").dim()
        );
        println!();
        session.start().await
    }
}

fn create_provider_config(cli: &Cli) -> Result<ProviderConfig> {
    match cli.provider {
        CliProviderVariant::Gemini => {
            let api_key = cli
                .api_key
                .clone()
                .or_else(|| env::var("GOOGLE_API_KEY").ok())
                .context(
                    "API key must be provided via --api-key or GOOGLE_API_KEY environment variable",
                )?;
            Ok(ProviderConfig::Gemini(GeminiProviderConfig {
                host: GEMINI_HOST.to_string(),
                api_key,
                model: cli.model.clone().unwrap_or_else(|| GEMINI_MODEL.to_string()),
                temperature: None,
                max_tokens: None,
            }))
        }
        CliProviderVariant::OpenAi => {
            let api_key = cli
                .api_key
                .clone()
                .or_else(|| env::var("OPENAI_API_KEY").ok())
                .context(
                    "API key must be provided via --api-key or OPENAI_API_KEY environment variable",
                )?;
            Ok(ProviderConfig::OpenAi(OpenAiProviderConfig {
                host: OPENAI_HOST.to_string(),
                api_key,
                model: cli.model.clone().unwrap_or_else(|| OPENAI_MODEL.to_string()),
                temperature: None,
                max_tokens: None,
            }))
        }
    }
}
