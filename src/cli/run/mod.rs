//! Run command - one request through a model's fallback chain

use std::path::Path;

use anyhow::Context;
use clap::Args;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{LlmRequest, LlmResponse};
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Model to dispatch to, e.g. `google/gemma-3-27b-it`
    #[arg(long, short)]
    pub model: String,

    /// Plain-text prompt; read from stdin when neither this nor `--json` is set
    #[arg(long, short, conflicts_with = "json")]
    pub prompt: Option<String>,

    /// Structured request body as JSON
    #[arg(long)]
    pub json: Option<String>,

    /// Print the full provider response instead of the message content
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(config_path: Option<&Path>, args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_path).context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    let dispatcher = crate::create_dispatcher(&config)?;
    let request = read_request(&args).await?;

    info!(model = %args.model, "Dispatching request");

    let response = dispatcher.run(&args.model, request).await?;
    println!("{}", render(&response, args.raw)?);

    Ok(())
}

async fn read_request(args: &RunArgs) -> anyhow::Result<LlmRequest> {
    if let Some(json) = &args.json {
        let payload = serde_json::from_str(json).context("--json is not valid JSON")?;
        return Ok(LlmRequest::payload(payload));
    }

    if let Some(prompt) = &args.prompt {
        return Ok(LlmRequest::prompt(prompt.as_str()));
    }

    let mut prompt = String::new();
    tokio::io::stdin()
        .read_to_string(&mut prompt)
        .await
        .context("Failed to read prompt from stdin")?;

    Ok(LlmRequest::prompt(prompt.trim_end()))
}

fn render(response: &LlmResponse, raw: bool) -> anyhow::Result<String> {
    if raw {
        return Ok(serde_json::to_string_pretty(&response.raw)?);
    }

    match response.content() {
        Some(content) => Ok(content.to_string()),
        None => Ok(serde_json::to_string_pretty(&response.raw)?),
    }
}
