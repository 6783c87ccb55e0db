//! Chain command - print the planned invoker order without calling providers

use std::path::Path;

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::{ChainBuilder, InvokerSpec, ModelId};

#[derive(Args, Debug)]
pub struct ChainArgs {
    /// Model to show; every configured model when omitted
    #[arg(long, short)]
    pub model: Option<String>,
}

pub async fn run(config_path: Option<&Path>, args: ChainArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_path).context("Failed to load configuration")?;
    let builder = crate::create_chain_builder(&config)?;

    let models = match &args.model {
        Some(model) => vec![ModelId::new(model.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid model '{}': {}", model, e))?],
        None => {
            let mut models: Vec<ModelId> = builder.config().bindings().models().cloned().collect();
            models.sort();
            models
        }
    };

    for model_id in &models {
        println!("{}", describe(&builder, model_id)?);
    }

    Ok(())
}

fn describe(builder: &ChainBuilder, model_id: &ModelId) -> anyhow::Result<String> {
    let plan = builder.plan(model_id)?;
    let mut lines = vec![format!("{} ({} invokers)", model_id, plan.len())];

    lines.extend(plan.iter().enumerate().map(|(i, spec)| line(i + 1, spec)));

    Ok(lines.join("\n"))
}

fn line(index: usize, spec: &InvokerSpec) -> String {
    match spec.provider() {
        Some(provider) => format!("  {:>2}. {:<18} provider={}", index, spec.label(), provider),
        None => format!("  {:>2}. {}", index, spec.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::invoker::mock::RecordingFactory;
    use crate::domain::{ChainConfig, ProviderBindings, RetryPolicy};

    fn builder() -> ChainBuilder {
        let bindings =
            ProviderBindings::new().with_model(ModelId::new("m1").unwrap(), ["nebius", "scaleway"]);
        let config = ChainConfig::new(
            ["sk-or-secret"],
            ["hf-secret"],
            bindings,
            RetryPolicy::default(),
        )
        .unwrap();

        ChainBuilder::new(Arc::new(config), Arc::new(RecordingFactory::succeeding()))
    }

    #[test]
    fn test_describe_lists_order_without_secrets() {
        let output = describe(&builder(), &ModelId::new("m1").unwrap()).unwrap();

        assert!(output.starts_with("m1 (3 invokers)"));
        assert!(output.contains("1. primary#0"));
        assert!(output.contains("provider=scaleway"));
        assert!(!output.contains("secret"));
    }

    #[test]
    fn test_describe_unknown_model() {
        assert!(describe(&builder(), &ModelId::new("other").unwrap()).is_err());
    }
}
