//! Categorizer setup: config overrides, provider creation, file discovery.

use std::path::Path;

use anyhow::Context;
use roomsort_core::{
    BatchOptions, CategorizeOptions, Categorizer, Config, DiscoveredFile, FileDiscovery,
    LlmProviderFactory, OutputFormat as CoreOutputFormat,
};

use super::{CategorizeArgs, CategorizeContext};

/// Resolve the input, apply CLI overrides, and build the categorizer.
pub fn setup_categorizer(
    args: &CategorizeArgs,
    mut config: Config,
) -> anyhow::Result<CategorizeContext> {
    let input = args.input.clone().unwrap_or_else(|| config.input_dir());
    if !input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Pass an image or directory, or set input.dir in the config file.",
            input
        );
    }

    if let Some(property) = args.property {
        config.input.property_type = property.into();
    }
    if let Some(mime_policy) = args.mime_policy {
        config.input.mime_policy = mime_policy.into();
    }
    if let Some(api_key) = &args.api_key {
        config.model.api_key = api_key.clone();
    }

    let provider = LlmProviderFactory::create(&config.model, args.model.as_deref())
        .context("Failed to create the Gemini provider")?;
    let categorizer = Categorizer::new(
        provider,
        CategorizeOptions {
            mime_policy: config.input.mime_policy,
        },
    );
    tracing::debug!("Using {}", categorizer.describe());

    let files = discover(&config, &input)?;

    Ok(CategorizeContext {
        categorizer,
        property: config.input.property_type,
        files,
        input,
        batch_options: BatchOptions {
            keep_going: args.keep_going,
        },
        output_format: output_format(args),
    })
}

fn discover(config: &Config, input: &Path) -> anyhow::Result<Vec<DiscoveredFile>> {
    let files = FileDiscovery::new(&config.input.supported_formats).discover(input)?;
    tracing::debug!(
        "Discovered {} file(s), {} bytes",
        files.len(),
        FileDiscovery::total_size(&files)
    );
    Ok(files)
}

/// `--format` wins; otherwise the `--output` extension decides, then JSON.
pub(crate) fn output_format(args: &CategorizeArgs) -> CoreOutputFormat {
    args.format
        .map(Into::into)
        .or_else(|| {
            args.output
                .as_deref()
                .and_then(CoreOutputFormat::from_path)
        })
        .unwrap_or(CoreOutputFormat::Json)
}
