//! The `roomsort categorize` command.

mod batch;
mod setup;
pub mod types;

pub use types::{MimeMode, OutputFormat, Property};

use clap::Args;
use roomsort_core::{
    ApartmentCategory, BatchOptions, Categorizer, Config, DiscoveredFile, HotelCategory,
    OutputFormat as CoreOutputFormat, PropertyType,
};
use std::path::PathBuf;

use batch::run_batch;
use setup::setup_categorizer;

/// Arguments for the `categorize` command.
#[derive(Args, Debug, Default)]
pub struct CategorizeArgs {
    /// Image file or directory to categorize (defaults to input.dir from the config)
    pub input: Option<PathBuf>,

    /// Property taxonomy (defaults to input.property_type from the config)
    #[arg(short, long, value_enum)]
    pub property: Option<Property>,

    /// Gemini model name (defaults to model.model from the config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write all results to this file once the batch completes
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output file format (defaults to the --output extension, then json)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip images that fail instead of aborting the batch
    #[arg(long)]
    pub keep_going: bool,

    /// How the image MIME type is chosen
    #[arg(long, value_enum)]
    pub mime_policy: Option<MimeMode>,

    /// Gemini API key (overrides model.api_key)
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Everything assembled by setup_categorizer().
pub(crate) struct CategorizeContext {
    pub categorizer: Categorizer,
    pub property: PropertyType,
    pub files: Vec<DiscoveredFile>,
    pub input: PathBuf,
    pub batch_options: BatchOptions,
    pub output_format: CoreOutputFormat,
}

/// Execute the categorize command.
pub async fn execute(args: CategorizeArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_categorizer(&args, config)?;

    // An empty input still runs the batch so the zero totals are printed.
    if ctx.files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", ctx.input);
    } else {
        tracing::info!(
            "Categorizing {} image(s) as {}",
            ctx.files.len(),
            ctx.property
        );
    }

    match ctx.property {
        PropertyType::Hotel => run_batch::<HotelCategory>(&ctx, &args).await,
        PropertyType::Apartment => run_batch::<ApartmentCategory>(&ctx, &args).await,
    }
}
