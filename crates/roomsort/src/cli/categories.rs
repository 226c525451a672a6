//! The `roomsort categories` command: print the labels of a taxonomy.

use clap::Args;
use roomsort_core::{Config, PropertyType};

use super::categorize::Property;

/// Arguments for the `categories` command.
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Property taxonomy (defaults to input.property_type from the config)
    #[arg(short, long, value_enum)]
    pub property: Option<Property>,

    /// Print the labels as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Execute the categories command.
pub fn execute(args: CategoriesArgs, config: &Config) -> anyhow::Result<()> {
    let property: PropertyType = args
        .property
        .map(Into::into)
        .unwrap_or(config.input.property_type);
    let labels = property.labels();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&labels)?);
    } else {
        for label in labels {
            println!("{label}");
        }
    }
    Ok(())
}
