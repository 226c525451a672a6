//! Batch run: sequential categorization with progress, per-image report, and output.

use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use anyhow::Context;
use roomsort_core::{BatchEvent, Categorization, OutputWriter, Taxonomy};

use super::{CategorizeArgs, CategorizeContext};

/// Categorize every discovered file into taxonomy `T`.
///
/// Results go to stdout as they arrive. `--output` is written once, after the
/// whole batch has succeeded.
pub async fn run_batch<T: Taxonomy>(
    ctx: &CategorizeContext,
    args: &CategorizeArgs,
) -> anyhow::Result<()> {
    let progress = create_progress_bar(ctx.files.len() as u64);
    let start_time = Instant::now();

    let outcome = ctx
        .categorizer
        .categorize_batch::<T, _>(&ctx.files, &ctx.batch_options, |event| {
            match event {
                BatchEvent::Categorized(categorization) => {
                    progress.suspend(|| print_categorization(categorization));
                }
                BatchEvent::Skipped { path, .. } => {
                    progress.set_message(format!("skipped {}", path.display()));
                }
            }
            progress.inc(1);
        })
        .await;

    progress.finish_and_clear();
    let report = outcome.context("Batch aborted; no results were saved")?;

    tracing::info!(
        "Categorized {} image(s) in {:.1}s",
        report.results.len(),
        start_time.elapsed().as_secs_f64()
    );
    println!("{}", report.summary());

    if let Some(output_path) = &args.output {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create output file {:?}", output_path))?;
        let mut writer = OutputWriter::new(BufWriter::new(file), ctx.output_format, true);
        writer.write_all(&report.results)?;
        writer.flush()?;
        tracing::info!(
            "{} result(s) written to {:?}",
            writer.items_written(),
            output_path
        );
    }

    Ok(())
}

fn print_categorization<T: Taxonomy>(categorization: &Categorization<T>) {
    println!("Image path: {}", categorization.path.display());
    println!("Category: {}", categorization.category);
    println!("Reason: {}", categorization.reason);
    println!("{}", "-".repeat(100));
    println!("INPUT TOKENS: {}", categorization.input_tokens);
    println!("OUTPUT TOKENS: {}", categorization.output_tokens);
}

fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

    let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    match ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("##-")),
        Err(e) => tracing::debug!("Falling back to the default progress style: {e}"),
    }
    pb
}
