//! Build command - generates the sitemap for a built site

use std::{path::Path, time::Instant};

use cartograph_core::Config;
use cartograph_generator::{Builder, PageCollector};
use color_eyre::eyre::{bail, Result, WrapErr};

/// Run the build command.
///
/// Collects the page set from a manifest or by scanning the rendered
/// site, then writes the sitemap documents (and robots.txt) into the
/// output directory.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    manifest: Option<&Path>,
    scan: Option<&Path>,
    base_url: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(
        ?config_path,
        ?output,
        ?manifest,
        ?scan,
        ?base_url,
        "Starting build"
    );

    // Load configuration
    let mut config = Config::load(config_path).wrap_err("Failed to load configuration")?;

    // Override output directory if specified
    if let Some(out) = output {
        config.build.output_dir = out.to_string_lossy().to_string();
    }

    // Override base URL if specified via CLI
    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base URL from CLI");
        config.site.base_url = url.to_string();
        config.validate().wrap_err("Invalid base URL override")?;
    }

    tracing::debug!(?config, "Loaded configuration");

    // Collect pages from the manifest, or by scanning the rendered site
    let pages = match (manifest, scan) {
        (Some(path), _) => {
            PageCollector::from_manifest(path).wrap_err("Failed to read page manifest")?
        }
        (None, Some(dir)) => {
            PageCollector::scan(dir).wrap_err("Failed to scan site directory")?
        }
        (None, None) => bail!("either --manifest or --scan is required"),
    };

    let output_dir = config.build.output_dir.clone();
    let builder = Builder::new(config, output_dir.as_str());
    let report = builder.build(&pages).wrap_err("Build failed")?;

    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Sitemap generated successfully!");
    println!();
    println!("  Entries:    {}", report.entry_count);
    println!("  Documents:  {}", report.document_paths.len());
    if let Some(index) = &report.index_path {
        println!("  Index:      {}", index.display());
    }
    if let Some(robots) = &report.robots_path {
        println!("  Robots:     {}", robots.display());
    }
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {output_dir}");
    println!();

    tracing::info!(?report, ?duration, "Build completed successfully");

    Ok(())
}
