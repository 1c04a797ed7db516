//! Check command - validate configuration and page manifest

use std::path::Path;

use cartograph_core::{Config, PageEntry};
use cartograph_generator::{PageCollector, SitemapGenerator};
use color_eyre::eyre::{bail, Result};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and, when given, every manifest entry.
/// Writes nothing.
pub fn run(config_path: &Path, manifest: Option<&Path>, strict: bool) -> Result<()> {
    tracing::info!(?config_path, ?manifest, strict, "Checking configuration");

    let mut result = ValidationResult::default();

    // Validate configuration
    println!("Checking configuration...");
    let config = match Config::load(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    // Check for common issues
    if let Some(ref cfg) = config {
        println!("\nChecking configuration values...");
        check_config_values(cfg, &mut result);
    }

    // Validate manifest entries
    if let Some(path) = manifest {
        println!("\nChecking page manifest...");
        match PageCollector::from_manifest(path) {
            Ok(pages) => check_manifest_entries(&pages, config.as_ref(), &mut result),
            Err(e) => {
                result.add_error(format!("Manifest error: {e}"));
                println!("  ✗ Manifest invalid: {e}");
            }
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    let output = Path::new(&config.build.output_dir);
    if output.exists() && !output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            config.build.output_dir
        ));
    }

    if !config.sitemap.enabled {
        result.add_warning("sitemap generation is disabled");
    }

    if config.site.base_url.ends_with('/') {
        result.add_warning("site.base_url has a trailing slash (it will be ignored)");
    }

    println!("  ✓ Configuration values checked");
}

/// Validate every manifest entry with a dry run of the sitemap resolver.
fn check_manifest_entries(
    pages: &[PageEntry],
    config: Option<&Config>,
    result: &mut ValidationResult,
) {
    let Some(config) = config else {
        result.add_warning("Skipping manifest URL checks: configuration did not load");
        return;
    };

    let generator = SitemapGenerator::new(config.clone());
    match generator.check(pages) {
        Ok(unique) => {
            println!(
                "  ✓ All {} manifest entries valid ({unique} unique URLs)",
                pages.len()
            );
            if unique < pages.len() {
                result.add_warning(format!(
                    "{} duplicate or excluded entries will be dropped",
                    pages.len() - unique
                ));
            }
        }
        Err(e) => {
            result.add_error(format!("Manifest entry error: {e}"));
            println!("  ✗ {e}");
        }
    }
}
