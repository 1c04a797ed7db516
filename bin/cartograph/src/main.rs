//! Cartograph CLI
//!
//! Generates XML sitemaps for a statically built site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Cartograph.
#[derive(Parser)]
#[command(
    name = "cartograph",
    version,
    about = "Deterministic sitemap generation for statically built sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate the sitemap (and robots.txt) for a built site
    Build {
        /// Output directory (overrides build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// JSON page manifest emitted by the build pipeline
        #[arg(long, conflicts_with = "scan")]
        manifest: Option<std::path::PathBuf>,
        /// Rendered site directory to scan for pages
        #[arg(long)]
        scan: Option<std::path::PathBuf>,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate configuration and page manifest
    Check {
        /// JSON page manifest to validate
        #[arg(long)]
        manifest: Option<std::path::PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cartograph::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            manifest,
            scan,
            base_url,
        } => {
            cartograph::cmd::build::run(
                &cli.config,
                output.as_deref(),
                manifest.as_deref(),
                scan.as_deref(),
                base_url.as_deref(),
            )?;
        }
        Commands::Check { manifest, strict } => {
            cartograph::cmd::check::run(&cli.config, manifest.as_deref(), strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["cartograph", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("config.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                output,
                manifest,
                scan,
                base_url,
            } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist")));
                assert!(manifest.is_none());
                assert!(scan.is_none());
                assert!(base_url.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_manifest() {
        let args = ["cartograph", "build", "--manifest", "pages.json"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { manifest, .. } => {
                assert_eq!(manifest, Some(std::path::PathBuf::from("pages.json")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_manifest_conflicts_with_scan() {
        let args = [
            "cartograph",
            "build",
            "--manifest",
            "pages.json",
            "--scan",
            "public",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_build_with_base_url() {
        let args = [
            "cartograph",
            "build",
            "--scan",
            "public",
            "--base-url",
            "https://example.com",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { scan, base_url, .. } => {
                assert_eq!(scan, Some(std::path::PathBuf::from("public")));
                assert_eq!(base_url.as_deref(), Some("https://example.com"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["cartograph", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { manifest, strict } => {
                assert!(manifest.is_none());
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["cartograph", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["cartograph", "--config", "site.toml", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }
}
