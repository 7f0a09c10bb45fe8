//! Build command - generates the static site

use std::path::Path;

use brochure_core::Config;
use brochure_generator::Builder;
use color_eyre::eyre::{Result, WrapErr};

/// Run the build command.
///
/// Renders every page under the source directory into the output directory.
/// `output` overrides the configured output directory.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    tracing::info!(?config_path, ?output, "Starting build");

    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let output_dir = output.unwrap_or(config.build.output_dir.as_path());
    let builder = Builder::from_config(&config.build).with_output_dir(output_dir);
    let stats = builder.build().wrap_err("Build failed")?;

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:       {}", stats.pages);
    println!("  Directories: {}", stats.directories);
    println!("  Skipped:     {}", stats.skipped);
    println!();
    println!("  Duration:    {}ms", stats.duration_ms);
    println!("  Output:      {}", output_dir.display());
    println!();

    tracing::info!(?stats, "Build completed successfully");

    Ok(())
}
