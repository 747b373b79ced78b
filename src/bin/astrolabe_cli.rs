//! Astrolabe CLI
//!
//! `make` renders the parts and assembly documents for every combination of
//! the requested languages, types, latitudes and formats. `list` prints the
//! recognized languages and supported formats as JSON.
//!
//! Exit codes: 0 success, 2 configuration rejected, 1 anything else.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use astrolabe_core::{
    graphics::GraphicsPage,
    pipeline::{PipelineError, Sweep, SweepConfig},
    settings::{AstrolabeType, Theme},
    text::TextRegistry,
    ImageFormat,
};

#[derive(Parser)]
#[command(name = "astrolabe-cli")]
#[command(about = "Astrolabe Kit Generator - model astrolabe parts and assembly documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render parts and assembly documents for every parameter combination
    Make {
        /// Latitudes to create astrolabes for, degrees
        #[arg(long, num_args = 0.., default_values_t = [52])]
        latitudes: Vec<i32>,

        /// Astrolabe types to create
        #[arg(long = "types", value_enum, num_args = 0.., default_values_t = [AstrolabeType::Full])]
        astrolabe_types: Vec<AstrolabeType>,

        /// Languages to create astrolabes for
        #[arg(long, num_args = 0.., default_values_t = ["en".to_string()])]
        languages: Vec<String>,

        /// Image formats to create
        #[arg(long = "formats", value_enum, num_args = 0.., default_values_t = [ImageFormat::Png])]
        formats: Vec<ImageFormat>,

        /// Directory for output
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Color theme to be used in the astrolabe
        #[arg(long, value_enum, default_value_t = Theme::Default)]
        theme: Theme,

        /// Assembly document template overriding the built-in one
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// List recognized languages and supported image formats
    List,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Make {
            latitudes,
            astrolabe_types,
            languages,
            formats,
            output_dir,
            theme,
            template,
        } => {
            let config = SweepConfig {
                languages,
                astrolabe_types,
                latitudes,
                formats,
                output_dir,
                theme,
            };

            let sweep = match Sweep::with_template(config, template.as_deref()) {
                Ok(sweep) => sweep,
                Err(e @ (PipelineError::Config(_) | PipelineError::Template(_))) => {
                    eprintln!("{e}");
                    return ExitCode::from(2);
                }
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::FAILURE;
                }
            };

            match sweep.run() {
                Ok(manifest) => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "run_id": manifest.run_id,
                            "artifacts": manifest.artifacts.len(),
                            "documents": manifest.documents.len(),
                            "manifest_hash": manifest.manifest_hash,
                        })
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::List => {
            let registry = match TextRegistry::builtin() {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("failed to load text tables: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let listing = serde_json::json!({
                "languages": registry.languages(),
                "formats": GraphicsPage::supported_formats()
                    .iter()
                    .map(|f| f.extension())
                    .collect::<Vec<_>>(),
            });
            match serde_json::to_string_pretty(&listing) {
                Ok(text) => {
                    println!("{text}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
