//! sketch-svg CLI - export planar sketches as SVG
//!
//! Reads a JSON scene of selection groups and writes an SVG document with
//! one stroked path per entity, styled from the settings file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sketch_svg::{
    export_selections, StyleTable, UnitScale, DEFAULT_HEIGHT, DEFAULT_WIDTH, SETTINGS_FILE_NAME,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod scene;

use scene::{Scene, SceneHost};

#[derive(Parser)]
#[command(name = "sketch-svg")]
#[command(about = "Export planar CAD sketches as SVG paths", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON scene to an SVG document
    Export {
        /// Input scene file (.json)
        input: PathBuf,
        /// Output .svg file, or `-` for stdout
        output: PathBuf,
        /// Output resolution in dots per inch
        #[arg(long, default_value_t = UnitScale::DEFAULT_DPI)]
        dpi: f64,
        /// Style settings file
        #[arg(long, default_value = SETTINGS_FILE_NAME)]
        settings: PathBuf,
        /// Drawing width in model units
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: f64,
        /// Drawing height in model units
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: f64,
    },
    /// Show or reset the style settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
        /// Style settings file
        #[arg(long, global = true, default_value = SETTINGS_FILE_NAME)]
        settings: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current styles
    Show,
    /// Restore the default styles
    Reset,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            dpi,
            settings,
            width,
            height,
        } => {
            export_file(&input, &output, dpi, &settings, width, height)?;
        }
        Commands::Settings { action, settings } => match action {
            SettingsAction::Show => {
                let styles = StyleTable::load_or_default(&settings);
                println!("{}", styles.to_text());
            }
            SettingsAction::Reset => {
                StyleTable::reset(&settings)
                    .with_context(|| format!("failed to reset {}", settings.display()))?;
                println!("Reset styles in {}", settings.display());
            }
        },
    }

    Ok(())
}

fn export_file(
    input: &Path,
    output: &Path,
    dpi: f64,
    settings: &Path,
    width: f64,
    height: f64,
) -> Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let scene = Scene::from_json(&json)?;
    let scale = UnitScale::from_dpi(dpi)?;
    let styles = StyleTable::load_or_default(settings);

    let mut host = SceneHost::default();
    let svg = export_selections(&mut host, &scene.groups, &styles, width, height, scale)?;

    if output == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(svg.as_bytes())?;
        stdout.flush()?;
    } else {
        fs::write(output, &svg)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Exported SVG to {}", output.display());
    }

    tracing::info!(groups = scene.groups.len(), dpi, "export finished");
    Ok(())
}
