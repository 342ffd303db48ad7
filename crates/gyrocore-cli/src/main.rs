//! gyrocore CLI - command-line front end for core geometry generation

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gyrocore_core::{Parameters, ProgressControl, export::export_stl, generate_detailed};

#[derive(Parser)]
#[command(name = "gyrocore")]
#[command(about = "Gyroid-filled heat-exchanger core geometry generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a core mesh and write it as binary STL
    Generate {
        /// Parameter file (JSON). Omit to use built-in defaults.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Output STL path
        #[arg(short, long, default_value = "core.stl")]
        output: PathBuf,

        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Print the default parameter record as JSON
    DefaultParams,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { params, output, quiet } => run_generate(params.as_deref(), &output, quiet),
        Commands::DefaultParams => print_default_params(),
    }
}

fn load_params(path: Option<&std::path::Path>) -> Result<Parameters> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading parameter file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing parameter file {}", path.display()))
        }
        None => Ok(Parameters::default()),
    }
}

fn run_generate(params_path: Option<&std::path::Path>, output: &PathBuf, quiet: bool) -> Result<()> {
    let params = load_params(params_path)?;

    println!(
        "Generating {:?} core: size={}mm cellSize={}mm resolution={}",
        params.mode, params.size, params.cell_size, params.resolution
    );

    let started = Instant::now();
    let mut last_reported = u32::MAX;
    let mut on_progress = |percent: u32| -> ProgressControl {
        if !quiet && percent != last_reported {
            last_reported = percent;
            println!("  {percent:3}%");
        }
        ProgressControl::Continue
    };

    let outcome = generate_detailed(&params, &mut on_progress)
        .map_err(|e| anyhow::anyhow!("generation failed: {e}"))?;

    if (outcome.snapped_cell_size - params.cell_size).abs() > 0.1 {
        println!(
            "note: cellSize snapped from {} to {} to tile the cube exactly",
            params.cell_size, outcome.snapped_cell_size
        );
    }

    println!(
        "Generated {} vertices, {} triangles in {:.2?}",
        outcome.mesh.vertex_count(),
        outcome.mesh.triangle_count(),
        started.elapsed()
    );

    let bytes = export_stl(&outcome.mesh);
    fs::write(output, &bytes).with_context(|| format!("writing STL to {}", output.display()))?;
    println!("Wrote {} ({} bytes)", output.display(), bytes.len());

    Ok(())
}

fn print_default_params() -> Result<()> {
    let json = serde_json::to_string_pretty(&Parameters::default())?;
    println!("{json}");
    Ok(())
}
