use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use corral::{
    export, pipeline, plot_table, Dataset, Dims, DisplayConfig, JsonRender, Kmeans, Pca, Render,
};

/// Cluster URL embedding vectors and project them for display.
///
/// Reads a JSON array of {"url": ..., "vector": [...]} objects on stdin,
/// writes a clusters-<k>-<timestamp>.json export, and emits the plot table
/// on stdout for an external viewer. Diagnostics go to stderr.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Display dimensionality: 2 or 3
    #[arg(short, long, default_value_t = 2)]
    dims: usize,

    /// Directory for the export file [default: current directory]
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout is reserved for the render hand-off.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let dims = Dims::new(cli.dims).ok_or_else(|| anyhow!("--dims must be 2 or 3"))?;

    let data = Dataset::from_reader(io::stdin().lock())?;
    info!(
        n_samples = data.len(),
        n_features = data.n_features(),
        "processing items"
    );

    let analysis = pipeline::run(&data, dims, &Kmeans::new(), &Pca::new())?;
    info!(k = analysis.k, "clustering and projection complete");

    let path = export::write_export(&cli.out_dir, &data, &analysis.labels, analysis.k)?;
    info!(path = %path.display(), "cluster groups saved");

    let rows = plot_table(&data, &analysis.labels, &analysis.coords);
    let config = DisplayConfig::for_run(data.len(), analysis.k, dims);
    JsonRender::new(io::stdout().lock()).render(&rows, &config)?;

    Ok(())
}
