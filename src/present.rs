//! Presentation adapter: assemble plot rows and hand them to a renderer.
//!
//! This stage does no computation beyond assembly and sorting. It combines
//! the dataset, the cluster labels, and the projected coordinates into a
//! legend-friendly row table, pairs it with an explicit [`DisplayConfig`]
//! (no ambient renderer state), and passes both across the [`Render`] seam.
//!
//! The renderer is an external collaborator: its blocking or failure
//! behavior is outside the pipeline's contract. The shipped implementation,
//! [`JsonRender`], writes the table as a structured JSON document for an
//! external viewer to consume.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::ingest::Dataset;
use crate::project::Dims;

/// Categorical 10-color palette (one color per possible cluster, cap 8,
/// with headroom).
const PALETTE: [&str; 10] = [
    "#3366CC", "#DC3912", "#FF9900", "#109618", "#990099", "#0099C6", "#DD4477", "#66AA00",
    "#B82E2E", "#316395",
];

/// One row of the plot table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRow {
    /// Projected display coordinates (arity 2 or 3).
    pub coords: Vec<f32>,
    /// Cluster id as a string, so renderers treat it as a category rather
    /// than a continuous scale.
    pub cluster: String,
    /// The record's URL (hover/tooltip key).
    pub url: String,
}

/// Display configuration handed to the renderer alongside the rows.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayConfig {
    /// Plot title.
    pub title: String,
    /// Categorical color palette, indexed by cluster id.
    pub palette: Vec<String>,
    /// One label per display axis.
    pub axis_labels: Vec<String>,
    /// Marker size in display units.
    pub marker_size: u32,
    /// Plot height in pixels.
    pub height: u32,
}

impl DisplayConfig {
    /// Default configuration for a run: title embedding the sample and
    /// cluster counts, fixed palette, axis labels matching the arity.
    pub fn for_run(n_samples: usize, k: usize, dims: Dims) -> Self {
        let axis_labels = (1..=dims.len()).map(|i| format!("Component {i}")).collect();
        let (marker_size, height) = match dims {
            Dims::Two => (10, 800),
            Dims::Three => (5, 900),
        };
        Self {
            title: format!("Cluster analysis ({n_samples} items, {k} clusters)"),
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
            axis_labels,
            marker_size,
            height,
        }
    }
}

/// Build the plot table: one row per record, stably sorted by ascending
/// numeric cluster id (ties keep the dataset's input order).
pub fn plot_table(data: &Dataset, labels: &[usize], coords: &[Vec<f32>]) -> Vec<PlotRow> {
    debug_assert_eq!(labels.len(), data.len());
    debug_assert_eq!(coords.len(), data.len());

    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by_key(|&i| labels[i]);

    order
        .into_iter()
        .map(|i| PlotRow {
            coords: coords[i].clone(),
            cluster: labels[i].to_string(),
            url: data.records()[i].url.clone(),
        })
        .collect()
}

/// External rendering collaborator.
pub trait Render {
    /// Render the row table with the given display configuration.
    fn render(&mut self, rows: &[PlotRow], config: &DisplayConfig) -> Result<()>;
}

/// Renderer that writes `{ "config": ..., "rows": ... }` as pretty-printed
/// JSON to a sink, for an external interactive viewer.
#[derive(Debug)]
pub struct JsonRender<W: Write> {
    sink: W,
}

#[derive(Serialize)]
struct RenderDocument<'a> {
    config: &'a DisplayConfig,
    rows: &'a [PlotRow],
}

impl<W: Write> JsonRender<W> {
    /// Create a renderer writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Consume the renderer, returning the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Render for JsonRender<W> {
    fn render(&mut self, rows: &[PlotRow], config: &DisplayConfig) -> Result<()> {
        let doc = RenderDocument { config, rows };
        serde_json::to_writer_pretty(&mut self.sink, &doc)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        writeln!(self.sink)?;
        Ok(())
    }
}
