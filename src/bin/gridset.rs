//! gridset CLI - lays out a table tree read from JSON and prints its geometry.

use clap::{Parser, ValueEnum};
use gridset::{
    DebugProfiler, GridsetError, LayoutConfig, MonospaceMetrics, SpanDistribution, Table, TablePath,
    geometry_to_json, load_tree_from_path,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gridset")]
#[command(version)]
#[command(about = "Lay out a table tree and print its geometry as JSON", long_about = None)]
struct Cli {
    /// Path to the table tree (JSON)
    input: PathBuf,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Advance of one character in points
    #[arg(long, default_value_t = 6.0)]
    advance: f32,

    /// Height of one line of text in points
    #[arg(long, default_value_t = 12.0)]
    line_height: f32,

    /// How spanning cells share their missing extent
    #[arg(long, value_enum, default_value_t = Distribution::Equal)]
    span_distribution: Distribution,

    /// Maximum depth of nested tables
    #[arg(long, default_value_t = 16)]
    max_depth: usize,

    /// Pretty print the output
    #[arg(short, long)]
    pretty: bool,

    /// Log positioner cache statistics and pass timings
    #[arg(long)]
    profile: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Distribution {
    Equal,
    Proportional,
}

impl From<Distribution> for SpanDistribution {
    fn from(d: Distribution) -> Self {
        match d {
            Distribution::Equal => SpanDistribution::Equal,
            Distribution::Proportional => SpanDistribution::Proportional,
        }
    }
}

fn main() -> Result<(), GridsetError> {
    env_logger::init();
    let cli = Cli::parse();

    let tree = load_tree_from_path(&cli.input)?;
    let env = MonospaceMetrics::new(cli.advance, cli.line_height);
    let config = LayoutConfig {
        span_distribution: cli.span_distribution.into(),
        max_nesting_depth: cli.max_depth,
    };

    let profiler = Arc::new(DebugProfiler::new());
    let mut table = Table::new(&env).with_config(config);
    if cli.profile {
        table = table.with_profiler(profiler.clone());
    }
    let geometry = table.typeset_full(&tree, TablePath::root())?;
    let json = geometry_to_json(geometry, cli.pretty)?;

    if cli.profile {
        profiler.log_summary(&cli.input.display().to_string());
    }

    match &cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok(())
}
