use anyhow::Context;
use clap::{Parser, ValueEnum};
use proxigrid::{
    ClassifiedToCsv, ClassifiedToGeoJson, ClassifiedToGeoParquet, CsvExportConfig, GeometryFormat,
    RunConfig, classify, classify_parallel,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Geojson,
    Geoparquet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CellGeometry {
    Wkt,
    Geojson,
}

/// Classify a grid over a region by proximity to feature collections.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML run file describing the grid, policy and feature sources
    #[arg(short, long, value_name = "FILE", default_value = "proxigrid.toml")]
    config: PathBuf,

    /// Where to write the classified grid
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Geojson)]
    format: OutputFormat,

    /// Add a geometry column to CSV output
    #[arg(long, value_enum)]
    cell_geometry: Option<CellGeometry>,

    /// Classify rows on all cores
    #[arg(long)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let run = RunConfig::load(&args.config)
        .with_context(|| format!("loading run file {}", args.config.display()))?;
    let base_dir = args.config.parent().unwrap_or(Path::new("."));

    let features = run.load_features(base_dir)?;
    let config = run.classifier_config()?;

    let classified = if args.parallel {
        classify_parallel(&config, &features)?
    } else {
        classify(&config, &features)?
    };

    let palette = run.palette();
    match args.format {
        OutputFormat::Csv => {
            let mut export = CsvExportConfig::new().palette(palette);
            if let Some(geometry) = args.cell_geometry {
                export = export.with_cell_geometry(match geometry {
                    CellGeometry::Wkt => GeometryFormat::Wkt,
                    CellGeometry::Geojson => GeometryFormat::GeoJson,
                });
            }
            classified.to_csv(&args.output, &export)?;
        }
        OutputFormat::Geojson => classified.to_geojson_file(&args.output, Some(&palette))?,
        OutputFormat::Geoparquet => classified.to_geoparquet(&args.output)?,
    }
    log::info!("Wrote {} cells to {}", classified.len(), args.output.display());

    for (category, count) in classified.counts() {
        println!("{:>10}: {}", category.as_str(), count);
    }

    Ok(())
}
