use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use transport_plot_core::{
    Camera, Grid, GridConfig, PlotStyle, SurfacePlotter, DEFAULT_CONFIG_PATH, DEFAULT_DATA_PATH,
    DEFAULT_OUTPUT_PATH,
};

/// Render a solver result grid as a 3D surface
#[derive(Parser, Debug)]
#[command(name = "surface-plot")]
#[command(about = "Plot a transport solver grid as a labelled 3D surface", long_about = None)]
struct Args {
    /// JSON configuration with keys x, t, X, T, c
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Comma-separated grid, one time layer per row
    #[arg(default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// SVG file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Camera rotation around the vertical axis in degrees
    #[arg(long, default_value_t = -60.0, allow_negative_numbers = true)]
    azimuth: f64,

    /// Camera angle above the horizontal plane in degrees
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    elevation: f64,

    /// Do not outline the surface triangles
    #[arg(long)]
    no_mesh: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = GridConfig::load(&args.config).context("loading configuration")?;
    let grid = Grid::load(&args.data).context("loading grid")?;

    let style = PlotStyle {
        width: args.width,
        height: args.height,
        camera: Camera::from_degrees(args.azimuth, args.elevation),
        show_mesh: !args.no_mesh,
    };
    let figure = SurfacePlotter::new(style)
        .render(&grid, &config)
        .context("rendering surface")?;
    figure.save(&args.output).context("writing figure")?;

    info!(
        "Done: '{}' with {} triangles",
        figure.title(),
        figure.triangle_count()
    );
    Ok(())
}
