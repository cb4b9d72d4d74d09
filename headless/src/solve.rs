use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use transport_plot_core::{
    ConstantProblem, GridConfig, TransportSolver, DEFAULT_CONFIG_PATH, DEFAULT_DATA_PATH,
};

/// Solve the linear transport equation on the configured grid
#[derive(Parser, Debug)]
#[command(name = "transport-solve")]
#[command(about = "Solve du/dt + c du/dx = 0 and write the grid as CSV", long_about = None)]
struct Args {
    /// JSON configuration with keys x, t, X, T, c
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// CSV file to write
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    output: PathBuf,

    /// Initial condition u(0, x)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    initial: f64,

    /// Inflow boundary condition u(t, 0)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    boundary: f64,
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
    let solver = TransportSolver::new(config).context("sizing grid")?;
    let problem = ConstantProblem {
        initial: args.initial,
        boundary: args.boundary,
    };

    let (grid, stats) = solver.solve(&problem).context("solving")?;
    grid.save(&args.output).context("writing grid")?;

    info!(
        "Wrote {}x{} grid to {} ({:.3} ms)",
        stats.t_size,
        stats.x_size,
        args.output.display(),
        stats.elapsed_ms()
    );
    Ok(())
}
