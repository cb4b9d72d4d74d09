//! Transport Plot Core Library
//!
//! Loads a solver configuration and the grid of values it produced, and
//! renders the grid as a labelled 3D surface.
//!
//! ## Pipeline
//!
//! 1. [`GridConfig::load`] reads the JSON configuration (`x`, `t`, `X`, `T`, `c`)
//! 2. [`Grid::load`] reads the comma-separated grid, one time layer per row
//! 3. [`SurfacePlotter::render`] builds the `(x, t, value)` mesh and draws it
//!    as an SVG figure titled `c = <param>`
//!
//! The [`solver`] module produces such grids for the linear transport
//! equation `du/dt + c du/dx = f(t, x)` on the configured domain.
//!
//! ```no_run
//! use transport_plot_core::{Grid, GridConfig, SurfacePlotter};
//!
//! # fn main() -> transport_plot_core::Result<()> {
//! let config = GridConfig::load("config")?;
//! let grid = Grid::load("res.csv")?;
//! let figure = SurfacePlotter::default().render(&grid, &config)?;
//! figure.save("surface.svg")?;
//! # Ok(())
//! # }
//! ```

// Inputs
pub mod config;
pub mod grid;

// Presentation
pub mod mesh;
pub mod render;

// Producing grids
pub mod solver;

pub mod error;

pub use config::{GridConfig, DEFAULT_CONFIG_PATH};
pub use error::{Location, PlotError, Result};
pub use grid::{Grid, DEFAULT_DATA_PATH};
pub use mesh::SurfaceMesh;
pub use render::{Camera, Figure, PlotStyle, SurfacePlotter, DEFAULT_OUTPUT_PATH};
pub use solver::{ConstantProblem, FnProblem, SolveStats, TransportProblem, TransportSolver};
