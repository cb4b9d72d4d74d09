//! Linear transport equation solver
//!
//! Produces the grid that the surface plotter visualizes. The domain and
//! steps come from the same configuration file:
//! - rows: time layers `t_k = k * dt`, `k = 0 ..= ceil(T / dt)`
//! - columns: space samples `x_m = m * dx`, `m = 0 ..= ceil(X / dx)`
//!
//! Layer 0 holds the initial condition, column 0 the inflow boundary.
//! The first computed layer uses the upwind stencil, later layers the
//! three-level cross stencil (see [`scheme`]). Columns of each layer are
//! computed in parallel with Rayon; layers are sequential.

mod problem;
pub mod scheme;

pub use problem::{ConstantProblem, FnProblem, TransportProblem};
pub use scheme::Steps;

use crate::config::GridConfig;
use crate::error::{Location, PlotError, Result};
use crate::grid::Grid;
use scheme::advance_layer;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Largest grid the solver will allocate, in cells
pub const MAX_CELLS: usize = 1 << 28;

/// Label used in errors about the solver configuration
const CONFIG_ORIGIN: &str = "<config>";

/// Summary of a completed solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveStats {
    /// Number of time layers
    pub t_size: usize,
    /// Number of space samples per layer
    pub x_size: usize,
    /// Courant number `c * dt / dx`
    pub courant: f64,
    /// Wall-clock time spent filling layers
    pub elapsed: Duration,
}

impl SolveStats {
    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Explicit finite-difference solver on the configured grid
#[derive(Debug, Clone)]
pub struct TransportSolver {
    config: GridConfig,
    t_size: usize,
    x_size: usize,
    steps: Steps,
}

impl TransportSolver {
    /// Size the solver from the declared extents in `config`
    ///
    /// # Errors
    /// - `Parse` if a step is not a positive finite number or an extent is
    ///   negative or non-finite, or the speed is non-finite
    /// - `Shape` if the implied grid exceeds [`MAX_CELLS`] or its sample
    ///   counts do not fit in `usize`
    pub fn new(config: GridConfig) -> Result<Self> {
        if !config.has_valid_axes() {
            return Err(PlotError::parse(
                CONFIG_ORIGIN,
                Location::default(),
                format!(
                    "steps must be positive and extents non-negative (x = {}, t = {}, X = {}, T = {})",
                    config.x_step, config.t_step, config.x_max, config.t_max
                ),
            ));
        }
        if !config.param.is_finite() {
            return Err(PlotError::parse(
                CONFIG_ORIGIN,
                Location::default(),
                format!("c must be finite, got {}", config.param),
            ));
        }
        let too_large = |observed: String| {
            PlotError::shape(
                CONFIG_ORIGIN,
                "declared extents imply too large a grid",
                format!("at most {MAX_CELLS} cells"),
                observed,
            )
        };
        let Some((t_size, x_size)) = config.declared_shape() else {
            return Err(too_large(format!(
                "X / x = {}, T / t = {}",
                config.x_max / config.x_step,
                config.t_max / config.t_step
            )));
        };
        match t_size.checked_mul(x_size) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => return Err(too_large(format!("{t_size}x{x_size}"))),
        }

        let steps = Steps::new(config.t_step, config.x_step, config.param);
        if steps.courant.abs() > 1.0 {
            warn!(
                "Courant number {:.3} exceeds 1, the explicit schemes are unstable",
                steps.courant
            );
        }
        if config.param <= 0.0 {
            warn!(
                "Inflow boundary at x = 0 assumes c > 0, got c = {}",
                config.param
            );
        }

        Ok(Self {
            config,
            t_size,
            x_size,
            steps,
        })
    }

    /// Grid shape as `(t_size, x_size)`
    pub fn shape(&self) -> (usize, usize) {
        (self.t_size, self.x_size)
    }

    /// Step sizes and Courant number
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Configuration the solver was built from
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Solve `problem` over the whole domain
    ///
    /// # Errors
    /// Propagates grid construction failures; with dimensions validated in
    /// [`TransportSolver::new`] none are expected.
    pub fn solve<P: TransportProblem + ?Sized>(&self, problem: &P) -> Result<(Grid, SolveStats)> {
        info!("{}", self.config);
        info!(
            "Grid {}x{} (layers x samples), Courant number {:.4}",
            self.t_size, self.x_size, self.steps.courant
        );

        let (t_size, x_size) = (self.t_size, self.x_size);
        let mut values = vec![0.0; t_size * x_size];
        for (m, cell) in values[..x_size].iter_mut().enumerate() {
            *cell = problem.initial(self.steps.dx * m as f64);
        }

        let start = Instant::now();
        for k in 0..t_size - 1 {
            let (done, rest) = values.split_at_mut((k + 1) * x_size);
            let current = &done[k * x_size..];
            let before = k.checked_sub(1).map(|p| &done[p * x_size..k * x_size]);
            advance_layer(problem, before, current, &mut rest[..x_size], k, self.steps);
            debug!("Filled layer {} of {}", k + 1, t_size - 1);
        }
        let elapsed = start.elapsed();

        let stats = SolveStats {
            t_size,
            x_size,
            courant: self.steps.courant,
            elapsed,
        };
        info!("Pure calculation: {:.3} ms", stats.elapsed_ms());

        let grid = Grid::from_values(values, t_size, x_size)?;
        Ok((grid, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(x_step: f64, t_step: f64, x_max: f64, t_max: f64, param: f64) -> GridConfig {
        GridConfig {
            x_step,
            t_step,
            x_max,
            t_max,
            param,
        }
    }

    #[test]
    fn test_shape_from_declared_extents() {
        let solver = TransportSolver::new(config(1.0, 2.0, 5.0, 10.0, 0.7)).unwrap();
        assert_eq!(solver.shape(), (6, 6));
        assert_relative_eq!(solver.steps().courant, 1.4);
    }

    #[test]
    fn test_constant_problem_stays_constant() {
        let solver = TransportSolver::new(config(0.1, 0.05, 1.0, 1.0, 1.0)).unwrap();
        let (grid, stats) = solver.solve(&ConstantProblem::default()).unwrap();
        assert_eq!(grid.shape(), (21, 11));
        assert_eq!(stats.t_size, 21);
        assert_eq!(stats.x_size, 11);
        assert!(grid.as_slice().iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_linear_profile_is_transported_exactly() {
        // u = x - c t solves the homogeneous equation; both stencils are exact on it
        let c = 0.8;
        let solver = TransportSolver::new(config(0.1, 0.05, 1.0, 0.5, c)).unwrap();
        let problem = FnProblem::new(|_t, _x| 0.0, |x| x, move |t| -c * t);
        let (grid, _) = solver.solve(&problem).unwrap();

        for k in 0..grid.t_size() {
            for m in 0..grid.x_size() {
                let expected = 0.1 * m as f64 - c * 0.05 * k as f64;
                assert_relative_eq!(grid.get(k, m).unwrap(), expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_source_term_accumulates() {
        // c = 0, f = 1: u = t
        let solver = TransportSolver::new(config(1.0, 0.25, 2.0, 2.0, 0.0)).unwrap();
        let problem = FnProblem::new(|_t, _x| 1.0, |_x| 0.0, |t| t);
        let (grid, _) = solver.solve(&problem).unwrap();

        for k in 0..grid.t_size() {
            for value in grid.row(k).unwrap() {
                assert_relative_eq!(*value, 0.25 * k as f64, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_single_layer_is_initial_condition() {
        let solver = TransportSolver::new(config(0.5, 1.0, 1.0, 0.0, 1.0)).unwrap();
        let problem = FnProblem::new(|_t, _x| 0.0, |x| 2.0 * x, |_t| 0.0);
        let (grid, _) = solver.solve(&problem).unwrap();
        assert_eq!(grid.shape(), (1, 3));
        assert_eq!(grid.row(0), Some(&[0.0, 1.0, 2.0][..]));
    }

    #[test]
    fn test_invalid_steps_rejected() {
        assert!(TransportSolver::new(config(0.0, 1.0, 1.0, 1.0, 1.0))
            .unwrap_err()
            .is_parse());
        assert!(TransportSolver::new(config(1.0, -1.0, 1.0, 1.0, 1.0))
            .unwrap_err()
            .is_parse());
        assert!(TransportSolver::new(config(1.0, 1.0, 1.0, 1.0, f64::NAN))
            .unwrap_err()
            .is_parse());
    }

    #[test]
    fn test_unrepresentable_sample_count_rejected() {
        let err = TransportSolver::new(config(1e-300, 1.0, 1.0, 1.0, 0.7)).unwrap_err();
        assert!(err.is_shape(), "{err}");
        let err = TransportSolver::new(config(1.0, 1.0, 1e30, 1.0, 0.7)).unwrap_err();
        assert!(err.is_shape(), "{err}");
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let err = TransportSolver::new(config(1e-9, 1e-9, 1.0, 1.0, 1.0)).unwrap_err();
        assert!(err.is_shape());
    }
}
