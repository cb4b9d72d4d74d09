//! Coordinate axes and the Cartesian surface mesh
//!
//! Column `i` of the grid sits at `x = x_step * i` and row `j` at
//! `t = t_step * j`. The mesh pairs every `(x_axis[i], t_axis[j])` with
//! `grid[j][i]`, giving the points handed to the surface renderer.

use crate::config::GridConfig;
use crate::error::{PlotError, Result};
use crate::grid::Grid;
use nalgebra::Point3;

/// Evenly spaced axis `[0, step, 2*step, ...]` with `len` samples
#[must_use]
pub fn axis(step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| step * i as f64).collect()
}

/// Surface mesh over `(x, t)` with the grid value as height
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    /// Spatial coordinates, one per grid column
    pub x_axis: Vec<f64>,
    /// Temporal coordinates, one per grid row
    pub t_axis: Vec<f64>,
    /// Mesh points in row-major order (`j * x_size + i`)
    points: Vec<Point3<f64>>,
}

impl SurfaceMesh {
    /// Build the mesh for `grid` using the steps in `config`
    ///
    /// # Errors
    /// Returns `Shape` if the grid has zero rows or zero columns, or if a
    /// step is so large (or non-finite) that an axis coordinate overflows.
    pub fn build(grid: &Grid, config: &GridConfig) -> Result<Self> {
        let (t_size, x_size) = grid.shape();
        if t_size == 0 || x_size == 0 {
            return Err(PlotError::shape(
                "<mesh>",
                "cannot build a mesh over a degenerate grid",
                "at least 1x1",
                format!("{t_size}x{x_size}"),
            ));
        }

        let x_axis = axis(config.x_step, x_size);
        let t_axis = axis(config.t_step, t_size);
        for (name, values) in [("x", &x_axis), ("t", &t_axis)] {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(PlotError::shape(
                    "<mesh>",
                    format!("{name} axis coordinates are not finite"),
                    "finite coordinates",
                    bad,
                ));
            }
        }

        let points = grid
            .rows()
            .zip(&t_axis)
            .flat_map(|(row, &t)| {
                row.iter()
                    .zip(&x_axis)
                    .map(move |(&value, &x)| Point3::new(x, t, value))
            })
            .collect();

        Ok(Self {
            x_axis,
            t_axis,
            points,
        })
    }

    /// Number of spatial samples
    pub fn x_size(&self) -> usize {
        self.x_axis.len()
    }

    /// Number of time samples
    pub fn t_size(&self) -> usize {
        self.t_axis.len()
    }

    /// Point at time index `j` and space index `i`
    pub fn point(&self, j: usize, i: usize) -> Option<Point3<f64>> {
        if j < self.t_size() && i < self.x_size() {
            Some(self.points[j * self.x_size() + i])
        } else {
            None
        }
    }

    /// All mesh points in row-major order
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Extent of the spatial axis as `(min, max)`
    pub fn x_range(&self) -> (f64, f64) {
        span(&self.x_axis)
    }

    /// Extent of the time axis as `(min, max)`
    pub fn t_range(&self) -> (f64, f64) {
        span(&self.t_axis)
    }

    /// Extent of finite heights, `None` if no height is finite
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let finite = self.points.iter().map(|p| p.z).filter(|z| z.is_finite());
        let mut range: Option<(f64, f64)> = None;
        for z in finite {
            range = Some(range.map_or((z, z), |(lo, hi)| (lo.min(z), hi.max(z))));
        }
        range
    }
}

/// `(min, max)` of an axis, which may run backwards for a negative step
fn span(axis: &[f64]) -> (f64, f64) {
    axis.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
