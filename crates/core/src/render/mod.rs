//! Surface rendering
//!
//! `SurfacePlotter::render` turns a grid and its configuration into a
//! labelled 3D surface figure:
//! 1. Build the `(x, t, value)` mesh from the grid and the axis steps
//! 2. Split every mesh cell into two triangles, shade them by height
//! 3. Project orthographically and sort back-to-front (painter's algorithm)
//! 4. Emit an SVG document with the title and the `x`/`t`/value axes
//!
//! Grids with a single row or column have no cells; they are drawn as a
//! line through the samples instead.

pub mod camera;
mod svg;

pub use camera::{Camera, PlotBox};

use crate::config::GridConfig;
use crate::error::{PlotError, Result};
use crate::grid::Grid;
use crate::mesh::SurfaceMesh;
use camera::{height_color, shade, triangle_normal};
use nalgebra::Point3;
use std::fs;
use std::path::Path;
use svg::Triangle;
use tracing::{debug, info, warn};

/// Default output file for headless rendering
pub const DEFAULT_OUTPUT_PATH: &str = "surface.svg";

/// Presentation settings for the rendered figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotStyle {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Viewing angles
    pub camera: Camera,
    /// Outline every triangle with a faint stroke
    pub show_mesh: bool,
}

impl Default for PlotStyle {
    /// 1200x800, a 12x8 figure at 100 dpi
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            camera: Camera::default(),
            show_mesh: true,
        }
    }
}

/// A rendered surface plot
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    title: String,
    svg: String,
    triangle_count: usize,
}

impl Figure {
    /// Title drawn above the plot
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The SVG document
    pub fn as_svg(&self) -> &str {
        &self.svg
    }

    /// Number of surface triangles drawn
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Write the figure to `path`
    ///
    /// # Errors
    /// Returns `FileAccess` if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.svg).map_err(|e| PlotError::file_access(path, e))?;
        info!("Wrote figure '{}' to {}", self.title, path.display());
        Ok(())
    }
}

/// Renders grids as labelled 3D surfaces
#[derive(Debug, Clone, Default)]
pub struct SurfacePlotter {
    style: PlotStyle,
}

impl SurfacePlotter {
    /// Create a plotter with the given style
    #[must_use]
    pub fn new(style: PlotStyle) -> Self {
        Self { style }
    }

    /// Current presentation settings
    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Render `grid` using the axis steps and parameter from `config`
    ///
    /// The first horizontal axis carries `x` (columns), the second `t`
    /// (rows) and the vertical axis the grid value. The title is
    /// `"c = <param>"`.
    ///
    /// # Errors
    /// Returns `Shape` if the grid has zero rows or columns, or an axis
    /// coordinate is not finite.
    pub fn render(&self, grid: &Grid, config: &GridConfig) -> Result<Figure> {
        let mesh = SurfaceMesh::build(grid, config)?;
        let title = config.title();

        if let Some(declared) = config.declared_shape() {
            if declared != grid.shape() {
                warn!(
                    "Grid shape {}x{} differs from the {}x{} implied by X = {}, T = {}",
                    grid.t_size(),
                    grid.x_size(),
                    declared.0,
                    declared.1,
                    config.x_max,
                    config.t_max
                );
            }
        }

        let z_range = mesh.z_range().unwrap_or_else(|| {
            warn!("Grid holds no finite values, drawing an empty surface");
            (0.0, 0.0)
        });
        let plot_box = PlotBox::new(mesh.x_range(), mesh.t_range(), z_range);

        let (triangles, skipped) = self.triangulate(&mesh, &plot_box);
        if skipped > 0 {
            warn!("Skipped {} triangles with non-finite corners", skipped);
        }
        let outline = if triangles.is_empty() {
            self.outline(&mesh, &plot_box)
        } else {
            Vec::new()
        };

        let svg = svg::document(&title, &triangles, &outline, &plot_box, &self.style);
        debug!("SVG document is {} bytes", svg.len());
        info!(
            "Rendered '{}': {}x{} mesh, {} triangles",
            title,
            mesh.t_size(),
            mesh.x_size(),
            triangles.len()
        );

        Ok(Figure {
            title,
            svg,
            triangle_count: triangles.len(),
        })
    }

    /// Shaded triangles sorted back-to-front, plus the count of skipped ones
    fn triangulate(&self, mesh: &SurfaceMesh, plot_box: &PlotBox) -> (Vec<Triangle>, usize) {
        let camera = &self.style.camera;
        let z_map = plot_box.z;
        let cells = mesh.t_size().saturating_sub(1) * mesh.x_size().saturating_sub(1);
        let mut triangles = Vec::with_capacity(cells * 2);
        let mut skipped = 0;

        for j in 0..mesh.t_size().saturating_sub(1) {
            for i in 0..mesh.x_size().saturating_sub(1) {
                let corner = |dj: usize, di: usize| mesh.point(j + dj, i + di);
                let (Some(p00), Some(p01), Some(p10), Some(p11)) =
                    (corner(0, 0), corner(0, 1), corner(1, 0), corner(1, 1))
                else {
                    continue;
                };

                for vertices in [[p00, p01, p10], [p11, p10, p01]] {
                    if vertices.iter().any(|p| !p.z.is_finite()) {
                        skipped += 1;
                        continue;
                    }
                    let boxed = vertices.map(|p| plot_box.apply(&p));
                    let height =
                        vertices.iter().map(|p| z_map.fraction(p.z)).sum::<f64>() / 3.0;
                    let normal = triangle_normal(&boxed[0], &boxed[1], &boxed[2]);
                    let centroid = Point3::from(
                        (boxed[0].coords + boxed[1].coords + boxed[2].coords) / 3.0,
                    );

                    triangles.push(Triangle {
                        projected: boxed.map(|p| camera.project(&p)),
                        depth: camera.depth(&centroid),
                        color: shade(height_color(height), &normal),
                    });
                }
            }
        }

        triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        (triangles, skipped)
    }

    /// Projected polyline through the finite samples of a 1-D mesh
    fn outline(&self, mesh: &SurfaceMesh, plot_box: &PlotBox) -> Vec<nalgebra::Point2<f64>> {
        mesh.points()
            .iter()
            .filter(|p| p.z.is_finite())
            .map(|p| self.style.camera.project(&plot_box.apply(p)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> (Grid, GridConfig) {
        let grid = Grid::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let config = GridConfig {
            x_step: 1.0,
            t_step: 2.0,
            x_max: 5.0,
            t_max: 10.0,
            param: 0.7,
        };
        (grid, config)
    }

    #[test]
    fn test_render_reference_figure() {
        let (grid, config) = reference();
        let figure = SurfacePlotter::default().render(&grid, &config).unwrap();

        assert_eq!(figure.title(), "c = 0.7");
        // 2x3 grid has 2 cells, 2 triangles each
        assert_eq!(figure.triangle_count(), 4);

        let svg = figure.as_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(">c = 0.7</text>"));
        assert!(svg.contains(">x</text>"));
        assert!(svg.contains(">t</text>"));
        assert_eq!(svg.matches("<polygon").count(), 4);
    }

    #[test]
    fn test_triangles_sorted_back_to_front() {
        let rows = (0..6)
            .map(|j| (0..7).map(|i| f64::from(i * j)).collect())
            .collect();
        let grid = Grid::from_rows(rows).unwrap();
        let (_, config) = reference();
        let plotter = SurfacePlotter::default();
        let mesh = SurfaceMesh::build(&grid, &config).unwrap();
        let plot_box = PlotBox::new(mesh.x_range(), mesh.t_range(), mesh.z_range().unwrap());

        let (triangles, skipped) = plotter.triangulate(&mesh, &plot_box);
        assert_eq!(skipped, 0);
        assert_eq!(triangles.len(), 5 * 6 * 2);
        assert!(triangles.windows(2).all(|w| w[0].depth >= w[1].depth));
    }

    #[test]
    fn test_non_finite_corners_are_skipped() {
        let grid = Grid::from_rows(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, f64::NAN, 3.0],
            vec![2.0, 3.0, 4.0],
        ])
        .unwrap();
        let (_, config) = reference();
        let figure = SurfacePlotter::default().render(&grid, &config).unwrap();
        // Every one of the 8 triangles touches the center sample except 2
        assert_eq!(figure.triangle_count(), 2);
    }

    #[test]
    fn test_single_row_draws_line() {
        let grid = Grid::from_rows(vec![vec![1.0, 3.0, 2.0]]).unwrap();
        let (_, config) = reference();
        let figure = SurfacePlotter::default().render(&grid, &config).unwrap();
        assert_eq!(figure.triangle_count(), 0);
        assert!(figure.as_svg().contains("<polyline"));
    }

    #[test]
    fn test_style_controls_canvas() {
        let (grid, config) = reference();
        let style = PlotStyle {
            width: 640,
            height: 480,
            show_mesh: false,
            ..Default::default()
        };
        let plotter = SurfacePlotter::new(style);
        assert_eq!(plotter.style().width, 640);
        assert!(!plotter.style().show_mesh);
        let figure = plotter.render(&grid, &config).unwrap();
        assert!(figure.as_svg().contains("viewBox=\"0 0 640 480\""));
        assert!(!figure.as_svg().contains("stroke=\"#00000030\""));
    }

    #[test]
    fn test_tiny_step_renders_without_declared_shape() {
        let (grid, _) = reference();
        let config = GridConfig::from_json_str(
            r#"{"x":1e-300,"t":1,"X":1,"T":1,"c":0.7}"#,
            "config",
        )
        .unwrap();
        assert_eq!(config.declared_shape(), None);
        let figure = SurfacePlotter::default().render(&grid, &config).unwrap();
        assert_eq!(figure.triangle_count(), 4);
        assert!(!figure.as_svg().contains("NaN"));
    }

    #[test]
    fn test_huge_step_is_shape_error() {
        let (grid, config) = reference();
        let config = GridConfig {
            x_step: 1e308,
            ..config
        };
        let err = SurfacePlotter::default().render(&grid, &config).unwrap_err();
        assert!(err.is_shape(), "{err}");
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let (grid, config) = reference();
        let figure = SurfacePlotter::default().render(&grid, &config).unwrap();
        let err = figure.save("/nonexistent/dir/surface.svg").unwrap_err();
        assert!(err.is_file_access());
    }
}
