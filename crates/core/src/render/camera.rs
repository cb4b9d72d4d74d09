//! Orthographic camera, normalized plot box and surface shading
//!
//! Mesh coordinates are first mapped into a normalized box
//! `[-1, 1] x [-1, 1] x [-Z_SCALE, Z_SCALE]`, then projected by a camera
//! placed at spherical angles `(azimuth, elevation)` around the origin.

use nalgebra::{Point2, Point3, Vector3};

/// Half-height of the normalized box relative to its half-width
///
/// Matches a 4:4:3 box aspect.
pub const Z_SCALE: f64 = 0.75;

/// Spans narrower than this are treated as a single value
const DEGENERATE_SPAN: f64 = 1e-12;

/// Orthographic camera looking at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Rotation around the vertical axis in radians
    pub azimuth: f64,
    /// Angle above the horizontal plane in radians
    pub elevation: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth: (-60.0_f64).to_radians(),
            elevation: 30.0_f64.to_radians(),
        }
    }
}

impl Camera {
    /// Camera from angles in degrees
    #[must_use]
    pub fn from_degrees(azimuth: f64, elevation: f64) -> Self {
        Self {
            azimuth: azimuth.to_radians(),
            elevation: elevation.to_radians(),
        }
    }

    /// Project a box point onto the screen plane
    ///
    /// Screen `y` grows upwards.
    #[must_use]
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();

        let screen_x = -p.x * sa + p.y * ca;
        let screen_y = -p.x * ca * se - p.y * sa * se + p.z * ce;
        Point2::new(screen_x, screen_y)
    }

    /// Distance along the viewing direction, larger is further away
    #[must_use]
    pub fn depth(&self, p: &Point3<f64>) -> f64 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        -(p.x * ce * ca + p.y * ce * sa + p.z * se)
    }
}

/// Linear map from one closed interval onto another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    /// Source interval `(lo, hi)`
    pub range: (f64, f64),
    /// Half-length of the target interval, centered on zero
    pub half: f64,
}

impl AxisMap {
    /// Map `range` onto `[-half, half]`
    #[must_use]
    pub fn new(range: (f64, f64), half: f64) -> Self {
        Self { range, half }
    }

    /// True when the source interval collapses to a single value or is
    /// not finite
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let (lo, hi) = self.range;
        !(lo.is_finite() && hi.is_finite()) || (hi - lo).abs() < DEGENERATE_SPAN
    }

    /// Map a source value into the box, degenerate axes map to zero
    #[must_use]
    pub fn apply(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.ratio(v) * 2.0 * self.half - self.half
    }

    /// Fraction of the way from `lo` to `hi`, clamped to `[0, 1]`
    #[must_use]
    pub fn fraction(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            return 0.5;
        }
        self.ratio(v).clamp(0.0, 1.0)
    }

    /// `(v - lo) / (hi - lo)`, halved first so spans near `f64::MAX` stay finite
    fn ratio(&self, v: f64) -> f64 {
        let (lo, hi) = self.range;
        (v / 2.0 - lo / 2.0) / (hi / 2.0 - lo / 2.0)
    }
}

/// Mapping from mesh coordinates into the normalized plot box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBox {
    /// Spatial axis
    pub x: AxisMap,
    /// Time axis
    pub t: AxisMap,
    /// Height axis
    pub z: AxisMap,
}

impl PlotBox {
    /// Build the box for the given coordinate extents
    #[must_use]
    pub fn new(x_range: (f64, f64), t_range: (f64, f64), z_range: (f64, f64)) -> Self {
        Self {
            x: AxisMap::new(x_range, 1.0),
            t: AxisMap::new(t_range, 1.0),
            z: AxisMap::new(z_range, Z_SCALE),
        }
    }

    /// Map a mesh point into box coordinates
    #[must_use]
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::new(self.x.apply(p.x), self.t.apply(p.y), self.z.apply(p.z))
    }

    /// The 8 corners of the box
    #[must_use]
    pub fn corners() -> [Point3<f64>; 8] {
        let mut corners = [Point3::origin(); 8];
        for (idx, corner) in corners.iter_mut().enumerate() {
            let sx = if idx & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if idx & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if idx & 4 == 0 { -Z_SCALE } else { Z_SCALE };
            *corner = Point3::new(sx, sy, sz);
        }
        corners
    }
}

/// RGB triple
pub type Rgb = (u8, u8, u8);

/// Height colormap: blue at the bottom, green in the middle, orange on top
#[must_use]
pub fn height_color(z_norm: f64) -> Rgb {
    let t = z_norm.clamp(0.0, 1.0);
    let (from, to, s) = if t < 0.5 {
        ([0.37, 0.51, 0.71], [0.39, 0.69, 0.29], t * 2.0)
    } else {
        ([0.39, 0.69, 0.29], [0.88, 0.58, 0.17], (t - 0.5) * 2.0)
    };
    let mix = |c: usize| ((from[c] * (1.0 - s) + to[c] * s) * 255.0).round() as u8;
    (mix(0), mix(1), mix(2))
}

/// Unit normal of a triangle, `+z` when the triangle is degenerate
#[must_use]
pub fn triangle_normal(v0: &Point3<f64>, v1: &Point3<f64>, v2: &Point3<f64>) -> Vector3<f64> {
    let n = (v1 - v0).cross(&(v2 - v0));
    n.try_normalize(1e-15).unwrap_or_else(Vector3::z)
}

/// Ambient plus two-sided diffuse lighting from the upper front left
#[must_use]
pub fn shade(color: Rgb, normal: &Vector3<f64>) -> Rgb {
    const AMBIENT: f64 = 0.35;
    let light = Vector3::new(0.4, -0.5, 0.76).normalize();
    let diffuse = normal.dot(&light).abs();
    let intensity = (AMBIENT + (1.0 - AMBIENT) * diffuse).clamp(0.0, 1.0);
    let scale = |c: u8| (f64::from(c) * intensity).round() as u8;
    (scale(color.0), scale(color.1), scale(color.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_map() {
        let map = AxisMap::new((0.0, 4.0), 1.0);
        assert_relative_eq!(map.apply(0.0), -1.0);
        assert_relative_eq!(map.apply(2.0), 0.0);
        assert_relative_eq!(map.apply(4.0), 1.0);
        assert_relative_eq!(map.fraction(1.0), 0.25);
        assert_relative_eq!(map.fraction(9.0), 1.0);
    }

    #[test]
    fn test_degenerate_axis_maps_to_center() {
        let map = AxisMap::new((3.0, 3.0), Z_SCALE);
        assert!(map.is_degenerate());
        assert_eq!(map.apply(3.0), 0.0);
        assert_eq!(map.fraction(3.0), 0.5);
    }

    #[test]
    fn test_axis_map_spanning_most_of_f64() {
        let map = AxisMap::new((-f64::MAX, f64::MAX), 1.0);
        assert!(!map.is_degenerate());
        assert_relative_eq!(map.apply(0.0), 0.0);
        assert_relative_eq!(map.apply(f64::MAX), 1.0);
        assert_relative_eq!(map.fraction(-f64::MAX), 0.0);

        let unbounded = AxisMap::new((0.0, f64::INFINITY), 1.0);
        assert!(unbounded.is_degenerate());
        assert_eq!(unbounded.apply(1.0), 0.0);
    }

    #[test]
    fn test_corners_span_box() {
        let corners = PlotBox::corners();
        assert_eq!(corners[0], Point3::new(-1.0, -1.0, -Z_SCALE));
        assert_eq!(corners[7], Point3::new(1.0, 1.0, Z_SCALE));
        let tops = corners.iter().filter(|c| c.z > 0.0).count();
        assert_eq!(tops, 4);
    }

    #[test]
    fn test_default_camera_in_degrees() {
        let camera = Camera::from_degrees(-60.0, 30.0);
        let default = Camera::default();
        assert_relative_eq!(camera.azimuth, default.azimuth);
        assert_relative_eq!(camera.elevation, default.elevation);
    }

    #[test]
    fn test_projection_keeps_vertical_up() {
        let camera = Camera::default();
        let low = camera.project(&Point3::new(0.0, 0.0, -1.0));
        let high = camera.project(&Point3::new(0.0, 0.0, 1.0));
        assert!(high.y > low.y);
        assert_relative_eq!(high.x, low.x);
    }

    #[test]
    fn test_top_is_closer_than_bottom_from_above() {
        let camera = Camera::default();
        let top = camera.depth(&Point3::new(0.0, 0.0, 1.0));
        let bottom = camera.depth(&Point3::new(0.0, 0.0, -1.0));
        assert!(top < bottom);
    }

    #[test]
    fn test_height_color_endpoints() {
        assert_eq!(height_color(0.0), (94, 130, 181));
        assert_eq!(height_color(1.0), (224, 148, 43));
        assert_eq!(height_color(-3.0), height_color(0.0));
    }

    #[test]
    fn test_shading() {
        let flat = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(flat, Vector3::z());

        let degenerate = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(degenerate, Vector3::z());

        let lit = shade((200, 200, 200), &flat);
        assert!(lit.0 <= 200 && lit.0 > 70);
    }
}
