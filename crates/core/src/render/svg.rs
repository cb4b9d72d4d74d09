//! SVG document assembly for projected surfaces
//!
//! Triangles arrive already projected, shaded and sorted back-to-front.
//! This module fits them onto the canvas, then draws the title and the three
//! box axes with tick marks and labels.

use super::camera::{AxisMap, Camera, PlotBox, Rgb, Z_SCALE};
use super::PlotStyle;
use nalgebra::{Point2, Point3, Vector2};

/// Canvas margin around the projected box, in pixels
const MARGIN: f64 = 70.0;
/// Extra space reserved above the box for the title
const TITLE_SPACE: f64 = 40.0;
const AXIS_COLOR: &str = "#555555";
const TICK_FONT_SIZE: u32 = 11;
const LABEL_FONT_SIZE: u32 = 15;
const TITLE_FONT_SIZE: u32 = 20;
/// Target tick count per axis
const TICKS_PER_AXIS: usize = 5;

/// A projected, shaded surface triangle
#[derive(Debug, Clone, Copy)]
pub(crate) struct Triangle {
    pub projected: [Point2<f64>; 3],
    pub depth: f64,
    pub color: Rgb,
}

/// One box edge drawn as a labelled axis
struct AxisEdge {
    start: Point3<f64>,
    end: Point3<f64>,
    values: AxisMap,
    /// True when the edge runs from the high end of the value range
    flipped: bool,
    label: Option<&'static str>,
}

/// Maps projected coordinates onto canvas pixels
struct Canvas {
    scale: f64,
    center: Point2<f64>,
    projected_center: Point2<f64>,
}

impl Canvas {
    /// Fit the projected plot box into the drawable area
    fn fit(camera: &Camera, style: &PlotStyle) -> Self {
        let mut lo = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut hi = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for corner in &PlotBox::corners() {
            let p = camera.project(corner);
            lo = Point2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point2::new(hi.x.max(p.x), hi.y.max(p.y));
        }

        let draw_w = (f64::from(style.width) - 2.0 * MARGIN).max(1.0);
        let draw_h = (f64::from(style.height) - 2.0 * MARGIN - TITLE_SPACE).max(1.0);
        let span_x = (hi.x - lo.x).max(f64::EPSILON);
        let span_y = (hi.y - lo.y).max(f64::EPSILON);

        Self {
            scale: (draw_w / span_x).min(draw_h / span_y),
            center: Point2::new(
                MARGIN + draw_w / 2.0,
                MARGIN + TITLE_SPACE + draw_h / 2.0,
            ),
            projected_center: nalgebra::center(&lo, &hi),
        }
    }

    fn to_svg(&self, p: &Point2<f64>) -> Point2<f64> {
        Point2::new(
            self.center.x + (p.x - self.projected_center.x) * self.scale,
            // SVG y grows downwards
            self.center.y - (p.y - self.projected_center.y) * self.scale,
        )
    }
}

/// Round step close to `span / target`, from the 1-2-5 series
pub(crate) fn nice_step(span: f64, target: usize) -> f64 {
    if !(span.is_finite() && span > 0.0) || target == 0 {
        return 0.0;
    }
    let raw = span / target as f64;
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick label with just enough decimals for `step`
pub(crate) fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    let text = format!("{value:.decimals$}");
    // "-0" and "-0.00" read badly
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Tick values inside `range`
fn ticks(range: (f64, f64)) -> (Vec<f64>, f64) {
    let (lo, hi) = range;
    let step = nice_step(hi - lo, TICKS_PER_AXIS);
    if step <= 0.0 {
        return (vec![lo], 0.0);
    }
    let mut values = Vec::new();
    let mut tick = (lo / step).ceil() * step;
    while tick <= hi + step * 0.01 {
        values.push(tick);
        tick += step;
    }
    (values, step)
}

/// Render the complete SVG document
pub(crate) fn document(
    title: &str,
    triangles: &[Triangle],
    outline: &[Point2<f64>],
    plot_box: &PlotBox,
    style: &PlotStyle,
) -> String {
    let camera = &style.camera;
    let canvas = Canvas::fit(camera, style);
    let mut svg = String::with_capacity(triangles.len() * 110 + 4096);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = style.width,
        h = style.height
    ));
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        style.width, style.height
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{}\" font-family=\"sans-serif\" text-anchor=\"middle\">{}</text>\n",
        f64::from(style.width) / 2.0,
        MARGIN / 2.0 + f64::from(TITLE_FONT_SIZE) / 2.0,
        TITLE_FONT_SIZE,
        title
    ));

    let stroke = if style.show_mesh {
        "stroke=\"#00000030\" stroke-width=\"0.5\""
    } else {
        "stroke=\"none\""
    };
    for tri in triangles {
        let [p0, p1, p2] = tri.projected.map(|p| canvas.to_svg(&p));
        let (red, green, blue) = tri.color;
        svg.push_str(&format!(
            "<polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" fill=\"rgb({},{},{})\" {}/>\n",
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, red, green, blue, stroke
        ));
    }

    if outline.len() > 1 {
        let points: Vec<String> = outline
            .iter()
            .map(|p| {
                let s = canvas.to_svg(p);
                format!("{:.1},{:.1}", s.x, s.y)
            })
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"rgb(94,130,181)\" stroke-width=\"2\"/>\n",
            points.join(" ")
        ));
    } else if let Some(p) = outline.first() {
        let s = canvas.to_svg(p);
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"rgb(94,130,181)\"/>\n",
            s.x, s.y
        ));
    }

    for edge in axis_edges(camera, plot_box) {
        draw_axis(&mut svg, &edge, camera, &canvas);
    }

    svg.push_str("</svg>\n");
    svg
}

/// The three box edges leaving the bottom corner closest to the viewer
fn axis_edges(camera: &Camera, plot_box: &PlotBox) -> [AxisEdge; 3] {
    let origin = PlotBox::corners()
        .into_iter()
        .filter(|c| c.z < 0.0)
        .min_by(|a, b| camera.depth(a).total_cmp(&camera.depth(b)))
        .unwrap_or_else(|| Point3::new(-1.0, -1.0, -Z_SCALE));

    let x_end = Point3::new(-origin.x, origin.y, origin.z);
    let t_end = Point3::new(origin.x, -origin.y, origin.z);
    let z_end = Point3::new(origin.x, origin.y, Z_SCALE);

    [
        AxisEdge {
            start: origin,
            end: x_end,
            values: plot_box.x,
            flipped: origin.x > x_end.x,
            label: Some("x"),
        },
        AxisEdge {
            start: origin,
            end: t_end,
            values: plot_box.t,
            flipped: origin.y > t_end.y,
            label: Some("t"),
        },
        AxisEdge {
            start: origin,
            end: z_end,
            values: plot_box.z,
            flipped: false,
            label: None,
        },
    ]
}

fn draw_axis(svg: &mut String, edge: &AxisEdge, camera: &Camera, canvas: &Canvas) {
    let s0 = canvas.to_svg(&camera.project(&edge.start));
    let s1 = canvas.to_svg(&camera.project(&edge.end));
    svg.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
        s0.x, s0.y, s1.x, s1.y, AXIS_COLOR
    ));

    let along = s1 - s0;
    let len = along.norm();
    if len < 1.0 {
        return;
    }
    // Ticks and labels point away from the middle of the box
    let box_center = canvas.to_svg(&camera.project(&Point3::origin()));
    let mid = nalgebra::center(&s0, &s1);
    let mut perp = Vector2::new(-along.y, along.x) / len;
    if perp.dot(&(mid - box_center)) < 0.0 {
        perp = -perp;
    }

    let (values, step) = ticks(edge.values.range);
    for value in values {
        let raw = edge.values.fraction(value);
        let frac = if edge.flipped { 1.0 - raw } else { raw };
        let at = s0 + along * frac;
        let tip = at + perp * 5.0;
        let text = at + perp * 16.0;
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"0.75\"/>\n",
            at.x, at.y, tip.x, tip.y, AXIS_COLOR
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{}\" font-family=\"sans-serif\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            text.x,
            text.y,
            TICK_FONT_SIZE,
            AXIS_COLOR,
            format_tick(value, step)
        ));
    }

    if let Some(label) = edge.label {
        let at = mid + perp * 38.0;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{}\" font-family=\"sans-serif\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            at.x, at.y, LABEL_FONT_SIZE, label
        ));
    }
}
