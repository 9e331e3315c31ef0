//! Static benchmark figures for the showcase charts, plus the geometry
//! needed to draw them as inline SVG.
//!
//! Nothing here reacts to uploads. The numbers are fixed marketing data.

use std::f64::consts::TAU;
use std::fmt::Write as _;

/// Chart palette.
pub mod palette {
    /// Main series color.
    pub const PRIMARY: &str = "#0071e3";
    /// Second series / gradient end.
    pub const SECONDARY: &str = "#34aadc";
    /// Third series.
    pub const ACCENT: &str = "#5856d6";
    /// Comparison series.
    pub const GRAY: &str = "#8e8e93";
}

/// One bar of the accuracy chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodAccuracy {
    /// Method name on the x axis.
    pub method: &'static str,
    /// Accuracy in `[0, 1]`.
    pub accuracy: f64,
}

/// Accuracy by method, in display order.
pub const ACCURACY: [MethodAccuracy; 4] = [
    MethodAccuracy {
        method: "Classic U-Net",
        accuracy: 0.85,
    },
    MethodAccuracy {
        method: "ResNet+U-Net",
        accuracy: 0.89,
    },
    MethodAccuracy {
        method: "Transformer+U-Net",
        accuracy: 0.92,
    },
    MethodAccuracy {
        method: "Ours",
        accuracy: 0.96,
    },
];

/// Lower bound of the accuracy chart's value axis.
pub const ACCURACY_AXIS_MIN: f64 = 0.8;
/// Upper bound of the accuracy chart's value axis.
pub const ACCURACY_AXIS_MAX: f64 = 1.0;

/// One slice of the vessel-size donut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselShare {
    /// Size class.
    pub size: &'static str,
    /// Share of all vessels, in percent.
    pub share: u8,
    /// Segmentation accuracy on this class, in percent.
    pub accuracy: f64,
    /// Slice color.
    pub color: &'static str,
}

/// Vessel-size distribution.
pub const VESSEL_SIZES: [VesselShare; 3] = [
    VesselShare {
        size: "Large vessels",
        share: 35,
        accuracy: 98.5,
        color: palette::PRIMARY,
    },
    VesselShare {
        size: "Medium vessels",
        share: 25,
        accuracy: 96.2,
        color: palette::SECONDARY,
    },
    VesselShare {
        size: "Small vessels",
        share: 40,
        accuracy: 94.8,
        color: palette::ACCENT,
    },
];

/// Axes of the performance radar, clockwise from the top.
pub const RADAR_AXES: [&str; 6] = [
    "DSC",
    "Hausdorff distance",
    "Sensitivity",
    "Specificity",
    "Accuracy",
    "Speed",
];

/// One polygon on the radar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarSeries {
    /// Legend entry.
    pub name: &'static str,
    /// One value in `[0, 1]` per entry of [`RADAR_AXES`].
    pub values: [f64; 6],
    /// Stroke and fill color.
    pub color: &'static str,
}

/// Performance metrics for our method against the field.
pub const RADAR_SERIES: [RadarSeries; 2] = [
    RadarSeries {
        name: "Ours",
        values: [0.96, 0.93, 0.95, 0.94, 0.96, 0.88],
        color: palette::PRIMARY,
    },
    RadarSeries {
        name: "Other methods",
        values: [0.90, 0.85, 0.88, 0.90, 0.92, 0.85],
        color: palette::GRAY,
    },
];

/// Format a `[0, 1]` fraction as a percentage with one decimal, e.g.
/// `0.85` -> `"85.0%"`.
#[must_use]
pub fn percent_label(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Height of a bar as a fraction of the plot height, given the axis
/// range `[ACCURACY_AXIS_MIN, ACCURACY_AXIS_MAX]`. Clamped to `[0, 1]`.
#[must_use]
pub fn bar_fraction(accuracy: f64) -> f64 {
    ((accuracy - ACCURACY_AXIS_MIN) / (ACCURACY_AXIS_MAX - ACCURACY_AXIS_MIN)).clamp(0.0, 1.0)
}

/// A point in SVG user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// The point `radius` away from `center` at `turn` (fraction of a full
    /// circle, clockwise from 12 o'clock).
    #[must_use]
    pub fn polar(center: Self, radius: f64, turn: f64) -> Self {
        let angle = turn * TAU;
        Self {
            x: radius.mul_add(angle.sin(), center.x),
            y: (-radius).mul_add(angle.cos(), center.y),
        }
    }
}

/// Vertices of a radar polygon. Axis `i` of `n` sits at turn `i / n`,
/// and each value scales the distance from the center.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn radar_points(values: &[f64], center: Point, radius: f64) -> Vec<Point> {
    let n = values.len() as f64;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Point::polar(center, radius * v.clamp(0.0, 1.0), i as f64 / n))
        .collect()
}

/// Render points as an SVG `points` attribute: `"x,y x,y ..."`.
#[must_use]
pub fn svg_points(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:.2},{:.2}", p.x, p.y);
    }
    out
}

/// Start and end of each slice as turns, in input order. Shares are
/// normalized by their sum, so the slices always close the circle.
#[must_use]
pub fn donut_spans(shares: &[u8]) -> Vec<(f64, f64)> {
    let total: f64 = shares.iter().map(|s| f64::from(*s)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    shares
        .iter()
        .map(|s| {
            let end = start + f64::from(*s) / total;
            let span = (start, end);
            start = end;
            span
        })
        .collect()
}

/// SVG path for a ring segment between `inner` and `outer` radii from
/// turn `start` to turn `end`.
#[must_use]
pub fn ring_segment_path(center: Point, inner: f64, outer: f64, start: f64, end: f64) -> String {
    let large_arc = u8::from(end - start > 0.5);
    let o0 = Point::polar(center, outer, start);
    let o1 = Point::polar(center, outer, end);
    let i1 = Point::polar(center, inner, end);
    let i0 = Point::polar(center, inner, start);
    format!(
        "M {:.2} {:.2} A {outer} {outer} 0 {large_arc} 1 {:.2} {:.2} \
         L {:.2} {:.2} A {inner} {inner} 0 {large_arc} 0 {:.2} {:.2} Z",
        o0.x, o0.y, o1.x, o1.y, i1.x, i1.y, i0.x, i0.y
    )
}
