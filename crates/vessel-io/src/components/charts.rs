//! Static benchmark charts drawn as inline SVG.

use dioxus::prelude::*;
use vessel_pipeline::showcase::{
    self, ACCURACY, ACCURACY_AXIS_MAX, ACCURACY_AXIS_MIN, MethodAccuracy, Point, RADAR_AXES,
    RADAR_SERIES, RadarSeries, VESSEL_SIZES, VesselShare, palette,
};

const PLOT_W: f64 = 320.0;
const PLOT_H: f64 = 200.0;
const RADAR_SIZE: f64 = 260.0;
const DONUT_SIZE: f64 = 200.0;
const GRID_COLOR: &str = "rgba(0, 113, 227, 0.2)";
const AXIS_TEXT: &str = "#666";

/// The three showcase charts in a responsive grid.
#[component]
pub fn Charts() -> Element {
    rsx! {
        div { class: "grid grid-cols-1 lg:grid-cols-3 gap-6",
            {chart_card("Accuracy by method", accuracy_chart())}
            {chart_card("Vessel size distribution", vessel_size_chart())}
            {chart_card("Performance metrics", radar_chart())}
        }
    }
}

fn chart_card(title: &str, body: Element) -> Element {
    let title = title.to_string();
    rsx! {
        section { class: "p-4 rounded-xl bg-[var(--surface)] border border-[var(--border)]",
            h3 { class: "text-base font-semibold text-[var(--text-heading)] mb-3", "{title}" }
            {body}
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn accuracy_chart() -> Element {
    let view_box = format!("-36 -20 {} {}", PLOT_W + 40.0, PLOT_H + 60.0);
    let slot = PLOT_W / ACCURACY.len() as f64;
    let ticks = [ACCURACY_AXIS_MIN, 0.85, 0.9, 0.95, ACCURACY_AXIS_MAX];

    rsx! {
        svg {
            xmlns: "http://www.w3.org/2000/svg",
            view_box: "{view_box}",
            class: "w-full h-auto",
            role: "img",
            "aria-label": "Accuracy by method",

            defs {
                linearGradient { id: "bar-fill", x1: "0", y1: "0", x2: "0", y2: "1",
                    stop { offset: "0", stop_color: palette::PRIMARY }
                    stop { offset: "1", stop_color: palette::SECONDARY }
                }
            }

            for tick in ticks {
                {render_tick(tick)}
            }

            for (i, entry) in ACCURACY.iter().enumerate() {
                {render_bar(i, entry, slot)}
            }
        }
    }
}

fn render_tick(tick: f64) -> Element {
    let y = PLOT_H * (1.0 - showcase::bar_fraction(tick));
    let label_y = y + 4.0;
    let label = format!("{:.0}%", tick * 100.0);
    rsx! {
        line { x1: "0", x2: "{PLOT_W}", y1: "{y}", y2: "{y}",
            stroke: "#f0f0f0", stroke_dasharray: "4 4" }
        text { x: "-6", y: "{label_y}", text_anchor: "end",
            font_size: "11", fill: AXIS_TEXT, "{label}" }
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_bar(index: usize, entry: &MethodAccuracy, slot: f64) -> Element {
    let bar_w = slot * 0.4;
    let h = PLOT_H * showcase::bar_fraction(entry.accuracy);
    let x = (index as f64).mul_add(slot, (slot - bar_w) / 2.0);
    let y = PLOT_H - h;
    let mid = x + bar_w / 2.0;
    let value_y = y - 6.0;
    let name_y = PLOT_H + 16.0;
    let label = showcase::percent_label(entry.accuracy);
    let method = entry.method;

    rsx! {
        rect { x: "{x}", y: "{y}", width: "{bar_w}", height: "{h}",
            rx: "6", fill: "url(#bar-fill)" }
        text { x: "{mid}", y: "{value_y}", text_anchor: "middle",
            font_size: "12", font_weight: "bold", fill: palette::PRIMARY, "{label}" }
        text { x: "{mid}", y: "{name_y}", text_anchor: "middle",
            font_size: "10", fill: AXIS_TEXT, "{method}" }
    }
}

fn vessel_size_chart() -> Element {
    let view_box = format!("0 0 {DONUT_SIZE} {DONUT_SIZE}");
    let center = Point {
        x: DONUT_SIZE / 2.0,
        y: DONUT_SIZE / 2.0,
    };
    let outer = DONUT_SIZE * 0.35;
    let inner = DONUT_SIZE * 0.225;
    let shares: Vec<u8> = VESSEL_SIZES.iter().map(|v| v.share).collect();
    let paths: Vec<(VesselShare, String)> = VESSEL_SIZES
        .iter()
        .zip(showcase::donut_spans(&shares))
        .map(|(entry, (start, end))| {
            (
                *entry,
                showcase::ring_segment_path(center, inner, outer, start, end),
            )
        })
        .collect();

    rsx! {
        svg {
            xmlns: "http://www.w3.org/2000/svg",
            view_box: "{view_box}",
            class: "w-full h-auto max-h-52",
            role: "img",
            "aria-label": "Vessel size distribution",

            for (entry, d) in paths {
                path {
                    d: "{d}",
                    fill: entry.color,
                    stroke: "#fff",
                    stroke_width: "3",
                    title { "{entry.size}: {entry.share}%" }
                }
            }
        }
        ul { class: "flex flex-col gap-1 mt-2 text-sm",
            for entry in VESSEL_SIZES {
                {render_share_legend(entry)}
            }
        }
    }
}

fn render_share_legend(entry: VesselShare) -> Element {
    let swatch = format!("background: {}", entry.color);
    let figures = format!("{}% \u{b7} {:.1}% accuracy", entry.share, entry.accuracy);
    rsx! {
        li { class: "flex items-center gap-2 text-[var(--text-secondary)]",
            span { class: "inline-block w-3 h-3 rounded-full", style: "{swatch}" }
            span { class: "flex-1", "{entry.size}" }
            span { class: "tabular-nums", "{figures}" }
        }
    }
}

fn radar_chart() -> Element {
    let view_box = format!("0 0 {RADAR_SIZE} {RADAR_SIZE}");
    let center = Point {
        x: RADAR_SIZE / 2.0,
        y: RADAR_SIZE / 2.0,
    };
    let radius = RADAR_SIZE * 0.32;
    let rings = [0.25, 0.5, 0.75, 1.0]
        .map(|r| showcase::svg_points(&showcase::radar_points(&[r; 6], center, radius)));

    rsx! {
        svg {
            xmlns: "http://www.w3.org/2000/svg",
            view_box: "{view_box}",
            class: "w-full h-auto",
            role: "img",
            "aria-label": "Performance metrics",

            for ring in rings {
                polygon { points: "{ring}", fill: "none", stroke: GRID_COLOR }
            }

            for (i, axis) in RADAR_AXES.iter().enumerate() {
                {render_axis(i, axis, center, radius)}
            }

            // Draw the comparison series first so ours sits on top.
            for series in RADAR_SERIES.iter().rev() {
                {render_series(series, center, radius)}
            }
        }
        div { class: "flex justify-center gap-4 mt-2 text-sm text-[var(--text-secondary)]",
            for series in RADAR_SERIES {
                {render_series_legend(&series)}
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_axis(index: usize, name: &str, center: Point, radius: f64) -> Element {
    let turn = index as f64 / RADAR_AXES.len() as f64;
    let end = Point::polar(center, radius, turn);
    let label = Point::polar(center, radius + 18.0, turn);
    let label_y = label.y + 4.0;
    let name = name.to_string();
    rsx! {
        line { x1: "{center.x}", y1: "{center.y}", x2: "{end.x}", y2: "{end.y}",
            stroke: GRID_COLOR }
        text { x: "{label.x}", y: "{label_y}", text_anchor: "middle",
            font_size: "10", fill: AXIS_TEXT, "{name}" }
    }
}

fn render_series(series: &RadarSeries, center: Point, radius: f64) -> Element {
    let points = showcase::svg_points(&showcase::radar_points(&series.values, center, radius));
    rsx! {
        polygon {
            points: "{points}",
            fill: series.color,
            fill_opacity: "0.25",
            stroke: series.color,
            stroke_width: "2",
        }
    }
}

fn render_series_legend(series: &RadarSeries) -> Element {
    let swatch = format!("background: {}", series.color);
    rsx! {
        span { class: "flex items-center gap-1",
            span { class: "inline-block w-3 h-3 rounded-full", style: "{swatch}" }
            "{series.name}"
        }
    }
}
