use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::callbacks::OutputId;
use crate::color::ColorMap;
use crate::figure::{Figure, FigureData, PieSlice, ScatterSeries};

const PLOT_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Graph component
// ---------------------------------------------------------------------------

/// Render the figure currently held for `output`.
pub fn graph(ui: &mut Ui, output: OutputId, figure: Option<&Figure>) {
    let Some(figure) = figure else {
        ui.label(format!("{output}: no figure yet"));
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(figure.title.as_str());
        let empty = match &figure.data {
            FigureData::Pie { .. } => figure.slices().is_empty(),
            FigureData::Scatter { .. } => figure.series().is_empty(),
        };
        if empty {
            ui.label(RichText::new("No launches match the current selection").italics());
        } else if let FigureData::Scatter { .. } = figure.data {
            ui.label(format!("{} launches", figure.point_count()));
        }
    });

    match &figure.data {
        FigureData::Pie { slices } => pie_chart(ui, output, slices),
        FigureData::Scatter {
            x_label,
            y_label,
            series,
        } => scatter_chart(ui, output, x_label, y_label, series),
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Slices start at 12 o'clock and run clockwise. An empty or all-zero pie
/// renders an empty plot.
fn pie_chart(ui: &mut Ui, output: OutputId, slices: &[PieSlice]) {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let colors = ColorMap::new(slices.iter().map(|s| s.label.as_str()));

    Plot::new(output.as_str())
        .height(PLOT_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.1)
        .include_y(1.1)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            if total <= 0.0 {
                return;
            }
            let mut start = FRAC_PI_2;
            for slice in slices {
                if slice.value <= 0.0 {
                    continue;
                }
                let fraction = slice.value / total;
                let sweep = fraction * TAU;
                let color = colors.color_for(&slice.label);

                for wedge in wedges(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(wedge))
                            .name(&slice.label)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = start - sweep / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.1}%", fraction * 100.0)).strong(),
                    )
                    .color(Color32::WHITE),
                );
                start -= sweep;
            }
        });
}

/// Split a clockwise sector of the unit circle into polygons of at most 45°
/// so every piece stays convex.
fn wedges(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / FRAC_PI_4 - 1e-9).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f64;
    (0..pieces)
        .map(|p| {
            let from = start - piece_sweep * p as f64;
            let steps = 12;
            let mut pts = vec![[0.0, 0.0]];
            for k in 0..=steps {
                let angle = from - piece_sweep * k as f64 / steps as f64;
                pts.push([angle.cos(), angle.sin()]);
            }
            pts
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// One point cloud per series; hovering a point shows its launch site.
fn scatter_chart(
    ui: &mut Ui,
    output: OutputId,
    x_label: &str,
    y_label: &str,
    series: &[ScatterSeries],
) {
    let colors = ColorMap::new(series.iter().map(|s| s.name.as_str()));

    // (series, x, y, site) for the hover lookup.
    let hover_points: Vec<(String, f64, f64, String)> = series
        .iter()
        .flat_map(|s| {
            s.points
                .iter()
                .map(move |p| (s.name.clone(), p.x, p.y, p.launch_site.clone()))
        })
        .collect();
    let x_name = x_label.to_string();
    let y_name = y_label.to_string();

    Plot::new(output.as_str())
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_x(0.0)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| {
            hover_text(&hover_points, &x_name, &y_name, name, value)
        })
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&s.name)
                        .color(colors.color_for(&s.name))
                        .radius(4.0)
                        .filled(true),
                );
            }
        });
}

fn hover_text(
    points: &[(String, f64, f64, String)],
    x_name: &str,
    y_name: &str,
    series: &str,
    value: &PlotPoint,
) -> String {
    if series.is_empty() {
        return String::new();
    }
    let distance = |p: &(String, f64, f64, String)| (p.1 - value.x).abs() + (p.2 - value.y).abs();
    let site = points
        .iter()
        .filter(|p| p.0 == series)
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
        .map(|p| p.3.as_str())
        .unwrap_or("?");
    format!(
        "{series}\n{x_name}: {:.0}\n{y_name}: {:.0}\nLaunch Site: {site}",
        value.x, value.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedges_cover_the_sweep_in_convex_pieces() {
        let pieces = wedges(FRAC_PI_2, TAU * 0.75);
        assert_eq!(pieces.len(), 6);
        for piece in &pieces {
            assert_eq!(piece[0], [0.0, 0.0]);
        }
        let first = pieces[0][1];
        assert!((first[0] - 0.0).abs() < 1e-9 && (first[1] - 1.0).abs() < 1e-9);
        let last = *pieces.last().unwrap().last().unwrap();
        // 270° clockwise from 12 o'clock ends at 9 o'clock.
        assert!((last[0] + 1.0).abs() < 1e-9 && last[1].abs() < 1e-9);
    }

    #[test]
    fn hover_names_the_nearest_point_site() {
        let points = vec![
            ("FT".to_string(), 5300.0, 1.0, "KSC LC-39A".to_string()),
            ("FT".to_string(), 2500.0, 0.0, "CCAFS LC-40".to_string()),
            ("v1.1".to_string(), 5300.0, 1.0, "VAFB SLC-4E".to_string()),
        ];
        let text = hover_text(&points, "Payload Mass (kg)", "class", "FT", &PlotPoint::new(5300.0, 1.0));
        assert!(text.contains("Launch Site: KSC LC-39A"));
        assert!(text.contains("Payload Mass (kg): 5300"));
        assert!(hover_text(&points, "x", "y", "", &PlotPoint::new(0.0, 0.0)).is_empty());
    }
}
