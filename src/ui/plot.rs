use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::coords::LatLon;
use crate::stats::x_to_date;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Location map (explorer entries)
// ---------------------------------------------------------------------------

/// Mark a fort's position on a lon/lat plot framed around India.
pub fn location_map(ui: &mut Ui, id: &str, name: &str, pos: LatLon) {
    Plot::new(format!("map_{id}"))
        .height(180.0)
        .data_aspect(1.0)
        .include_x(68.0)
        .include_x(98.0)
        .include_y(6.0)
        .include_y(37.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(vec![[pos.lon, pos.lat]])
                    .name(name)
                    .radius(5.0)
                    .color(Color32::RED),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Labelled bars at x = 0, 1, 2, …
pub fn bar_chart(ui: &mut Ui, id: &str, title: &str, bars: &[(String, f64)]) {
    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();
    let chart = BarChart::new(
        bars.iter()
            .enumerate()
            .map(|(i, (label, height))| Bar::new(i as f64, *height).name(label).width(0.7))
            .collect(),
    )
    .name(title)
    .color(Color32::from_rgb(214, 125, 62));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(title)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Time series (tourism view)
// ---------------------------------------------------------------------------

/// One line per series; x values are days since the Unix epoch.
pub fn time_series(
    ui: &mut Ui,
    id: &str,
    series: &BTreeMap<String, Vec<[f64; 2]>>,
    colors: &ColorMap,
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Visitors")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|name, value| {
            let day = x_to_date(value.x)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            if name.is_empty() {
                format!("{day}\n{:.0}", value.y)
            } else {
                format!("{name}\n{day}\n{:.0}", value.y)
            }
        })
        .show(ui, |plot_ui| {
            for (name, points) in series {
                let color = colors.color_for(name);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(name)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(points.clone())
                        .name(name)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}
