use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::SeriesColors;
use crate::data::presentation::RATE_LABEL;
use crate::state::AppState;

pub const NO_DATA: &str = "No data available for the selected filters.";

/// Plot x coordinate for a month.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn x_to_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Trend over time
// ---------------------------------------------------------------------------

/// One line per state, mean rate per month.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    ui.heading("Trend Over Time");

    if state.view.series.is_empty() {
        ui.label(NO_DATA);
        return;
    }
    ui.label(RichText::new(state.view.series_source.caption()).weak());

    let mut lines: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for point in &state.view.series {
        lines
            .entry(point.state.as_str())
            .or_default()
            .push([date_to_x(point.date), point.rate]);
    }

    let names: BTreeSet<String> = lines.keys().map(|s| s.to_string()).collect();
    let colors = SeriesColors::new(&names);

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(RATE_LABEL)
        .x_axis_formatter(|mark, _range| x_to_label(mark.value))
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!("{name}\n{}: {:.2}", x_to_label(value.x), value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (name, points) in lines {
                let points: PlotPoints = points.into_iter().collect();
                let line = Line::new(points)
                    .name(name)
                    .color(colors.color_for(name))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}
