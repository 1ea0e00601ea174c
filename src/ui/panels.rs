use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::DateRange;
use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – data controls
// ---------------------------------------------------------------------------

/// Render the sidebar: refresh, date range, the four multi-selects, clear.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Controls");
    ui.separator();

    let refresh = ui
        .add_enabled(state.can_refresh(), egui::Button::new("Fetch updated data"))
        .on_disabled_hover_text("Already refreshed in this session");
    if refresh.clicked() {
        state.refresh();
    }
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    date_range_controls(ui, state);
    ui.separator();

    let mut toggles: Vec<(Dimension, String)> = Vec::new();
    let mut clear_dimension: Option<Dimension> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height((ui.available_height() - 40.0).max(120.0))
        .show(ui, |ui: &mut Ui| {
            for dimension in Dimension::ALL {
                let Some(options) = state.options.get(&dimension) else {
                    continue;
                };
                let selected = state.selection.get(&dimension);
                let n_selected = selected.map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("{}  (all)", dimension.label())
                } else {
                    format!("{}  ({n_selected}/{})", dimension.label(), options.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dimension.column())
                    .default_open(dimension == Dimension::State)
                    .show(ui, |ui: &mut Ui| {
                        if options.is_empty() {
                            ui.label(RichText::new("Column not in data").italics());
                            return;
                        }
                        if n_selected > 0 && ui.small_button("Clear").clicked() {
                            clear_dimension = Some(dimension);
                        }
                        for value in options {
                            let mut checked = selected.is_some_and(|s| s.contains(value));
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                toggles.push((dimension, value.clone()));
                            }
                        }
                    });
            }
        });

    ui.separator();
    if ui.button("Clear all filters").clicked() {
        state.clear_filters();
        return;
    }

    if let Some(dimension) = clear_dimension {
        if let Some(selected) = state.selection.get_mut(&dimension) {
            selected.clear();
        }
        state.recompute();
    }
    for (dimension, value) in toggles {
        state.toggle_value(dimension, &value);
    }
}

/// Two month sliders bounded by the data's first and last month.
fn date_range_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Date range:");
    let (Some(range), Some(last)) = (state.date_range, state.months.len().checked_sub(1)) else {
        return;
    };

    let months = &state.months;
    let mut start = months.iter().position(|m| *m >= range.start).unwrap_or(0);
    let mut end = months.iter().rposition(|m| *m <= range.end).unwrap_or(last);

    let label = |v: f64| {
        months
            .get(v.round() as usize)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    };

    let start_changed = ui
        .add(egui::Slider::new(&mut start, 0..=last).text("from").custom_formatter(|v, _| label(v)))
        .changed();
    let end_changed = ui
        .add(egui::Slider::new(&mut end, 0..=last).text("to").custom_formatter(|v, _| label(v)))
        .changed();

    if !(start_changed || end_changed) {
        return;
    }
    if start > end {
        if start_changed {
            end = start;
        } else {
            start = end;
        }
    }
    let picked = (months.get(start).copied(), months.get(end).copied());
    if let (Some(from), Some(to)) = picked {
        state.set_date_range(DateRange::new(from, to));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open snapshot…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} match filters",
                ds.len(),
                state.view.table.len()
            ));
        }

        if let Some(source) = &state.source {
            ui.separator();
            let label = ui.label(format!("Source: {source}"));
            if let Some(reason) = source.fallback_reason() {
                label.on_hover_text(format!("Live fetch failed: {reason}"));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open hospitalization snapshot")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_snapshot(&path);
    }
}
