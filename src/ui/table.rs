use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::COL_DATE;
use crate::state::AppState;

use super::plot::NO_DATA;

/// Filtered rows, newest month first, every source column.
pub fn raw_data_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Raw Data");

    let rows = &state.view.table;
    if rows.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    let mut columns = vec![COL_DATE.to_string()];
    if let Some(ds) = &state.dataset {
        columns.extend(ds.columns.iter().cloned());
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(70.0).clip(true), columns.len())
        .header(20.0, |mut header| {
            for name in &columns {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = &rows[row.index()];
                for name in &columns {
                    row.col(|ui| {
                        ui.label(record.cell(name));
                    });
                }
            });
        });
}
