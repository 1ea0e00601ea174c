use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

pub const TITLE: &str = "US COVID-19 Hospitalization Dashboard";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HospDashApp {
    pub state: AppState,
}

impl HospDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HospDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu + source ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: data controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: raw data ----
        egui::TopBottomPanel::bottom("raw_data")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| {
                table::raw_data_table(ui, &self.state);
            });

        // ---- Central panel: trend + map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.label(
                "Monthly hospitalization rates from CDC COVID-NET Surveillance. \
                 Rates represent laboratory-confirmed COVID-19 hospitalizations per \
                 100,000 residents in participating surveillance areas.",
            );
            ui.separator();
            ui.columns(2, |cols| {
                plot::trend_plot(&mut cols[0], &self.state);
                map::state_map(&mut cols[1], &self.state);
            });
        });
    }
}
