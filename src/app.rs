use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, views};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FailsightApp {
    pub state: AppState,
}

impl FailsightApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for FailsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: inputs for the active tab ----
        egui::SidePanel::left("input_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::Prediction => views::prediction_view(ui, &self.state),
            Tab::Exploration => views::exploration_view(ui, &self.state),
            Tab::About => views::about_view(ui),
        });
    }
}
