use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, View};
use crate::ui::{explorer, insights, panels, tourism};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HeritageExplorerApp {
    pub state: AppState,
}

impl HeritageExplorerApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for HeritageExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("nav_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Explorer => explorer::forts_explorer(ui, &mut self.state),
            View::Insights => insights::cultural_insights(ui, &mut self.state),
            View::Tourism => tourism::tourism_data(ui, &mut self.state),
        });
    }
}
