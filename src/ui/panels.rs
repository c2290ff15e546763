use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    for view in View::ALL {
        ui.radio_value(&mut state.view, view, view.title());
    }

    ui.separator();
    ui.small(format!("Data file: {}", state.store.path().display()));
    if !state.warehouse_configured() {
        ui.small("Snowflake: not configured");
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("🏛 Indian Cultural Heritage Explorer").strong());

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
        .set_title("Open fort records")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(path);
    }
}
