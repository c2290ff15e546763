use eframe::egui::{self, load::SizedTexture, RichText, ScrollArea, Ui};

use crate::data::coords::parse_coordinates;
use crate::data::filter::{
    apply, region_options, type_options, RegionFilter, SortKey, TypeFilter, ALL_REGIONS,
    ALL_TYPES,
};
use crate::data::model::HeritageRecord;
use crate::state::{AppState, ImageSlot};
use crate::ui::plot;

/// Detail keys shown for every fort, in display order.
const DETAIL_KEYS: [&str; 4] = ["Type", "Founded", "Built", "Condition"];

// ---------------------------------------------------------------------------
// Forts explorer (central panel)
// ---------------------------------------------------------------------------

pub fn forts_explorer(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Historical Forts of India");

    let report = state.records();
    let records = report.records;
    if records.is_empty() {
        ui.label("No data found.");
        return;
    }

    let regions = region_options(&records);
    let types = type_options(&records);

    ui.horizontal(|ui: &mut Ui| {
        let mut region = state.query.region.label().to_string();
        egui::ComboBox::from_label("Select State")
            .selected_text(region.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut region, ALL_REGIONS.to_string(), ALL_REGIONS);
                for r in &regions {
                    ui.selectable_value(&mut region, r.clone(), r.as_str());
                }
            });
        state.query.region = RegionFilter::from_selection(&region);

        ui.separator();

        let mut fort_type = state.query.fort_type.label().to_string();
        egui::ComboBox::from_label("Select Fort Type")
            .selected_text(fort_type.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut fort_type, ALL_TYPES.to_string(), ALL_TYPES);
                for t in &types {
                    ui.selectable_value(&mut fort_type, t.clone(), t.as_str());
                }
            });
        state.query.fort_type = TypeFilter::from_selection(&fort_type);

        ui.separator();

        egui::ComboBox::from_label("Sort by")
            .selected_text(state.query.sort.label())
            .show_ui(ui, |ui: &mut Ui| {
                for key in SortKey::ALL {
                    ui.selectable_value(&mut state.query.sort, key, key.label());
                }
            });
    });

    let visible = apply(&records, &state.query);
    ui.label(format!("Showing {} of {} forts", visible.len(), records.len()));
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for record in visible {
                fort_entry(ui, state, record);
            }
        });
}

fn fort_entry(ui: &mut Ui, state: &mut AppState, record: &HeritageRecord) {
    let id = format!("fort_{}", record.id);
    egui::CollapsingHeader::new(RichText::new(&record.name).strong())
        .id_salt(&id)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols: &mut [Ui]| {
                fort_image(&mut cols[0], state, record);
                fort_details(&mut cols[1], &id, record);
            });
        });
}

fn fort_image(ui: &mut Ui, state: &mut AppState, record: &HeritageRecord) {
    let Some(url) = record.images.first() else {
        ui.label("No image");
        return;
    };
    match state.image(ui.ctx(), url) {
        ImageSlot::Ready(texture) => {
            ui.add(
                egui::Image::new(SizedTexture::from_handle(texture))
                    .max_width(ui.available_width()),
            );
        }
        ImageSlot::Unavailable => {
            ui.label("Image not available");
        }
    }
}

fn fort_details(ui: &mut Ui, id: &str, record: &HeritageRecord) {
    detail_row(ui, "Location", &record.locations.join("; "));
    detail_row(ui, "Region", &record.region);
    for key in DETAIL_KEYS {
        detail_row(ui, key, record.detail(key).unwrap_or("N/A"));
    }
    if let Some(edited) = &record.last_edited {
        detail_row(ui, "Last edited", edited);
    }
    if let Some(coords) = record.coordinates() {
        detail_row(ui, "Coordinates", coords);
        // Unparsable coordinates simply get no map.
        if let Ok(pos) = parse_coordinates(coords) {
            plot::location_map(ui, id, &record.name, pos);
        }
    }
}

fn detail_row(ui: &mut Ui, label: &str, value: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong(format!("{label}:"));
        ui.label(value);
    });
}
