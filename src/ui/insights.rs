use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::stats::{category_counts, region_counts, type_counts};
use crate::ui::{plot, table};
use crate::warehouse::FetchOutcome;

/// Columns the insights chart expects in the fetched table.
const LABEL_COLUMN: &str = "category";
const VALUE_COLUMN: &str = "count";

pub fn cultural_insights(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Cultural Insights");

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            fort_aggregates(ui, state);
            ui.separator();
            warehouse_statistics(ui, state);
        });
}

fn fort_aggregates(ui: &mut Ui, state: &mut AppState) {
    let report = state.records();
    if report.records.is_empty() {
        ui.label("No fort data found.");
        return;
    }

    ui.label(RichText::new("Forts by state").strong());
    plot::bar_chart(ui, "forts_by_region", "Forts", &as_bars(region_counts(&report.records)));

    ui.label(RichText::new("Forts by type").strong());
    plot::bar_chart(ui, "forts_by_type", "Forts", &as_bars(type_counts(&report.records)));
}

fn as_bars(counts: BTreeMap<String, usize>) -> Vec<(String, f64)> {
    counts.into_iter().map(|(k, n)| (k, n as f64)).collect()
}

fn warehouse_statistics(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("Cultural Heritage Statistics").strong());

    if !state.warehouse_configured() {
        ui.colored_label(
            Color32::YELLOW,
            "Please configure Snowflake credentials to view cultural insights.",
        );
        return;
    }

    if ui.button("Refresh").clicked() {
        state.refresh_insights();
    }
    state.ensure_insights();

    match &state.insights {
        Some(FetchOutcome::Ready(stats)) => {
            table::stat_table(ui, stats);
            if stats.is_empty() {
                return;
            }
            match category_counts(stats, LABEL_COLUMN, VALUE_COLUMN) {
                Ok(bars) => plot::bar_chart(
                    ui,
                    "insights_chart",
                    "Cultural Heritage Distribution",
                    &bars,
                ),
                Err(e) => {
                    ui.colored_label(Color32::RED, format!("Chart unavailable: {e}"));
                }
            }
        }
        Some(outcome) => {
            if let Some(notice) = outcome.notice() {
                ui.colored_label(Color32::RED, notice);
            }
        }
        None => {}
    }
}
