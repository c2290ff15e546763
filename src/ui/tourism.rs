use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::state::AppState;
use crate::stats::{distinct_text, visitor_series, COUNTRY_COLUMN};
use crate::ui::{plot, table};
use crate::warehouse::FetchOutcome;

const DATE_COLUMN: &str = "date";
const VISITORS_COLUMN: &str = "visitors";

pub fn tourism_data(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Tourism Data Analysis");

    if !state.warehouse_configured() {
        ui.colored_label(
            Color32::YELLOW,
            "Please configure Snowflake credentials to view tourism data.",
        );
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Refresh").clicked() {
            state.refresh_tourism();
        }
        ui.checkbox(&mut state.show_raw_tourism, "Show raw data");
    });
    state.ensure_tourism();

    // Cloned so the selectors below can mutate state.
    let stats = match &state.tourism {
        Some(FetchOutcome::Ready(stats)) => stats.clone(),
        Some(outcome) => {
            if let Some(notice) = outcome.notice() {
                ui.colored_label(Color32::RED, notice);
            }
            return;
        }
        None => return,
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let countries = distinct_text(&stats, COUNTRY_COLUMN);
            if !countries.is_empty() {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong("Countries");
                    ui.small("(none ticked = all)");
                    for country in &countries {
                        let mut checked = state.tourism_countries.contains(country);
                        if ui.checkbox(&mut checked, country.as_str()).changed() {
                            state.toggle_country(country);
                        }
                    }
                });
            }

            if state.show_raw_tourism {
                ui.label(RichText::new("Tourism Statistics").strong());
                table::stat_table(ui, &stats);
            }

            if stats.is_empty() {
                ui.label("No tourism data found.");
                return;
            }

            let group = stats.column(COUNTRY_COLUMN).map(|_| COUNTRY_COLUMN);
            match visitor_series(
                &stats,
                DATE_COLUMN,
                VISITORS_COLUMN,
                group,
                &state.tourism_countries,
            ) {
                Ok(series) => {
                    ui.label(RichText::new("Tourist Visits Over Time").strong());
                    let colors = ColorMap::new(&countries);
                    plot::time_series(ui, "tourism_chart", &series, &colors);
                }
                Err(e) => {
                    ui.colored_label(Color32::RED, format!("Chart unavailable: {e}"));
                }
            }
        });
}
