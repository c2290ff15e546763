use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::config::AppConfig;
use crate::data::filter::FortQuery;
use crate::data::loader::{LoadReport, RecordStore};
use crate::images::ImageFetcher;
use crate::stats::{distinct_text, COUNTRY_COLUMN};
use crate::warehouse::{
    fetch_table, FetchOutcome, FetchStage, SnowflakeWarehouse, INSIGHTS_QUERY, TOURISM_QUERY,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Explorer,
    Insights,
    Tourism,
}

impl View {
    pub const ALL: [View; 3] = [View::Explorer, View::Insights, View::Tourism];

    pub fn title(self) -> &'static str {
        match self {
            View::Explorer => "Forts Explorer",
            View::Insights => "Cultural Insights",
            View::Tourism => "Tourism Data",
        }
    }
}

/// One cached image download.
pub enum ImageSlot {
    Ready(TextureHandle),
    Unavailable,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Fort records, cached on file modification time.
    pub store: RecordStore,

    pub view: View,

    /// Explorer selectors.
    pub query: FortQuery,

    /// Download result per image URL, kept for the session.
    images: HashMap<String, ImageSlot>,
    fetcher: Option<ImageFetcher>,

    /// `None` when credentials are not configured; `Err` when the client
    /// could not be built.
    warehouse: Option<Result<SnowflakeWarehouse, String>>,

    /// Last fetch per statistics view; `None` until first visit or refresh.
    pub insights: Option<FetchOutcome>,
    pub tourism: Option<FetchOutcome>,

    /// Countries shown on the tourism chart; empty means all.
    pub tourism_countries: BTreeSet<String>,
    pub show_raw_tourism: bool,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let fetcher = match ImageFetcher::new(config.image_timeout) {
            Ok(f) => Some(f),
            Err(e) => {
                log::error!("Image downloads disabled: {e}");
                None
            }
        };
        let warehouse = config.warehouse.clone().map(|cfg| {
            SnowflakeWarehouse::new(cfg).map_err(|e| {
                log::error!("Failed to set up warehouse client: {e}");
                e.to_string()
            })
        });

        Self {
            store: RecordStore::new(config.data_path),
            view: View::Explorer,
            query: FortQuery::default(),
            images: HashMap::new(),
            fetcher,
            warehouse,
            insights: None,
            tourism: None,
            tourism_countries: BTreeSet::new(),
            show_raw_tourism: false,
            status_message: None,
        }
    }

    /// Current fort records; re-reads the file only if it changed.
    pub fn records(&mut self) -> LoadReport {
        let report = self.store.load();
        self.status_message = report.warning.clone();
        report
    }

    /// Switch to another records file and reset the explorer selectors.
    pub fn open_file(&mut self, path: PathBuf) {
        log::info!("Switching fort data to {}", path.display());
        self.store.set_path(path);
        self.query = FortQuery::default();
    }

    pub fn reload(&mut self) {
        self.store.invalidate();
    }

    pub fn warehouse_configured(&self) -> bool {
        self.warehouse.is_some()
    }

    fn fetch(&self, sql: &str) -> Option<FetchOutcome> {
        match self.warehouse.as_ref()? {
            Ok(warehouse) => Some(fetch_table(warehouse, sql)),
            Err(reason) => Some(FetchOutcome::Unavailable {
                stage: FetchStage::Connect,
                reason: reason.clone(),
            }),
        }
    }

    /// Fetch insights on first use.
    pub fn ensure_insights(&mut self) {
        if self.insights.is_none() {
            self.refresh_insights();
        }
    }

    pub fn refresh_insights(&mut self) {
        self.insights = self.fetch(INSIGHTS_QUERY);
    }

    /// Fetch tourism data on first use.
    pub fn ensure_tourism(&mut self) {
        if self.tourism.is_none() {
            self.refresh_tourism();
        }
    }

    pub fn refresh_tourism(&mut self) {
        let outcome = self.fetch(TOURISM_QUERY);
        self.set_tourism(outcome);
    }

    /// Store a tourism fetch, dropping ticked countries the new table lacks.
    fn set_tourism(&mut self, outcome: Option<FetchOutcome>) {
        if let Some(FetchOutcome::Ready(table)) = &outcome {
            let present = distinct_text(table, COUNTRY_COLUMN);
            self.tourism_countries.retain(|c| present.contains(c));
        }
        self.tourism = outcome;
    }

    /// Toggle a country in the tourism chart selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.tourism_countries.remove(country) {
            self.tourism_countries.insert(country.to_string());
        }
    }

    /// Download the image at `url` once and keep the texture.
    pub fn image(&mut self, ctx: &egui::Context, url: &str) -> &ImageSlot {
        if !self.images.contains_key(url) {
            let slot = match &self.fetcher {
                Some(fetcher) => match fetcher.fetch(url) {
                    Ok(img) => {
                        let color = ColorImage::from_rgba_unmultiplied(img.size(), &img.rgba);
                        ImageSlot::Ready(ctx.load_texture(url, color, TextureOptions::LINEAR))
                    }
                    Err(e) => {
                        log::warn!("Image {url} not available: {e}");
                        ImageSlot::Unavailable
                    }
                },
                None => ImageSlot::Unavailable,
            };
            self.images.insert(url.to_string(), slot);
        }
        &self.images[url]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, StatTable};
    use crate::warehouse::SnowflakeConfig;
    use std::time::Duration;
    use tempfile::TempDir;

    fn config(dir: &TempDir, warehouse: Option<SnowflakeConfig>) -> AppConfig {
        AppConfig {
            data_path: dir.path().join("forts.json"),
            image_timeout: Duration::from_secs(1),
            warehouse,
        }
    }

    fn unreachable_warehouse() -> SnowflakeConfig {
        SnowflakeConfig {
            account: "xy12345".into(),
            user: "analyst".into(),
            password: "secret".into(),
            warehouse: None,
            database: None,
            schema: None,
            role: None,
            base_url: Some("http://127.0.0.1:9".into()),
        }
    }

    #[test]
    fn unconfigured_warehouse_fetches_nothing() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir, None));
        assert!(!state.warehouse_configured());
        state.ensure_insights();
        assert!(state.insights.is_none());
    }

    #[test]
    fn unreachable_warehouse_yields_a_notice() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir, Some(unreachable_warehouse())));
        state.ensure_tourism();
        let notice = state.tourism.as_ref().and_then(FetchOutcome::notice);
        assert!(notice.unwrap().starts_with("Error connecting to the warehouse"));
    }

    #[test]
    fn missing_data_file_sets_status_message() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir, None));
        assert!(state.records().records.is_empty());
        assert!(state.status_message.is_some());
    }

    fn tourism_table(countries: &[&str]) -> StatTable {
        StatTable::from_rows(
            vec!["DATE".into(), "COUNTRY".into(), "VISITORS".into()],
            countries
                .iter()
                .map(|c| {
                    vec![
                        CellValue::Text("2023-01-01".into()),
                        CellValue::Text(c.to_string()),
                        CellValue::Integer(10),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn refreshed_table_drops_stale_country_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir, None));
        state.toggle_country("India");
        state.toggle_country("Nepal");

        state.set_tourism(Some(FetchOutcome::Ready(tourism_table(&["India", "Japan"]))));

        assert_eq!(
            state.tourism_countries.iter().collect::<Vec<_>>(),
            vec!["India"]
        );
    }

    #[test]
    fn failed_refresh_keeps_country_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir, None));
        state.toggle_country("Nepal");

        state.set_tourism(Some(FetchOutcome::Unavailable {
            stage: FetchStage::Query,
            reason: "timeout".into(),
        }));

        assert!(state.tourism_countries.contains("Nepal"));
    }

    #[test]
    fn toggling_a_country_twice_restores_selection() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir, None));
        state.toggle_country("India");
        assert!(state.tourism_countries.contains("India"));
        state.toggle_country("India");
        assert!(state.tourism_countries.is_empty());
    }
}
