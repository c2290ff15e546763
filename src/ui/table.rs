use std::io::Write;

use anyhow::{Context, Result};
use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::StatTable;

/// Render a fetched table with a header row.
pub fn stat_table(ui: &mut Ui, table: &StatTable) {
    if table.columns.is_empty() {
        ui.label("The query returned no columns.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0).resizable(true), table.columns.len())
        .header(20.0, |mut header| {
            for name in table.column_names() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.num_rows(), |mut row| {
                let i = row.index();
                for col in 0..table.columns.len() {
                    row.col(|ui| {
                        if let Some(cell) = table.cell(i, col) {
                            ui.label(cell.to_string());
                        }
                    });
                }
            });
        });

    if ui.small_button("Export CSV…").clicked() {
        export_csv_dialog(table);
    }
}

/// Write `table` as CSV with a header row. Nulls become empty fields.
pub fn write_csv<W: Write>(table: &StatTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.column_names())
        .context("writing CSV header")?;
    for row in 0..table.num_rows() {
        let fields = table.columns.iter().map(|c| {
            let cell = &c.values[row];
            if cell.is_null() {
                String::new()
            } else {
                cell.to_string()
            }
        });
        writer
            .write_record(fields)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn export_csv_dialog(table: &StatTable) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export table")
        .add_filter("CSV", &["csv"])
        .set_file_name("statistics.csv")
        .save_file()
    else {
        return;
    };

    let result = std::fs::File::create(&path)
        .with_context(|| format!("creating {}", path.display()))
        .and_then(|file| write_csv(table, file));
    match result {
        Ok(()) => log::info!("Exported {} rows to {}", table.num_rows(), path.display()),
        Err(e) => log::error!("CSV export failed: {e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use chrono::NaiveDate;

    #[test]
    fn csv_has_header_and_blank_nulls() {
        let table = StatTable::from_rows(
            vec!["DATE".into(), "VISITORS".into()],
            vec![
                vec![
                    CellValue::Date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
                    CellValue::Integer(100),
                ],
                vec![CellValue::Text("2023-02-01".into()), CellValue::Null],
            ],
        );
        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "DATE,VISITORS\n2023-01-01,100\n2023-02-01,\n"
        );
    }
}
