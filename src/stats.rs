//! Pivots from fetched tables and fort records into chart series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::model::{HeritageRecord, StatColumn, StatTable};

#[derive(Debug, Error, PartialEq)]
pub enum PivotError {
    #[error("column '{0}' not found")]
    MissingColumn(String),
    #[error("column '{column}' row {row}: {value:?} is not a number")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("column '{column}' row {row}: {value:?} is not a date")]
    NotDate {
        column: String,
        row: usize,
        value: String,
    },
}

/// Grouping column of the tourism table.
pub const COUNTRY_COLUMN: &str = "country";

/// Series name used when the table has no grouping column.
pub const UNGROUPED: &str = "All";

fn column<'a>(table: &'a StatTable, name: &str) -> Result<&'a StatColumn, PivotError> {
    table
        .column(name)
        .ok_or_else(|| PivotError::MissingColumn(name.to_string()))
}

/// `(label, value)` pairs for a bar chart, in table order. Null values are
/// skipped.
pub fn category_counts(
    table: &StatTable,
    label: &str,
    value: &str,
) -> Result<Vec<(String, f64)>, PivotError> {
    let labels = column(table, label)?;
    let values = column(table, value)?;

    let mut bars = Vec::with_capacity(table.num_rows());
    for (row, (l, v)) in labels.values.iter().zip(&values.values).enumerate() {
        if v.is_null() {
            continue;
        }
        let height = v.as_f64().ok_or_else(|| PivotError::NotNumeric {
            column: values.name.clone(),
            row,
            value: v.to_string(),
        })?;
        bars.push((l.to_string(), height));
    }
    Ok(bars)
}

/// Days since the Unix epoch, used as the x coordinate of time series.
pub fn date_to_x(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as f64
}

/// Inverse of [`date_to_x`] for axis labels.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let days = x.round();
    if days >= 0.0 {
        epoch.checked_add_days(chrono::Days::new(days as u64))
    } else {
        epoch.checked_sub_days(chrono::Days::new((-days) as u64))
    }
}

/// Pivot a long table into one `[x, y]` series per group, sorted by date.
///
/// With no `group` column every row lands in the [`UNGROUPED`] series. When
/// `selected` is non-empty only those groups are kept. Rows with a null
/// value are skipped.
pub fn visitor_series(
    table: &StatTable,
    date: &str,
    value: &str,
    group: Option<&str>,
    selected: &BTreeSet<String>,
) -> Result<BTreeMap<String, Vec<[f64; 2]>>, PivotError> {
    let dates = column(table, date)?;
    let values = column(table, value)?;
    let groups = group.map(|g| column(table, g)).transpose()?;

    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let key = match groups {
            Some(g) => g.values[row].to_string(),
            None => UNGROUPED.to_string(),
        };
        if !selected.is_empty() && !selected.contains(&key) {
            continue;
        }

        let v = &values.values[row];
        if v.is_null() {
            continue;
        }
        let y = v.as_f64().ok_or_else(|| PivotError::NotNumeric {
            column: values.name.clone(),
            row,
            value: v.to_string(),
        })?;
        let d = &dates.values[row];
        let x = d.as_date().map(date_to_x).ok_or_else(|| PivotError::NotDate {
            column: dates.name.clone(),
            row,
            value: d.to_string(),
        })?;

        series.entry(key).or_default().push([x, y]);
    }

    for points in series.values_mut() {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }
    Ok(series)
}

/// Distinct non-null values of a column, rendered as text and sorted.
pub fn distinct_text(table: &StatTable, name: &str) -> BTreeSet<String> {
    table
        .column(name)
        .map(|c| {
            c.values
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Number of forts per region.
pub fn region_counts(records: &[HeritageRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.region.clone()).or_insert(0) += 1;
    }
    counts
}

/// Number of forts per `details.Type`; records without a type count as
/// "Unknown".
pub fn type_counts(records: &[HeritageRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        let key = record.fort_type().unwrap_or("Unknown").to_string();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
