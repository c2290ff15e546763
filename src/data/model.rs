use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// RecordId – opaque identifier of a heritage record
// ---------------------------------------------------------------------------

/// Identifier as it appears in the source file: either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{s}"),
            RecordId::Number(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// HeritageRecord – one validated fort
// ---------------------------------------------------------------------------

/// A heritage site that passed validation and carries a derived region.
#[derive(Debug, Clone, PartialEq)]
pub struct HeritageRecord {
    pub id: RecordId,
    pub name: String,
    /// Free-text location strings, in file order.
    pub locations: Vec<String>,
    /// Attribute name → free-text value (e.g. "Type", "Founded", "Coordinates").
    pub details: BTreeMap<String, String>,
    pub images: Vec<String>,
    pub last_edited: Option<String>,
    /// Canonical region name (title case) derived from `locations`.
    pub region: String,
}

impl HeritageRecord {
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    pub fn fort_type(&self) -> Option<&str> {
        self.detail("Type")
    }

    pub fn founded(&self) -> Option<&str> {
        self.detail("Founded")
    }

    pub fn coordinates(&self) -> Option<&str> {
        self.detail("Coordinates")
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of a fetched statistics table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the warehouse column types we handle.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for charting. Numeric text is accepted
    /// because some warehouse columns arrive untyped.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a calendar date. Text is accepted in ISO-8601
    /// form, optionally followed by a time component.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => {
                let s = s.trim();
                let day = s.get(..10).unwrap_or(s);
                NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
            }
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// StatTable – rectangular, column-oriented query result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StatColumn {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// Ordered named columns, all of the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    pub columns: Vec<StatColumn>,
}

impl StatTable {
    /// Build a table from row-major data. Short rows are padded with `Null`
    /// and surplus cells are dropped so the result is always rectangular.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut columns: Vec<StatColumn> = names
            .into_iter()
            .map(|name| StatColumn {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for col in &mut columns {
                col.values.push(cells.next().unwrap_or(CellValue::Null));
            }
        }
        StatTable { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Case-insensitive lookup: warehouses upper-case unquoted identifiers.
    pub fn column(&self, name: &str) -> Option<&StatColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col)?.values.get(row)
    }
}
