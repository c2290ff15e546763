/// Data layer: record types, loading, validation, filtering.
///
/// Architecture:
/// ```text
///  indian_forts.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read + parse, cached on mtime (RecordStore)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  drop invalid entries, derive region (regions)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region / type / sort selectors → ordered subset
///   └──────────┘
/// ```
///
/// `coords` parses a record's coordinates for the explorer's map.

pub mod coords;
pub mod filter;
pub mod loader;
pub mod model;
pub mod regions;
pub mod validate;
