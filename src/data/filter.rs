use std::collections::BTreeSet;

use super::model::HeritageRecord;

// ---------------------------------------------------------------------------
// Selectors: immutable request parameters for the explorer view
// ---------------------------------------------------------------------------

/// Selector label meaning "any region".
pub const ALL_REGIONS: &str = "All States";
/// Selector label meaning "any fort type".
pub const ALL_TYPES: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionFilter {
    #[default]
    All,
    Only(String),
}

impl RegionFilter {
    pub fn from_selection(label: &str) -> Self {
        if label == ALL_REGIONS {
            RegionFilter::All
        } else {
            RegionFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RegionFilter::All => ALL_REGIONS,
            RegionFilter::Only(region) => region,
        }
    }

    fn matches(&self, record: &HeritageRecord) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => record.region == *region,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn from_selection(label: &str) -> Self {
        if label == ALL_TYPES {
            TypeFilter::All
        } else {
            TypeFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TypeFilter::All => ALL_TYPES,
            TypeFilter::Only(fort_type) => fort_type,
        }
    }

    fn matches(&self, record: &HeritageRecord) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(fort_type) => record.fort_type() == Some(fort_type.as_str()),
        }
    }
}

/// Ordering of the explorer list. Dates and years are compared as raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// File order.
    #[default]
    Listed,
    Name,
    /// Most recently edited first.
    LastEdited,
    /// Oldest founding year first.
    Founded,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Listed,
        SortKey::Name,
        SortKey::LastEdited,
        SortKey::Founded,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Listed => "As listed",
            SortKey::Name => "Name",
            SortKey::LastEdited => "Recently edited",
            SortKey::Founded => "Founding year",
        }
    }
}

/// The complete explorer selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FortQuery {
    pub region: RegionFilter,
    pub fort_type: TypeFilter,
    pub sort: SortKey,
}

// ---------------------------------------------------------------------------
// Filter / sort pass
// ---------------------------------------------------------------------------

/// Return the records passing both filters, ordered by the sort key.
///
/// The sort is stable, so records comparing equal keep their input order.
pub fn apply<'a>(records: &'a [HeritageRecord], query: &FortQuery) -> Vec<&'a HeritageRecord> {
    let mut selected: Vec<&HeritageRecord> = records
        .iter()
        .filter(|r| query.region.matches(r) && query.fort_type.matches(r))
        .collect();

    match query.sort {
        SortKey::Listed => {}
        SortKey::Name => selected.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::LastEdited => selected.sort_by(|a, b| last_edited(b).cmp(last_edited(a))),
        SortKey::Founded => {
            selected.sort_by(|a, b| a.founded().unwrap_or("").cmp(b.founded().unwrap_or("")))
        }
    }
    selected
}

fn last_edited(record: &HeritageRecord) -> &str {
    record.last_edited.as_deref().unwrap_or("")
}

/// Distinct regions present in `records`, sorted.
pub fn region_options(records: &[HeritageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty `details.Type` values present in `records`, sorted.
pub fn type_options(records: &[HeritageRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.fort_type())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RecordId;
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;

    fn fort(
        id: i64,
        name: &str,
        region: &str,
        fort_type: Option<&str>,
        founded: Option<&str>,
        edited: Option<&str>,
    ) -> HeritageRecord {
        let mut details = BTreeMap::new();
        if let Some(t) = fort_type {
            details.insert("Type".to_string(), t.to_string());
        }
        if let Some(f) = founded {
            details.insert("Founded".to_string(), f.to_string());
        }
        details.insert("Condition".to_string(), "Ruins".to_string());
        HeritageRecord {
            id: RecordId::Number(id),
            name: name.to_string(),
            locations: vec![format!("Town, {region}")],
            details,
            images: Vec::new(),
            last_edited: edited.map(str::to_string),
            region: region.to_string(),
        }
    }

    #[fixture]
    fn forts() -> Vec<HeritageRecord> {
        vec![
            fort(1, "Amber", "Rajasthan", Some("Hill fort"), Some("1592"), Some("2024-03-01")),
            fort(2, "Golconda", "Telangana", Some("Fort"), Some("1143"), None),
            fort(3, "Jaisalmer", "Rajasthan", Some("Fort"), None, Some("2024-05-10")),
            fort(4, "Bekal", "Kerala", None, Some("1650"), Some("2024-03-01")),
            fort(5, "Chittor", "Rajasthan", Some("Hill fort"), Some("0734"), Some("2023-12-31")),
        ]
    }

    fn ids(records: &[&HeritageRecord]) -> Vec<i64> {
        records
            .iter()
            .map(|r| match r.id {
                RecordId::Number(n) => n,
                RecordId::Text(_) => -1,
            })
            .collect()
    }

    #[rstest]
    fn match_all_selectors_return_everything_in_order(forts: Vec<HeritageRecord>) {
        let query = FortQuery {
            region: RegionFilter::from_selection("All States"),
            fort_type: TypeFilter::from_selection("All"),
            sort: SortKey::Listed,
        };
        let out = apply(&forts, &query);
        assert_eq!(out.len(), forts.len());
        assert!(out.iter().zip(&forts).all(|(a, b)| *a == b));
    }

    #[rstest]
    #[case(RegionFilter::Only("Rajasthan".into()), TypeFilter::All, vec![1, 3, 5])]
    #[case(RegionFilter::Only("Rajasthan".into()), TypeFilter::Only("Fort".into()), vec![3])]
    #[case(RegionFilter::All, TypeFilter::Only("Hill fort".into()), vec![1, 5])]
    #[case(RegionFilter::Only("rajasthan".into()), TypeFilter::All, vec![])]
    #[case(RegionFilter::Only("Kerala".into()), TypeFilter::Only("".into()), vec![])]
    fn filters_are_conjunctive_exact_matches(
        forts: Vec<HeritageRecord>,
        #[case] region: RegionFilter,
        #[case] fort_type: TypeFilter,
        #[case] expected: Vec<i64>,
    ) {
        let query = FortQuery {
            region,
            fort_type,
            sort: SortKey::Listed,
        };
        assert_eq!(ids(&apply(&forts, &query)), expected);
    }

    #[rstest]
    #[case(SortKey::Name, vec![1, 4, 5, 2, 3])]
    #[case(SortKey::LastEdited, vec![3, 1, 4, 5, 2])]
    #[case(SortKey::Founded, vec![3, 5, 2, 1, 4])]
    fn sorts_by_key(forts: Vec<HeritageRecord>, #[case] sort: SortKey, #[case] expected: Vec<i64>) {
        let query = FortQuery {
            sort,
            ..FortQuery::default()
        };
        assert_eq!(ids(&apply(&forts, &query)), expected);
    }

    #[test]
    fn sorting_is_stable_for_equal_keys() {
        let forts = vec![
            fort(1, "Same", "Goa", None, None, None),
            fort(2, "Same", "Goa", None, None, None),
            fort(3, "Same", "Goa", None, None, None),
        ];
        for sort in SortKey::ALL {
            let query = FortQuery {
                sort,
                ..FortQuery::default()
            };
            assert_eq!(ids(&apply(&forts, &query)), vec![1, 2, 3]);
        }
    }

    #[rstest]
    fn applying_twice_matches_applying_once(forts: Vec<HeritageRecord>) {
        for sort in SortKey::ALL {
            let query = FortQuery {
                region: RegionFilter::Only("Rajasthan".into()),
                fort_type: TypeFilter::All,
                sort,
            };
            let once: Vec<HeritageRecord> = apply(&forts, &query).into_iter().cloned().collect();
            let twice: Vec<HeritageRecord> = apply(&once, &query).into_iter().cloned().collect();
            assert_eq!(once, twice);
        }
    }

    #[rstest]
    fn options_are_sorted_and_distinct(forts: Vec<HeritageRecord>) {
        assert_eq!(region_options(&forts), vec!["Kerala", "Rajasthan", "Telangana"]);
        assert_eq!(type_options(&forts), vec!["Fort", "Hill fort"]);
    }

    #[test]
    fn selector_labels_round_trip() {
        assert_eq!(RegionFilter::from_selection(ALL_REGIONS), RegionFilter::All);
        assert_eq!(RegionFilter::Only("Goa".into()).label(), "Goa");
        assert_eq!(TypeFilter::from_selection(ALL_TYPES).label(), ALL_TYPES);
    }
}
