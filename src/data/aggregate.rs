use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{DataError, Dataset};
use super::numeric::NumericKind;

/// Install tiers that mark a category's runaway hits.
pub const TOP_INSTALL_TIERS: [&str; 3] = ["1,000,000,000+", "500,000,000+", "100,000,000+"];

/// Install tiers of apps that are popular without dominating their niche.
pub const MID_INSTALL_TIERS: [&str; 4] = ["1,000,000+", "5,000,000+", "10,000,000+", "50,000,000+"];

// ---------------------------------------------------------------------------
// ValueTable – key → number, for frequencies and grouped means alike
// ---------------------------------------------------------------------------

/// Distinct column value → percentage or mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueTable {
    entries: BTreeMap<String, f64>,
}

impl ValueTable {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ValueTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        ValueTable {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Share of records, in percent, holding each distinct value of `column`.
/// Values are compared exactly as stored.
pub fn frequency_table(dataset: &Dataset, column: usize) -> ValueTable {
    if dataset.is_empty() {
        return ValueTable::default();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &dataset.records {
        *counts.entry(record.field(column)).or_default() += 1;
    }

    let total = dataset.len() as f64;
    counts
        .into_iter()
        .map(|(value, n)| (value, n as f64 / total * 100.0))
        .collect()
}

/// Mean of `value_column` per distinct value of `group_column`.
///
/// Groups come only from observed rows, so none is ever empty.
pub fn grouped_average(
    dataset: &Dataset,
    group_column: usize,
    value_column: usize,
    kind: NumericKind,
) -> Result<ValueTable, DataError> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (row, record) in dataset.records.iter().enumerate() {
        let value = dataset.number_at(row, value_column, kind)?;
        let (sum, len) = groups.entry(record.field(group_column)).or_default();
        *sum += value;
        *len += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(group, (sum, len))| (group, sum / len as f64))
        .collect())
}

/// One app of a drill-down listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppEntry {
    pub name: String,
    pub value: String,
}

/// Apps whose `group_column` equals `group`, with their `value_column`.
/// A non-empty `tiers` keeps only apps whose value is one of them.
pub fn apps_in_group(
    dataset: &Dataset,
    group_column: usize,
    group: &str,
    value_column: usize,
    tiers: &[&str],
) -> Vec<AppEntry> {
    let name_col = dataset.columns.name;
    dataset
        .records
        .iter()
        .filter(|r| r.field(group_column) == group)
        .filter(|r| tiers.is_empty() || tiers.contains(&r.field(value_column)))
        .map(|r| AppEntry {
            name: r.field(name_col).to_string(),
            value: r.field(value_column).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, Store};

    fn google(rows: &[[&str; 6]]) -> Dataset {
        let header = ["App", "Category", "Reviews", "Installs", "Price", "Genres"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = rows.iter().map(|r| Record::from_iter(*r)).collect();
        Dataset::new(Store::GooglePlay, header, records).unwrap()
    }

    fn sample() -> Dataset {
        google(&[
            ["Slack", "BUSINESS", "51507", "5,000,000+", "0", "Business"],
            ["Notes", "TOOLS", "12", "1,000+", "0", "Tools"],
            ["Torch", "TOOLS", "900", "10,000+", "0", "Tools"],
            ["Wiki", "BOOKS_AND_REFERENCE", "1", "100,000,000+", "0", "Books & Reference"],
            ["Bible", "BOOKS_AND_REFERENCE", "1", "100,000+", "0", "Books & Reference"],
            ["Kindle", "BOOKS_AND_REFERENCE", "1", "10,000,000+", "0", "Books & Reference"],
        ])
    }

    #[test]
    fn frequencies_are_percentages_of_the_row_count() {
        let ds = sample();
        let table = frequency_table(&ds, ds.columns.category);
        assert_eq!(table.iter().count(), 3);
        assert_eq!(table.get("BOOKS_AND_REFERENCE"), Some(50.0));
        assert!((table.get("TOOLS").unwrap() - 100.0 / 3.0).abs() < 1e-9);
        assert!((table.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn frequencies_sum_to_one_hundred_on_every_column() {
        let ds = sample();
        for column in 0..ds.header.len() {
            let total = frequency_table(&ds, column).total();
            assert!((total - 100.0).abs() < 1e-9, "column {column}: {total}");
        }
    }

    #[test]
    fn frequency_keys_are_not_normalized() {
        let ds = google(&[
            ["A", "Tools", "1", "1+", "0", "x"],
            ["B", "tools", "1", "1+", "0", "x"],
            ["C", "Tools ", "1", "1+", "0", "x"],
        ]);
        assert_eq!(frequency_table(&ds, ds.columns.category).iter().count(), 3);
    }

    #[test]
    fn empty_dataset_gives_empty_table() {
        let ds = google(&[]);
        assert!(frequency_table(&ds, 0).is_empty());
        assert!(grouped_average(&ds, 1, 3, NumericKind::Count).unwrap().is_empty());
    }

    #[test]
    fn average_installs_per_category() {
        let ds = sample();
        let avg = grouped_average(&ds, ds.columns.category, ds.columns.adoption, NumericKind::Count)
            .unwrap();
        assert_eq!(avg.get("BUSINESS"), Some(5_000_000.0));
        assert_eq!(avg.get("TOOLS"), Some(5_500.0));
        assert_eq!(avg.get("BOOKS_AND_REFERENCE"), Some(36_700_000.0));
    }

    #[test]
    fn single_member_group_average_is_its_value() {
        let ds = google(&[["Only", "SOLO", "1", "50,000+", "0", "x"]]);
        let avg = grouped_average(&ds, 1, 3, NumericKind::Count).unwrap();
        assert_eq!(avg.get("SOLO"), Some(50_000.0));
    }

    #[test]
    fn grouped_average_fails_on_bad_number() {
        let ds = google(&[
            ["A", "X", "1", "1,000+", "0", "x"],
            ["B", "X", "1", "Varies with device", "0", "x"],
        ]);
        let err = grouped_average(&ds, 1, 3, NumericKind::Count).unwrap_err();
        assert!(matches!(err, DataError::InvalidNumber { row: 1, .. }), "{err}");
    }

    #[test]
    fn drill_down_filters_by_group_and_tier() {
        let ds = sample();
        let cols = ds.columns;

        let hits = apps_in_group(&ds, cols.category, "BOOKS_AND_REFERENCE", cols.adoption, &TOP_INSTALL_TIERS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Wiki");
        assert_eq!(hits[0].value, "100,000,000+");

        let mid = apps_in_group(&ds, cols.category, "BOOKS_AND_REFERENCE", cols.adoption, &MID_INSTALL_TIERS);
        assert_eq!(mid.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), vec!["Kindle"]);

        let all = apps_in_group(&ds, cols.category, "TOOLS", cols.adoption, &[]);
        assert_eq!(all.len(), 2);
    }
}
