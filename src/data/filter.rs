use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::model::{DataError, Dataset};
use super::numeric::NumericKind;

/// Most code points above 127 an app name may contain and still count as
/// English (room for ™, ® or an emoji or two).
pub const MAX_NON_ASCII_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// Defect removal
// ---------------------------------------------------------------------------

/// Drop the record at `position`, leaving every other record untouched.
pub fn remove_row(dataset: &Dataset, position: usize) -> Dataset {
    if position >= dataset.len() {
        warn!(
            "{}: no row {position} to remove ({} rows loaded)",
            dataset.store,
            dataset.len()
        );
        return dataset.clone();
    }

    let records = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != position)
        .map(|(_, r)| r.clone())
        .collect();
    dataset.with_records(records)
}

/// Remove the store's documented corrupt listing, if it has one.
pub fn remove_known_defect(dataset: &Dataset) -> Dataset {
    match dataset.store.known_defect() {
        Some(position) => {
            if let Some(record) = dataset.records.get(position) {
                debug!(
                    "{}: dropping row {position} ({:?}, {} fields)",
                    dataset.store,
                    record.field(dataset.columns.name),
                    record.arity()
                );
            }
            remove_row(dataset, position)
        }
        None => dataset.clone(),
    }
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Highest popularity value seen for every app name.
pub fn reviews_max(dataset: &Dataset) -> Result<HashMap<&str, f64>, DataError> {
    let name_col = dataset.columns.name;
    let pop_col = dataset.columns.popularity;
    let mut max: HashMap<&str, f64> = HashMap::new();

    for (row, record) in dataset.records.iter().enumerate() {
        let reviews = dataset.number_at(row, pop_col, NumericKind::Decimal)?;
        max.entry(record.field(name_col))
            .and_modify(|m| {
                if *m < reviews {
                    *m = reviews;
                }
            })
            .or_insert(reviews);
    }
    Ok(max)
}

/// Keep one listing per app name: the first one, in source order, carrying
/// that name's highest popularity count.
pub fn deduplicate(dataset: &Dataset) -> Result<Dataset, DataError> {
    let max = reviews_max(dataset)?;
    let name_col = dataset.columns.name;
    let pop_col = dataset.columns.popularity;

    let mut added: HashSet<&str> = HashSet::with_capacity(max.len());
    let mut records = Vec::with_capacity(max.len());

    for (row, record) in dataset.records.iter().enumerate() {
        let name = record.field(name_col);
        let reviews = dataset.number_at(row, pop_col, NumericKind::Decimal)?;
        if max.get(name) == Some(&reviews) && added.insert(name) {
            records.push(record.clone());
        }
    }

    debug!(
        "{}: {} listings → {} unique apps",
        dataset.store,
        dataset.len(),
        records.len()
    );
    Ok(dataset.with_records(records))
}

/// Names that appear again after their first listing, in source order.
pub fn duplicate_names(dataset: &Dataset) -> Vec<String> {
    let name_col = dataset.columns.name;
    let mut seen: HashSet<&str> = HashSet::new();
    dataset
        .records
        .iter()
        .map(|r| r.field(name_col))
        .filter(|name| !seen.insert(*name))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Language and price filters
// ---------------------------------------------------------------------------

/// Heuristic: a name is English unless it holds more than
/// [`MAX_NON_ASCII_CHARS`] characters outside the 7-bit range.
pub fn is_english(name: &str) -> bool {
    name.chars().filter(|c| (*c as u32) > 127).count() <= MAX_NON_ASCII_CHARS
}

pub fn english_only(dataset: &Dataset) -> Dataset {
    let name_col = dataset.columns.name;
    let records = dataset
        .records
        .iter()
        .filter(|r| is_english(r.field(name_col)))
        .cloned()
        .collect();
    dataset.with_records(records)
}

/// Keep listings whose price field is exactly the store's free literal.
pub fn free_only(dataset: &Dataset) -> Dataset {
    let price_col = dataset.columns.price;
    let free = dataset.store.free_price();
    let records = dataset
        .records
        .iter()
        .filter(|r| r.field(price_col) == free)
        .cloned()
        .collect();
    dataset.with_records(records)
}
