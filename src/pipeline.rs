use log::info;
use serde::Serialize;

use crate::data::aggregate::{
    AppEntry, MID_INSTALL_TIERS, TOP_INSTALL_TIERS, ValueTable, apps_in_group, frequency_table,
    grouped_average,
};
use crate::data::filter::{
    deduplicate, duplicate_names, english_only, free_only, remove_known_defect,
};
use crate::data::model::{DataError, Dataset, Role, Store};

/// How many duplicate names the summary quotes.
const DUPLICATE_EXAMPLES: usize = 10;

// ---------------------------------------------------------------------------
// Cleaning pipeline state
// ---------------------------------------------------------------------------

/// Every stage's output for one store, oldest first.
pub struct StoreAnalysis {
    pub raw: Dataset,
    pub repaired: Dataset,
    pub deduplicated: Dataset,
    pub english: Dataset,
    /// Free English apps; what the report analyses.
    pub cleaned: Dataset,
}

impl StoreAnalysis {
    /// Run defect removal, deduplication, the English filter and the free
    /// filter, in that order. Stores that are not deduplicated carry the
    /// repaired data through that stage unchanged.
    pub fn run(raw: Dataset) -> Result<Self, DataError> {
        let repaired = remove_known_defect(&raw);
        repaired.check_arity()?;

        let deduplicated = if raw.store.deduplicates() {
            deduplicate(&repaired)?
        } else {
            repaired.clone()
        };
        let english = english_only(&deduplicated);
        let cleaned = free_only(&english);

        info!(
            "{}: {} loaded, {} after defect removal, {} unique, {} English, {} free",
            raw.store,
            raw.len(),
            repaired.len(),
            deduplicated.len(),
            english.len(),
            cleaned.len()
        );

        Ok(StoreAnalysis {
            raw,
            repaired,
            deduplicated,
            english,
            cleaned,
        })
    }

    pub fn store(&self) -> Store {
        self.raw.store
    }

    /// `(label, dataset)` per stage, for previews.
    pub fn stages(&self) -> [(&'static str, &Dataset); 5] {
        [
            ("loaded", &self.raw),
            ("defect removed", &self.repaired),
            ("deduplicated", &self.deduplicated),
            ("English names", &self.english),
            ("free apps", &self.cleaned),
        ]
    }
}

// ---------------------------------------------------------------------------
// Per-store report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StageCount {
    pub stage: &'static str,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateSummary {
    pub count: usize,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedTable {
    pub title: String,
    pub table: ValueTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Drilldown {
    pub title: String,
    pub apps: Vec<AppEntry>,
}

/// Everything printed for one store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreReport {
    pub store: Store,
    pub stages: Vec<StageCount>,
    /// Only for stores whose duplicate listings are collapsed.
    pub duplicates: Option<DuplicateSummary>,
    pub frequencies: Vec<NamedTable>,
    pub averages: Vec<NamedTable>,
    pub drilldowns: Vec<Drilldown>,
}

/// Drill-down listings worth reading for each store: (group, tiers).
const GOOGLE_DRILLDOWNS: &[(&str, &[&str])] = &[
    ("COMMUNICATION", &TOP_INSTALL_TIERS),
    ("BOOKS_AND_REFERENCE", &TOP_INSTALL_TIERS),
    ("BOOKS_AND_REFERENCE", &MID_INSTALL_TIERS),
];
const APPLE_DRILLDOWNS: &[(&str, &[&str])] = &[("Reference", &[])];

fn default_drilldowns(store: Store) -> &'static [(&'static str, &'static [&'static str])] {
    match store {
        Store::GooglePlay => GOOGLE_DRILLDOWNS,
        Store::AppStore => APPLE_DRILLDOWNS,
    }
}

/// Roles whose value distribution is reported for each store.
fn frequency_roles(store: Store) -> &'static [Role] {
    match store {
        Store::GooglePlay => &[Role::Genre, Role::Category, Role::Adoption],
        Store::AppStore => &[Role::Genre],
    }
}

impl StoreReport {
    /// Aggregate the cleaned data; `extra_groups` adds full listings of
    /// further categories on top of the store's usual drill-downs.
    pub fn build(analysis: &StoreAnalysis, extra_groups: &[String]) -> Result<Self, DataError> {
        let store = analysis.store();
        let ds = &analysis.cleaned;
        let cols = ds.columns;

        let stages = analysis
            .stages()
            .into_iter()
            .map(|(stage, d)| StageCount {
                stage,
                rows: d.len(),
            })
            .collect();

        let duplicates = store.deduplicates().then(|| {
            let dups = duplicate_names(&analysis.repaired);
            DuplicateSummary {
                count: dups.len(),
                examples: dups.into_iter().take(DUPLICATE_EXAMPLES).collect(),
            }
        });

        let frequencies = frequency_roles(store)
            .iter()
            .map(|role| {
                let column = cols.index(*role);
                NamedTable {
                    title: format!("share of free English apps by {}", ds.header[column]),
                    table: frequency_table(ds, column),
                }
            })
            .collect();

        let adoption_name = &ds.header[cols.adoption];
        let averages = vec![NamedTable {
            title: format!("average {} by {}", adoption_name, ds.header[cols.category]),
            table: grouped_average(ds, cols.category, cols.adoption, store.adoption_kind())?,
        }];

        let mut drilldowns: Vec<Drilldown> = default_drilldowns(store)
            .iter()
            .map(|(group, tiers)| drilldown(ds, group, tiers))
            .collect();
        drilldowns.extend(extra_groups.iter().map(|group| drilldown(ds, group, &[])));

        Ok(StoreReport {
            store,
            stages,
            duplicates,
            frequencies,
            averages,
            drilldowns,
        })
    }
}

fn drilldown(ds: &Dataset, group: &str, tiers: &[&str]) -> Drilldown {
    let cols = ds.columns;
    let adoption_name = &ds.header[cols.adoption];
    let title = if tiers.is_empty() {
        format!("{group}: {adoption_name} of every app")
    } else {
        format!("{group}: apps at {}", tiers.join(" / "))
    };
    Drilldown {
        title,
        apps: apps_in_group(ds, cols.category, group, cols.adoption, tiers),
    }
}
