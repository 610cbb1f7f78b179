use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::numeric::{NumberError, NumericKind};

// ---------------------------------------------------------------------------
// Errors raised while interpreting a loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{store} header has no '{column}' column")]
    MissingColumn { store: Store, column: &'static str },

    #[error("{store} row {row} has {found} fields, header has {expected}")]
    RaggedRow {
        store: Store,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("{store} row {row}, column '{column}': {source}")]
    InvalidNumber {
        store: Store,
        row: usize,
        column: String,
        #[source]
        source: NumberError,
    },
}

// ---------------------------------------------------------------------------
// Store – which export a table came from, and its fixed schema
// ---------------------------------------------------------------------------

/// The two supported listing exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    GooglePlay,
    AppStore,
}

/// The part a column plays in the analysis, independent of its header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Name,
    Category,
    Genre,
    /// Ranks duplicate listings (review / rating count).
    Popularity,
    /// Measures how widely an app is used (installs / rating count).
    Adoption,
    Price,
}

impl Store {
    pub fn label(self) -> &'static str {
        match self {
            Store::GooglePlay => "Google Play",
            Store::AppStore => "App Store",
        }
    }

    /// Header name of the column playing `role` in this export.
    pub fn column_name(self, role: Role) -> &'static str {
        match (self, role) {
            (Store::GooglePlay, Role::Name) => "App",
            (Store::GooglePlay, Role::Category) => "Category",
            (Store::GooglePlay, Role::Genre) => "Genres",
            (Store::GooglePlay, Role::Popularity) => "Reviews",
            (Store::GooglePlay, Role::Adoption) => "Installs",
            (Store::GooglePlay, Role::Price) => "Price",
            (Store::AppStore, Role::Name) => "track_name",
            (Store::AppStore, Role::Category | Role::Genre) => "prime_genre",
            (Store::AppStore, Role::Popularity | Role::Adoption) => "rating_count_tot",
            (Store::AppStore, Role::Price) => "price",
        }
    }

    /// Literal the price column holds for a free app.
    pub fn free_price(self) -> &'static str {
        match self {
            Store::GooglePlay => "0",
            Store::AppStore => "0.0",
        }
    }

    /// How the adoption column encodes its numbers.
    pub fn adoption_kind(self) -> NumericKind {
        match self {
            Store::GooglePlay => NumericKind::Count,
            Store::AppStore => NumericKind::Decimal,
        }
    }

    /// Whether repeated listings of one app are collapsed before filtering.
    /// The App Store export is analysed with its listings as published.
    pub fn deduplicates(self) -> bool {
        matches!(self, Store::GooglePlay)
    }

    /// Data-row position of the one documented corrupt listing.
    ///
    /// The Google Play export has a row with an unescaped comma in it
    /// ("Life Made WI-Fi Touchscreen Photo Frame") which shifts every later
    /// column left by one.
    pub fn known_defect(self) -> Option<usize> {
        match self {
            Store::GooglePlay => Some(10472),
            Store::AppStore => None,
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Columns – schema descriptor resolved once from the header
// ---------------------------------------------------------------------------

/// Column positions of every [`Role`] for one loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub name: usize,
    pub category: usize,
    pub genre: usize,
    pub popularity: usize,
    pub adoption: usize,
    pub price: usize,
}

impl Columns {
    /// Locate each role's column in `header` by exact name.
    pub fn resolve(store: Store, header: &[String]) -> Result<Self, DataError> {
        let find = |role: Role| {
            let column = store.column_name(role);
            header
                .iter()
                .position(|h| h == column)
                .ok_or(DataError::MissingColumn { store, column })
        };

        Ok(Columns {
            name: find(Role::Name)?,
            category: find(Role::Category)?,
            genre: find(Role::Genre)?,
            popularity: find(Role::Popularity)?,
            adoption: find(Role::Adoption)?,
            price: find(Role::Price)?,
        })
    }

    pub fn index(&self, role: Role) -> usize {
        match role {
            Role::Name => self.name,
            Role::Category => self.category,
            Role::Genre => self.genre,
            Role::Popularity => self.popularity,
            Role::Adoption => self.adoption,
            Role::Price => self.price,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one listing
// ---------------------------------------------------------------------------

/// One row of an export, fields in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Record { fields }
    }

    /// Field at `index`, or `""` when the row is too short to have it.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Record::new(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Dataset – header, schema and rows of one export
// ---------------------------------------------------------------------------

/// A loaded export. Cleaning stages derive new datasets via
/// [`Dataset::with_records`]; none of them edit one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub store: Store,
    pub header: Vec<String>,
    pub columns: Columns,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(store: Store, header: Vec<String>, records: Vec<Record>) -> Result<Self, DataError> {
        let columns = Columns::resolve(store, &header)?;
        Ok(Dataset {
            store,
            header,
            columns,
            records,
        })
    }

    /// A dataset with the same store and schema holding `records`.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Dataset {
            store: self.store,
            header: self.header.clone(),
            columns: self.columns,
            records,
        }
    }

    /// Fail on the first row whose field count differs from the header's.
    pub fn check_arity(&self) -> Result<(), DataError> {
        let expected = self.header.len();
        match self
            .records
            .iter()
            .position(|r| r.arity() != expected)
        {
            Some(row) => Err(DataError::RaggedRow {
                store: self.store,
                row,
                found: self.records[row].arity(),
                expected,
            }),
            None => Ok(()),
        }
    }

    /// Parse the field at `column` of row `row` with the given convention,
    /// attaching row/column context on failure.
    pub fn number_at(&self, row: usize, column: usize, kind: NumericKind) -> Result<f64, DataError> {
        let raw = self.records[row].field(column);
        kind.parse(raw).map_err(|source| DataError::InvalidNumber {
            store: self.store,
            row,
            column: self.header.get(column).cloned().unwrap_or_default(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_google_play_columns() {
        let h = header(&[
            "App", "Category", "Rating", "Reviews", "Size", "Installs", "Type", "Price",
            "Content Rating", "Genres", "Last Updated", "Current Ver", "Android Ver",
        ]);
        let cols = Columns::resolve(Store::GooglePlay, &h).unwrap();
        assert_eq!(cols.name, 0);
        assert_eq!(cols.category, 1);
        assert_eq!(cols.popularity, 3);
        assert_eq!(cols.adoption, 5);
        assert_eq!(cols.price, 7);
        assert_eq!(cols.genre, 9);
    }

    #[test]
    fn app_store_shares_genre_and_rating_columns() {
        let h = header(&["id", "track_name", "price", "rating_count_tot", "prime_genre"]);
        let cols = Columns::resolve(Store::AppStore, &h).unwrap();
        assert_eq!(cols.category, cols.genre);
        assert_eq!(cols.popularity, cols.adoption);
        assert_eq!(cols.index(Role::Price), 2);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let h = header(&["App", "Category"]);
        let err = Columns::resolve(Store::GooglePlay, &h).unwrap_err();
        assert!(err.to_string().contains("'Reviews'"), "{err}");
    }

    #[test]
    fn check_arity_names_the_short_row() {
        let h = header(&["id", "track_name", "price", "rating_count_tot", "prime_genre"]);
        let rows = vec![
            Record::from_iter(["1", "A", "0.0", "5", "Games"]),
            Record::from_iter(["2", "B", "0.0", "5"]),
        ];
        let ds = Dataset::new(Store::AppStore, h, rows).unwrap();
        match ds.check_arity() {
            Err(DataError::RaggedRow { row, found, expected, .. }) => {
                assert_eq!((row, found, expected), (1, 4, 5));
            }
            other => panic!("expected ragged row, got {other:?}"),
        }
    }

    #[test]
    fn short_record_reads_missing_field_as_empty() {
        let r = Record::from_iter(["only"]);
        assert_eq!(r.field(0), "only");
        assert_eq!(r.field(3), "");
    }
}
