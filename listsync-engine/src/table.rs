//! Filtered table view.
//!
//! Loads a whole collection once and keeps a filtered + sorted projection of
//! it. The projection is recomputed in full by [`TableView::recompute`], which
//! every mutator calls; it is never patched incrementally.

use crate::feed::LoadOutcome;
use crate::ordering::{column_cmp, sort_with};
use crate::source::RemoteCollectionSource;
use listsync_types::{Record, ResourceKind, UsageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A column of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
    /// Whether the column takes a search box.
    pub searchable: bool,
}

impl Column {
    const fn new(field: &'static str, label: &'static str, searchable: bool) -> Self {
        Self {
            field,
            label,
            searchable,
        }
    }
}

/// Columns of the user table, in display order.
pub const USER_COLUMNS: &[Column] = &[
    Column::new("id", "Id", false),
    Column::new("name", "Name", true),
    Column::new("email", "Email", true),
    Column::new("username", "Username", false),
    Column::new("phone", "Phone", false),
    Column::new("website", "Website", false),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The single active sort column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Re-selecting the active column flips the direction; any other column
    /// becomes active in ascending order.
    pub fn select(&mut self, column: &str) {
        if self.column == column {
            self.direction = self.direction.toggled();
        } else {
            self.column = column.to_string();
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Current search text per searchable field. Empty text means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    values: BTreeMap<&'static str, String>,
}

impl SearchState {
    /// One empty entry per searchable column.
    pub fn for_columns(columns: &[Column]) -> Self {
        Self {
            values: columns
                .iter()
                .filter(|c| c.searchable)
                .map(|c| (c.field, String::new()))
                .collect(),
        }
    }

    /// Stores the search text for `field` as given. Case is preserved here and
    /// ignored when filtering.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), UsageError> {
        let slot = self
            .values
            .get_mut(field)
            .ok_or_else(|| UsageError::UnknownSearchField(field.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// The search text for `field`, or `None` if it is not searchable.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Non-empty search terms, already case-folded.
    fn active_terms(&self) -> Vec<(&'static str, String)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(f, v)| (*f, v.to_lowercase()))
            .collect()
    }
}

/// Text a field contributes to substring search.
fn search_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Filters and sorts `raw` into a fresh projection.
///
/// A record is kept when, for every non-empty search term, the case-folded
/// text of its field contains the case-folded term.
pub fn derive_view(raw: &[Record], search: &SearchState, sort: &SortState) -> Vec<Record> {
    let terms = search.active_terms();
    let mut view: Vec<Record> = raw
        .iter()
        .filter(|record| {
            terms.iter().all(|(field, term)| {
                search_text(record.get(field))
                    .to_lowercase()
                    .contains(term.as_str())
            })
        })
        .cloned()
        .collect();

    let column = sort.column.as_str();
    sort_with(&mut view, |a, b| {
        column_cmp(a.get(column), b.get(column), sort.direction)
    });
    view
}

/// A fully loaded collection with a search + sort projection.
pub struct TableView {
    source: Arc<dyn RemoteCollectionSource>,
    resource: ResourceKind,
    columns: &'static [Column],
    raw: Vec<Record>,
    search: SearchState,
    sort: SortState,
    view: Vec<Record>,
}

impl TableView {
    /// A user table over [`USER_COLUMNS`].
    pub fn users(source: Arc<dyn RemoteCollectionSource>) -> Self {
        Self::new(source, ResourceKind::Users, USER_COLUMNS)
    }

    /// A table over any resource. Sorting starts on the first column.
    pub fn new(
        source: Arc<dyn RemoteCollectionSource>,
        resource: ResourceKind,
        columns: &'static [Column],
    ) -> Self {
        let first = columns.first().map_or("id", |c| c.field);
        Self {
            source,
            resource,
            columns,
            raw: Vec::new(),
            search: SearchState::for_columns(columns),
            sort: SortState::ascending(first),
            view: Vec::new(),
        }
    }

    /// Fetches the whole collection. On failure the previous raw collection
    /// (empty before the first successful load) is kept.
    pub async fn load(&mut self) -> LoadOutcome {
        debug!(resource = %self.resource, "fetching full collection");
        let outcome = match self.source.fetch_all(self.resource).await {
            Ok(records) => {
                let received = records.len();
                self.raw = records;
                LoadOutcome::Loaded { received }
            }
            Err(e) => {
                warn!(resource = %self.resource, error = %e, "failed to load collection");
                LoadOutcome::Failed
            }
        };
        self.recompute();
        outcome
    }

    /// Sets the search text for a searchable field and recomputes.
    pub fn set_search(&mut self, field: &str, value: impl Into<String>) -> Result<(), UsageError> {
        self.search.set(field, value)?;
        self.recompute();
        Ok(())
    }

    /// Selects or flips the sort column and recomputes.
    pub fn set_sort(&mut self, column: &str) {
        self.sort.select(column);
        self.recompute();
    }

    /// Rebuilds the projection from the raw collection and current state.
    pub fn recompute(&mut self) {
        self.view = derive_view(&self.raw, &self.search, &self.sort);
    }

    pub fn view(&self) -> &[Record] {
        &self.view
    }

    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn sort_column(&self) -> &str {
        &self.sort.column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.direction
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn search_value(&self, field: &str) -> Option<&str> {
        self.search.get(field)
    }

    /// Size of the unfiltered collection.
    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }
}
