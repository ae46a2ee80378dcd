use serde::{Deserialize, Serialize};

use super::aggregate::{ChartResult, ChartShape, reduce};
use super::model::{SalesDataset, SalesRecord, YearRange};

// ---------------------------------------------------------------------------
// Filter selection: what the user picked in the side panel
// ---------------------------------------------------------------------------

/// Current control values. An unset category or region means "no constraint";
/// the year range always applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub category: Option<String>,
    pub region: Option<String>,
    pub year_range: YearRange,
}

impl FilterSelection {
    /// The controls' starting values: first category, any region, every year.
    pub fn initial(dataset: &SalesDataset) -> Self {
        FilterSelection {
            category: dataset.categories.first().cloned(),
            ..Self::everything(dataset)
        }
    }

    /// A selection that lets every record of `dataset` through.
    pub fn everything(dataset: &SalesDataset) -> Self {
        FilterSelection {
            category: None,
            region: None,
            year_range: dataset.year_bounds.unwrap_or(YearRange::new(i32::MIN, i32::MAX)),
        }
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(category) = &self.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if record.region != *region {
                return false;
            }
        }
        self.year_range.contains(record.year())
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Indices of records passing `selection`, in dataset order.
pub fn filtered_indices(dataset: &SalesDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Records passing `selection`, in dataset order.
pub fn filtered_records<'a>(
    dataset: &'a SalesDataset,
    selection: &'a FilterSelection,
) -> impl Iterator<Item = &'a SalesRecord> + 'a {
    dataset.records.iter().filter(move |rec| selection.matches(rec))
}

/// Filter `dataset` by `selection` and reduce the surviving rows to `shape`.
/// Pure: the result depends on the arguments only. No matches gives an
/// empty chart.
pub fn filter_and_aggregate(
    dataset: &SalesDataset,
    selection: &FilterSelection,
    shape: &ChartShape,
) -> ChartResult {
    reduce(filtered_records(dataset, selection), shape)
}
