use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Dimension, Metric, SalesRecord};

// ---------------------------------------------------------------------------
// ChartShape – which reduction a chart needs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartShape {
    /// One point per row: order date against `metric`.
    TimeSeries { metric: Metric },
    /// `dimension -> sum(metric)`.
    GroupSum { dimension: Dimension, metric: Metric },
    /// Two-level `outer -> inner -> sum(metric)` (sunburst).
    Hierarchy {
        outer: Dimension,
        inner: Dimension,
        metric: Metric,
    },
}

// ---------------------------------------------------------------------------
// ChartResult – rendering-agnostic chart data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTree {
    pub label: String,
    /// Sum of `children` values.
    pub value: f64,
    pub children: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartResult {
    TimeSeries { points: Vec<Point> },
    Aggregate { groups: Vec<Group> },
    Hierarchy { groups: Vec<GroupTree> },
}

impl ChartResult {
    /// A chart of the given shape with nothing in it.
    pub fn empty(shape: &ChartShape) -> Self {
        match shape {
            ChartShape::TimeSeries { .. } => ChartResult::TimeSeries { points: Vec::new() },
            ChartShape::GroupSum { .. } => ChartResult::Aggregate { groups: Vec::new() },
            ChartShape::Hierarchy { .. } => ChartResult::Hierarchy { groups: Vec::new() },
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartResult::TimeSeries { points } => points.is_empty(),
            ChartResult::Aggregate { groups } => groups.is_empty(),
            ChartResult::Hierarchy { groups } => groups.is_empty(),
        }
    }

    /// Sum of every value in the chart.
    pub fn total(&self) -> f64 {
        match self {
            ChartResult::TimeSeries { points } => points.iter().map(|p| p.value).sum(),
            ChartResult::Aggregate { groups } => groups.iter().map(|g| g.value).sum(),
            ChartResult::Hierarchy { groups } => groups.iter().map(|g| g.value).sum(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Reduce already-filtered rows to the requested shape.
pub fn reduce<'a, I>(rows: I, shape: &ChartShape) -> ChartResult
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    match *shape {
        ChartShape::TimeSeries { metric } => ChartResult::TimeSeries {
            points: time_series(rows, metric),
        },
        ChartShape::GroupSum { dimension, metric } => ChartResult::Aggregate {
            groups: group_sum(rows, dimension, metric),
        },
        ChartShape::Hierarchy {
            outer,
            inner,
            metric,
        } => ChartResult::Hierarchy {
            groups: hierarchy(rows, outer, inner, metric),
        },
    }
}

/// Raw rows in input order; same-day rows are not merged.
pub fn time_series<'a, I>(rows: I, metric: Metric) -> Vec<Point>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    rows.into_iter()
        .map(|r| Point {
            date: r.order_date,
            value: r.metric(metric),
        })
        .collect()
}

/// Sum `metric` per distinct `dimension` value, sorted by label.
pub fn group_sum<'a, I>(rows: I, dimension: Dimension, metric: Metric) -> Vec<Group>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for r in rows {
        *sums.entry(r.dimension(dimension)).or_default() += r.metric(metric);
    }
    sums.into_iter()
        .map(|(label, value)| Group {
            label: label.to_string(),
            value,
        })
        .collect()
}

pub fn hierarchy<'a, I>(rows: I, outer: Dimension, inner: Dimension, metric: Metric) -> Vec<GroupTree>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut tree: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for r in rows {
        *tree
            .entry(r.dimension(outer))
            .or_default()
            .entry(r.dimension(inner))
            .or_default() += r.metric(metric);
    }
    tree.into_iter()
        .map(|(label, children)| {
            let children: Vec<Group> = children
                .into_iter()
                .map(|(label, value)| Group {
                    label: label.to_string(),
                    value,
                })
                .collect();
            GroupTree {
                label: label.to_string(),
                value: children.iter().map(|c| c.value).sum(),
                children,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn rows() -> Vec<SalesRecord> {
        vec![
            record((2017, 1, 2), "West", "Snacks", 100.0),
            record((2017, 1, 2), "East", "Bakery", 40.0),
            record((2016, 5, 9), "West", "Bakery", 60.0),
        ]
    }

    #[test]
    fn time_series_keeps_row_order_and_duplicates_dates() {
        let pts = time_series(&rows(), Metric::Sales);
        let values: Vec<f64> = pts.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![100.0, 40.0, 60.0]);
        assert_eq!(pts[0].date, pts[1].date);
    }

    #[test]
    fn group_sum_is_sorted_by_label() {
        let groups = group_sum(&rows(), Dimension::Category, Metric::Sales);
        assert_eq!(
            groups,
            vec![
                Group { label: "Bakery".into(), value: 100.0 },
                Group { label: "Snacks".into(), value: 100.0 },
            ]
        );
    }

    #[test]
    fn hierarchy_parent_equals_children_sum() {
        let tree = hierarchy(&rows(), Dimension::Region, Dimension::Category, Metric::Profit);
        assert_eq!(tree.len(), 2);
        let west = &tree[1];
        assert_eq!(west.label, "West");
        assert_eq!(west.children.len(), 2);
        let child_sum: f64 = west.children.iter().map(|c| c.value).sum();
        assert_eq!(west.value, child_sum);
        assert_eq!(west.value, 16.0);
    }

    #[test]
    fn empty_rows_give_empty_chart_of_shape() {
        let shape = ChartShape::GroupSum {
            dimension: Dimension::Region,
            metric: Metric::Sales,
        };
        let none: Vec<SalesRecord> = Vec::new();
        let chart = reduce(&none, &shape);
        assert_eq!(chart, ChartResult::empty(&shape));
        assert!(chart.is_empty());
        assert_eq!(chart.total(), 0.0);
    }

    #[test]
    fn serialises_with_kind_tag() {
        let chart = ChartResult::Aggregate {
            groups: vec![Group { label: "East".into(), value: 2.5 }],
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "aggregate");
        assert_eq!(json["groups"][0]["label"], "East");

        let series = ChartResult::TimeSeries { points: Vec::new() };
        assert_eq!(serde_json::to_value(&series).unwrap()["kind"], "timeseries");
    }
}
