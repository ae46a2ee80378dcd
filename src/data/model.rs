use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dimension / Metric – the columns charts group by and sum over
// ---------------------------------------------------------------------------

/// A categorical column of the sales table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Region,
    City,
    Category,
}

/// A numeric column of the sales table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Sales,
    Profit,
}

impl Metric {
    /// Column header as it appears in the source file.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Profit => "Profit",
        }
    }
}

// ---------------------------------------------------------------------------
// YearRange – inclusive bound on the order year
// ---------------------------------------------------------------------------

/// Inclusive `(min, max)` range of order years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        YearRange { min, max }
    }

    /// A range covering a single year.
    pub fn single(year: i32) -> Self {
        YearRange { min: year, max: year }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Widen the range so it also covers `year`.
    fn extend(self, year: i32) -> Self {
        YearRange {
            min: self.min.min(year),
            max: self.max.max(year),
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the sales table
// ---------------------------------------------------------------------------

/// A single order line. `State` and `Order ID` from the source file are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_date: NaiveDate,
    pub region: String,
    pub city: String,
    pub category: String,
    pub sales: f64,
    pub profit: f64,
}

impl SalesRecord {
    pub fn year(&self) -> i32 {
        self.order_date.year()
    }

    pub fn dimension(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Region => &self.region,
            Dimension::City => &self.city,
            Dimension::Category => &self.category,
        }
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sales => self.sales,
            Metric::Profit => self.profit,
        }
    }

    /// Identity used for duplicate removal. Floats compare bitwise.
    fn dedup_key(&self) -> (NaiveDate, &str, &str, &str, u64, u64) {
        (
            self.order_date,
            &self.region,
            &self.city,
            &self.category,
            self.sales.to_bits(),
            self.profit.to_bits(),
        )
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded, de-duplicated sales table with pre-computed column indices.
/// Never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All records in file order.
    pub records: Vec<SalesRecord>,
    /// Unique categories in first-appearance order.
    pub categories: Vec<String>,
    /// Unique regions in first-appearance order.
    pub regions: Vec<String>,
    /// Smallest range covering every order year (None when empty).
    pub year_bounds: Option<YearRange>,
}

impl SalesDataset {
    /// Build the dataset, dropping exact duplicate records (first one wins).
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut unique: Vec<SalesRecord> = Vec::with_capacity(records.len());
        let mut seen = HashSet::with_capacity(records.len());
        for rec in &records {
            if seen.insert(rec.dedup_key()) {
                unique.push(rec.clone());
            }
        }
        let dropped = records.len() - unique.len();
        if dropped > 0 {
            log::debug!("Dropped {dropped} duplicate records");
        }

        let mut categories: Vec<String> = Vec::new();
        let mut regions: Vec<String> = Vec::new();
        let mut year_bounds: Option<YearRange> = None;

        for rec in &unique {
            if !categories.contains(&rec.category) {
                categories.push(rec.category.clone());
            }
            if !regions.contains(&rec.region) {
                regions.push(rec.region.clone());
            }
            let year = rec.year();
            year_bounds = Some(match year_bounds {
                Some(range) => range.extend(year),
                None => YearRange::single(year),
            });
        }

        SalesDataset {
            records: unique,
            categories,
            regions,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Test helper: a record whose city and profit are derived from the other fields.
#[cfg(test)]
pub(crate) fn record(date: (i32, u32, u32), region: &str, category: &str, sales: f64) -> SalesRecord {
    SalesRecord {
        order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        region: region.to_string(),
        city: format!("{region} City"),
        category: category.to_string(),
        sales,
        profit: sales / 10.0,
    }
}
