use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic Supermart-style sales table (.csv or .parquet).
#[derive(Debug, Parser)]
struct Args {
    /// Output file; the extension picks the format.
    #[arg(default_value = "sample_sales.csv")]
    output: PathBuf,

    /// Number of order lines.
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const REGIONS: [(&str, &[&str]); 5] = [
    ("North", &["Vellore", "Salem", "Theni"]),
    ("South", &["Krishnagiri", "Ooty", "Viluppuram"]),
    ("East", &["Kanyakumari", "Bodi", "Tenkasi"]),
    ("West", &["Perambalur", "Dharmapuri", "Chennai"]),
    ("Central", &["Karur", "Madurai", "Dindigul"]),
];

/// Category with its typical order value.
const CATEGORIES: [(&str, f64); 7] = [
    ("Oil & Masala", 1400.0),
    ("Beverages", 1100.0),
    ("Food Grains", 1900.0),
    ("Fruits & Veggies", 1200.0),
    ("Bakery", 1000.0),
    ("Snacks", 900.0),
    ("Eggs Meat & Fish", 1700.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    order_id: String,
    order_date: NaiveDate,
    region: &'static str,
    city: &'static str,
    category: &'static str,
    sales: f64,
    profit: f64,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let first_day = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default();
    let span_days = 4 * 365;

    (0..rows)
        .map(|i| {
            let (region, cities) = REGIONS[rng.below(REGIONS.len())];
            let city = cities[rng.below(cities.len())];
            let (category, typical) = CATEGORIES[rng.below(CATEGORIES.len())];
            let sales = rng.gauss(typical, typical * 0.35).max(500.0).round();
            let margin = rng.gauss(0.25, 0.12).clamp(0.05, 0.45);
            Row {
                order_id: format!("OD{}", i + 1),
                order_date: first_day + Duration::days(rng.below(span_days) as i64),
                region,
                city,
                category,
                sales,
                profit: (sales * margin * 100.0).round() / 100.0,
            }
        })
        .collect()
}

/// CSV in the source dataset's layout, with `M/D/YYYY` dates.
fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Order ID", "Category", "City", "Order Date", "Region", "Sales", "Profit", "State"])?;
    for r in rows {
        let date = r.order_date.format("%-m/%-d/%Y").to_string();
        let sales = r.sales.to_string();
        let profit = r.profit.to_string();
        writer.write_record([
            r.order_id.as_str(),
            r.category,
            r.city,
            date.as_str(),
            r.region,
            sales.as_str(),
            profit.as_str(),
            "Tamil Nadu",
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let schema = Arc::new(Schema::new(vec![
        Field::new("Order ID", DataType::Utf8, false),
        Field::new("Order Date", DataType::Date32, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Sales", DataType::Float64, false),
        Field::new("Profit", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.order_id.as_str()))),
            Arc::new(Date32Array::from_iter_values(
                rows.iter().map(|r| (r.order_date - epoch).num_days() as i32),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.region))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.city))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.sales))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.profit))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let rows = generate(args.rows, &mut rng);

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &rows)?,
        "parquet" | "pq" => write_parquet(&args.output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} order lines to {}", rows.len(), args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_rows() {
        let a = generate(50, &mut SimpleRng::new(7));
        let b = generate(50, &mut SimpleRng::new(7));
        assert!(a.iter().zip(&b).all(|(x, y)| x.order_date == y.order_date && x.sales == y.sales));
        assert!(a.iter().all(|r| r.sales >= 500.0 && r.profit > 0.0));
    }

    #[test]
    fn csv_has_dashboard_columns_and_readable_dates() {
        let rows = generate(40, &mut SimpleRng::new(42));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        write_csv(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        for name in ["Order Date", "Region", "City", "Category", "Sales", "Profit"] {
            assert!(headers.iter().any(|h| h == name), "missing column {name}");
        }
        let date_col = headers.iter().position(|h| h == "Order Date").unwrap();

        let first_day = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let mut count = 0;
        for (record, row) in reader.records().zip(&rows) {
            let record = record.unwrap();
            let date = NaiveDate::parse_from_str(&record[date_col], "%m/%d/%Y").unwrap();
            assert_eq!(date, row.order_date);
            assert!(date >= first_day);
            count += 1;
        }
        assert_eq!(count, rows.len());
    }
}
