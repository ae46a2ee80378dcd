use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, StringArray};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{SalesDataset, SalesRecord};
use super::parse::{parse_amount, parse_label, parse_order_date};

/// Columns every input must provide, in the order [`record_from_fields`] expects.
/// Anything else (`State`, `Order ID`, ...) is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Order Date", "Region", "City", "Category", "Sales", "Profit"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row containing at least [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "Order Date": "...", "Region": "...", ... }, ...]`
/// * `.parquet` – the same column names; strings, numbers or `Date32`
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = SalesDataset::from_records(records);
    log::info!(
        "Loaded {} records from {} ({} categories, {} regions)",
        dataset.len(),
        path.display(),
        dataset.categories.len(),
        dataset.regions.len()
    );
    Ok(dataset)
}

/// Turn the six required fields of one row into a record.
/// `row` is 1-based and only used for error messages.
fn record_from_fields(fields: [&str; 6], row: usize) -> Result<SalesRecord> {
    let [date, region, city, category, sales, profit] = fields;
    let ctx = |col: &str| format!("row {row}, column '{col}'");

    Ok(SalesRecord {
        order_date: parse_order_date(date).with_context(|| ctx(REQUIRED_COLUMNS[0]))?,
        region: parse_label(region).with_context(|| ctx(REQUIRED_COLUMNS[1]))?,
        city: parse_label(city).with_context(|| ctx(REQUIRED_COLUMNS[2]))?,
        category: parse_label(category).with_context(|| ctx(REQUIRED_COLUMNS[3]))?,
        sales: parse_amount(sales).with_context(|| ctx(REQUIRED_COLUMNS[4]))?,
        profit: parse_amount(profit).with_context(|| ctx(REQUIRED_COLUMNS[5]))?,
    })
}

/// Positions of the required columns inside a header row.
fn locate_columns<S: AsRef<str>>(headers: &[S], source: &str) -> Result<[usize; 6]> {
    let mut idx = [0usize; 6];
    for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.as_ref().trim() == name)
            .with_context(|| format!("{source} missing '{name}' column"))?;
    }
    Ok(idx)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text. Any reader works so the bundled sample can share this path.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<SalesRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let idx = locate_columns(&headers, "CSV")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let fields = idx.map(|i| record.get(i).unwrap_or(""));
        records.push(record_from_fields(fields, row)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Order Date": "11-08-2017", "Region": "North", "City": "Vellore",
///     "Category": "Oil & Masala", "Sales": 1254, "Profit": 401.28 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<SalesRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        let cells = REQUIRED_COLUMNS.map(|col| obj.get(col).map(json_to_text).unwrap_or_default());
        records.push(record_from_fields(cells.each_ref().map(String::as_str), row)?);
    }
    Ok(records)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the [`REQUIRED_COLUMNS`].
///
/// Text, integer, float and `Date32` columns are all accepted; every cell goes
/// through the same field parsers as CSV input.
fn load_parquet(path: &Path) -> Result<Vec<SalesRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let idx = locate_columns(&names, "Parquet file")?;

        for row in 0..batch.num_rows() {
            let line = records.len() + 1;
            let mut cells: [String; 6] = Default::default();
            for (cell, &col) in cells.iter_mut().zip(idx.iter()) {
                *cell = cell_to_text(batch.column(col), row)
                    .with_context(|| format!("Row {line}: failed to read column {col}"))?;
            }
            records.push(record_from_fields(cells.each_ref().map(String::as_str), line)?);
        }
    }

    Ok(records)
}

/// Render one Arrow cell as text. Nulls become empty strings so the field
/// parsers report them as missing.
fn cell_to_text(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
        return Ok(s.value(row).to_string());
    }
    array_value_to_string(col.as_ref(), row).context("formatting arrow value")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;

    const HEADER: &str = "Order ID,Customer Name,Category,Sub Category,City,Order Date,Region,Sales,Discount,Profit,State";

    fn write_temp(ext: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_drops_extra_columns_and_duplicates() {
        let body = format!(
            "{HEADER}\n\
             OD1,Harish,Oil & Masala,Masalas,Vellore,11-08-2017,North,1254,0.12,401.28,Tamil Nadu\n\
             OD2,Sudha,Beverages,Health Drinks,Krishnagiri,6/12/2015,South,749,0.18,149.8,Tamil Nadu\n\
             OD3,Harish,Oil & Masala,Masalas,Vellore,11-08-2017,North,1254,0.12,401.28,Tamil Nadu\n"
        );
        let file = write_temp("csv", &body);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2017, 11, 8).unwrap());
        assert_eq!(first.region, "North");
        assert_eq!(first.city, "Vellore");
        assert_eq!(first.category, "Oil & Masala");
        assert_eq!(first.sales, 1254.0);
        assert_eq!(first.profit, 401.28);
        assert_eq!(ds.categories, vec!["Oil & Masala", "Beverages"]);
    }

    #[test]
    fn csv_bad_date_fails_the_load_with_row_context() {
        let body = format!(
            "{HEADER}\n\
             OD1,Harish,Snacks,Chips,Vellore,11-08-2017,North,10,0.1,1,TN\n\
             OD2,Sudha,Snacks,Chips,Vellore,not-a-date,North,10,0.1,1,TN\n"
        );
        let file = write_temp("csv", &body);
        let err = load_file(file.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 2"), "{msg}");
        assert!(msg.contains("Order Date"), "{msg}");
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let file = write_temp("csv", "Order Date,Region,City,Category,Sales\n01-01-2017,East,A,B,1\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("missing 'Profit' column"));
    }

    #[test]
    fn json_records_accept_numbers_and_strings() {
        let body = r#"[
            {"Order Date": "2017-11-08", "Region": "North", "City": "Vellore",
             "Category": "Snacks", "Sales": 100, "Profit": "12.5", "State": "TN"}
        ]"#;
        let file = write_temp("json", body);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].sales, 100.0);
        assert_eq!(ds.records[0].profit, 12.5);
    }

    #[test]
    fn json_null_profit_is_missing() {
        let body = r#"[{"Order Date": "2017-11-08", "Region": "North", "City": "Vellore",
                        "Category": "Snacks", "Sales": 100, "Profit": null}]"#;
        let file = write_temp("json", body);
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("missing value"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = write_temp("xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn parquet_round_trips_through_arrow() {
        use arrow::array::{Date32Array, Float64Array};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Order Date", DataType::Date32, false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("City", DataType::Utf8, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Sales", DataType::Float64, false),
            Field::new("Profit", DataType::Float64, false),
        ]));
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let day = (NaiveDate::from_ymd_opt(2018, 5, 20).unwrap() - epoch).num_days() as i32;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![day])),
                Arc::new(StringArray::from(vec!["West"])),
                Arc::new(StringArray::from(vec!["Ooty"])),
                Arc::new(StringArray::from(vec!["Bakery"])),
                Arc::new(Float64Array::from(vec![250.5])),
                Arc::new(Float64Array::from(vec![-3.0])),
            ],
        )
        .unwrap();

        let file = write_temp("parquet", "");
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.order_date, NaiveDate::from_ymd_opt(2018, 5, 20).unwrap());
        assert_eq!(rec.city, "Ooty");
        assert_eq!(rec.sales, 250.5);
        assert_eq!(rec.profit, -3.0);
    }
}
