use anyhow::{Context, Result};

use super::loader::read_csv;
use super::model::SalesDataset;

/// A small slice of the Supermart grocery table, kept in the binary so the
/// dashboard has something to show before a file is opened. It keeps the
/// source's quirks: mixed date layouts, extra columns and one duplicate row.
const SAMPLE_CSV: &str = "\
Order ID,Customer Name,Category,Sub Category,City,Order Date,Region,Sales,Discount,Profit,State
OD1,Harish,Oil & Masala,Masalas,Vellore,11-08-2017,North,1254,0.12,401.28,Tamil Nadu
OD2,Sudha,Beverages,Health Drinks,Krishnagiri,11-08-2017,South,749,0.18,149.8,Tamil Nadu
OD3,Hussain,Food Grains,Atta & Flour,Perambalur,06-12-2017,West,2360,0.21,165.2,Tamil Nadu
OD4,Jackson,Fruits & Veggies,Fresh Vegetables,Dharmapuri,10-11-2016,South,896,0.25,89.6,Tamil Nadu
OD5,Ridhesh,Food Grains,Organic Staples,Ooty,10-11-2016,South,2355,0.26,918.45,Tamil Nadu
OD6,Adavan,Food Grains,Organic Staples,Dharmapuri,06-09-2015,West,2305,0.26,322.7,Tamil Nadu
OD7,Jonas,Fruits & Veggies,Fresh Vegetables,Trichy,06-09-2015,West,826,0.33,346.92,Tamil Nadu
OD8,Hafiz,Fruits & Veggies,Fresh Fruits,Ramanadhapuram,06-09-2015,West,1847,0.32,147.76,Tamil Nadu
OD9,Hafiz,Bakery,Biscuits,Tirunelveli,06-09-2015,West,791,0.23,181.93,Tamil Nadu
OD10,Krithika,Bakery,Cakes,Chennai,06-09-2015,West,1795,0.27,484.65,Tamil Nadu
OD11,Ganesh,Snacks,Chocolates,Karur,4/15/2018,Central,701,0.16,35.05,Tamil Nadu
OD12,Yadav,Eggs Meat & Fish,Mutton,Namakkal,12/5/2018,West,1880,0.22,658,Tamil Nadu
OD13,Sharon,Snacks,Cookies,Dindigul,8/17/2016,Central,1358,0.26,495.2,Tamil Nadu
OD14,Peer,Beverages,Soft Drinks,Kanyakumari,3/2/2017,East,1421,0.15,213.15,Tamil Nadu
OD15,Sundar,Oil & Masala,Edible Oil & Ghee,Bodi,9/24/2016,East,1660,0.23,99.6,Tamil Nadu
OD16,Ramesh,Snacks,Noodles,Tenkasi,1/30/2017,East,585,0.17,40.95,Tamil Nadu
OD17,Alan,Eggs Meat & Fish,Chicken,Vellore,7/11/2015,North,2221,0.31,999.45,Tamil Nadu
OD18,Arutra,Bakery,Breads & Buns,Madurai,2018-03-14,Central,1193,0.2,322.11,Tamil Nadu
OD19,Haseena,Snacks,Chocolates,Salem,2018-10-22,North,1911,0.1,152.88,Tamil Nadu
OD20,Verma,Beverages,Health Drinks,Cumbum,2015-11-03,Central,1003,0.19,270.81,Tamil Nadu
OD21,Muneer,Food Grains,Rice,Theni,2016-05-27,North,1575,0.29,346.5,Tamil Nadu
OD22,Veronica,Fruits & Veggies,Organic Fruits,Viluppuram,2017-07-08,South,1390,0.2,417,Tamil Nadu
OD23,Ganesh,Snacks,Chocolates,Karur,4/15/2018,Central,701,0.16,35.05,Tamil Nadu
";

/// Parse the bundled sample table.
pub fn sample_dataset() -> Result<SalesDataset> {
    let records = read_csv(SAMPLE_CSV.as_bytes()).context("parsing bundled sample")?;
    let dataset = SalesDataset::from_records(records);
    log::info!("Using bundled sample with {} records", dataset.len());
    Ok(dataset)
}
