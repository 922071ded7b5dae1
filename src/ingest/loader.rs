use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;

use crate::model::{Dataset, ItemRecord};

const COL_ITEM: &str = "Item";
const COL_SHOP_ID: &str = "Shop_ID";
const COL_PROFIT_MARGIN: &str = "Profit_Margin";
const COL_DEMAND_SCORE: &str = "Demand_Score";
const COL_STOCK_LEVEL: &str = "Stock_Level";
const COL_STOCK_TO_SALES: &str = "Stock_to_Sales_Ratio";
const COL_SALES_COUNT: &str = "Sales_Count";

/// Every header with one of these prefixes becomes a dynamic flag column
/// keyed by the remainder of the header name.
const CATEGORY_PREFIX: &str = "Category_";
const LOCATION_PREFIX: &str = "Location_";

/// A row-level error encountered during ingest. Bad rows are skipped and
/// reported; only a broken schema aborts the load.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// The loaded dataset plus whatever rows had to be skipped.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: Dataset,
    pub skipped: Vec<RowError>,
}

/// Resolved column positions for one CSV header row.
struct Columns {
    item: usize,
    shop_id: usize,
    profit_margin: usize,
    demand_score: usize,
    stock_level: usize,
    stock_to_sales: usize,
    sales_count: usize,
    categories: Vec<(String, usize)>,
    locations: Vec<(String, usize)>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("dataset is missing required column '{}'", name))
        };

        let mut categories = Vec::new();
        let mut locations = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(name) = header.strip_prefix(CATEGORY_PREFIX) {
                categories.push((name.to_string(), idx));
            } else if let Some(name) = header.strip_prefix(LOCATION_PREFIX) {
                locations.push((name.to_string(), idx));
            }
        }

        Ok(Self {
            item: position(COL_ITEM)?,
            shop_id: position(COL_SHOP_ID)?,
            profit_margin: position(COL_PROFIT_MARGIN)?,
            demand_score: position(COL_DEMAND_SCORE)?,
            stock_level: position(COL_STOCK_LEVEL)?,
            stock_to_sales: position(COL_STOCK_TO_SALES)?,
            sales_count: position(COL_SALES_COUNT)?,
            categories,
            locations,
        })
    }
}

/// Load and normalize the recommendation dataset from a CSV file.
///
/// Item names are trimmed and lowercased here, once; queries rely on that and
/// apply no further normalization. Flag cells are coerced to booleans before
/// any location filter can run.
pub fn load_dataset(path: &Path) -> Result<LoadReport> {
    let file =
        File::open(path).with_context(|| format!("failed to open dataset '{}'", path.display()))?;
    load_from_reader(file)
}

/// Load the dataset from any CSV source.
pub fn load_from_reader<R: std::io::Read>(source: R) -> Result<LoadReport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // Line numbers are 1-based and the header occupies line 1.
        let line = i + 2;
        match row {
            Ok(row) => match parse_row(&columns, &row) {
                Ok(record) => records.push(record),
                Err(e) => skipped.push(RowError {
                    line,
                    message: e.to_string(),
                }),
            },
            Err(e) => skipped.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    let categories: BTreeSet<String> = columns.categories.iter().map(|(n, _)| n.clone()).collect();
    let locations: BTreeSet<String> = columns.locations.iter().map(|(n, _)| n.clone()).collect();

    Ok(LoadReport {
        dataset: Dataset::new(records, categories, locations),
        skipped,
    })
}

fn parse_row(columns: &Columns, row: &StringRecord) -> Result<ItemRecord> {
    let field = |idx: usize| row.get(idx).unwrap_or("");
    let number = |idx: usize, name: &str| -> Result<f64> {
        field(idx)
            .parse::<f64>()
            .with_context(|| format!("invalid number in column '{}': '{}'", name, field(idx)))
    };

    let item_name = field(columns.item).trim().to_lowercase();
    if item_name.is_empty() {
        bail!("empty item name");
    }

    let mut category_flags = HashMap::new();
    for (name, idx) in &columns.categories {
        category_flags.insert(name.clone(), parse_flag(field(*idx))?);
    }
    let mut location_flags = HashMap::new();
    for (name, idx) in &columns.locations {
        location_flags.insert(name.clone(), parse_flag(field(*idx))?);
    }

    Ok(ItemRecord {
        item_name,
        shop_id: field(columns.shop_id).to_string(),
        category_flags,
        location_flags,
        profit_margin: number(columns.profit_margin, COL_PROFIT_MARGIN)?,
        demand_score: number(columns.demand_score, COL_DEMAND_SCORE)?,
        stock_level: number(columns.stock_level, COL_STOCK_LEVEL)?,
        stock_to_sales_ratio: number(columns.stock_to_sales, COL_STOCK_TO_SALES)?,
        sales_count: number(columns.sales_count, COL_SALES_COUNT)?,
    })
}

/// Coerce one flag cell to a boolean.
///
/// Accepts the usual textual spellings plus numeric cells, where any non-zero
/// value is true (the source table stores these as 0/1 or True/False
/// depending on the export). Already-boolean input maps to itself, so the
/// coercion is idempotent. An empty cell reads as false.
fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "false" | "f" | "no" | "n" => Ok(false),
        "true" | "t" | "yes" | "y" => Ok(true),
        other => match other.parse::<f64>() {
            Ok(v) => Ok(v != 0.0),
            Err(_) => bail!("invalid boolean flag value '{}'", raw),
        },
    }
}
