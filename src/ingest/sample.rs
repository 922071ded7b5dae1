use std::collections::{BTreeSet, HashMap};

use crate::model::{Dataset, ItemRecord};

/// Helper to build one sample record with the demo schema's flag columns.
#[allow(clippy::too_many_arguments)]
fn sample_record(
    item_name: &str,
    shop_id: &str,
    categories: &[&str],
    locations: &[&str],
    profit_margin: f64,
    demand_score: f64,
    stock_level: f64,
    stock_to_sales_ratio: f64,
    sales_count: f64,
) -> ItemRecord {
    let category_flags: HashMap<String, bool> = SAMPLE_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), categories.contains(c)))
        .collect();
    let location_flags: HashMap<String, bool> = SAMPLE_LOCATIONS
        .iter()
        .map(|l| (l.to_string(), locations.contains(l)))
        .collect();
    ItemRecord {
        item_name: item_name.to_string(),
        shop_id: shop_id.to_string(),
        category_flags,
        location_flags,
        profit_margin,
        demand_score,
        stock_level,
        stock_to_sales_ratio,
        sales_count,
    }
}

const SAMPLE_CATEGORIES: [&str; 3] = ["Electronics", "Grocery", "Clothing"];
const SAMPLE_LOCATIONS: [&str; 3] = ["Delhi", "Mumbai", "Chennai"];

/// Small built-in dataset for demos and local development, used when no CSV
/// is available (gated by the LOAD_SAMPLE_DATA environment variable).
pub fn sample_dataset() -> Dataset {
    let records = vec![
        sample_record(
            "smartphone",
            "S1",
            &["Electronics"],
            &["Delhi", "Mumbai"],
            22.0,
            85.0,
            35.0,
            0.3,
            540.0,
        ),
        sample_record(
            "usb charger",
            "S1",
            &["Electronics"],
            &["Delhi"],
            9.5,
            60.0,
            80.0,
            0.8,
            310.0,
        ),
        sample_record(
            "rice 5kg",
            "S1",
            &["Grocery"],
            &["Delhi", "Chennai"],
            4.0,
            70.0,
            55.0,
            0.4,
            900.0,
        ),
        sample_record(
            "t-shirt",
            "S1",
            &["Clothing"],
            &["Mumbai"],
            12.0,
            45.0,
            65.0,
            1.1,
            150.0,
        ),
        sample_record(
            "smartphone",
            "S2",
            &["Electronics"],
            &["Chennai"],
            20.0,
            80.0,
            25.0,
            0.25,
            480.0,
        ),
        sample_record(
            "rice 5kg",
            "S2",
            &["Grocery"],
            &["Delhi"],
            3.5,
            75.0,
            40.0,
            0.35,
            860.0,
        ),
        sample_record(
            "detergent",
            "S2",
            &["Grocery"],
            &["Mumbai", "Chennai"],
            6.0,
            50.0,
            70.0,
            0.9,
            420.0,
        ),
        sample_record(
            "jeans",
            "S2",
            &["Clothing"],
            &["Delhi", "Mumbai"],
            15.0,
            40.0,
            85.0,
            1.4,
            110.0,
        ),
        sample_record(
            "headphones",
            "S3",
            &["Electronics"],
            &["Mumbai"],
            18.0,
            65.0,
            50.0,
            0.6,
            260.0,
        ),
        sample_record(
            "t-shirt",
            "S3",
            &["Clothing"],
            &["Delhi"],
            11.0,
            55.0,
            45.0,
            0.7,
            190.0,
        ),
    ];

    Dataset::new(
        records,
        SAMPLE_CATEGORIES
            .iter()
            .map(|c| c.to_string())
            .collect::<BTreeSet<_>>(),
        SAMPLE_LOCATIONS
            .iter()
            .map(|l| l.to_string())
            .collect::<BTreeSet<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_schema_matches_its_records() {
        let data = sample_dataset();
        assert!(!data.is_empty());
        for record in &data.records {
            for category in record.category_flags.keys() {
                assert!(data.has_category(category));
            }
            for location in record.location_flags.keys() {
                assert!(data.has_location(location));
            }
        }
    }
}
