use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Dataset, ItemRecord, RecommendError};

/// Default number of recommendations returned by the ranking queries.
pub const DEFAULT_TOP_N: usize = 10;

/// Filter records down to one category.
///
/// An absent or empty category, or a category name the dataset's schema does
/// not define, leaves the input unchanged. This filter never fails: an
/// unknown category is deliberately a silent no-op, unlike the location
/// lookup below which reports unknown names to the caller.
pub fn filter_by_category<'a>(
    data: &Dataset,
    records: Vec<&'a ItemRecord>,
    category: Option<&str>,
) -> Vec<&'a ItemRecord> {
    match category {
        Some(cat) if !cat.is_empty() && data.has_category(cat) => records
            .into_iter()
            .filter(|r| r.in_category(cat))
            .collect(),
        _ => records,
    }
}

/// Top `top_n` items by profit margin, descending.
///
/// Serves both the "profitable" and "popular" recommendations; the source
/// system ranks both by profit margin (see DESIGN.md). Duplicate names are
/// kept when the same item qualifies through multiple rows.
pub fn profitable_items(data: &Dataset, top_n: usize, category: Option<&str>) -> Vec<String> {
    let subset = filter_by_category(data, data.records.iter().collect(), category);
    top_names_by(subset, top_n, true, |r| r.profit_margin)
}

/// Top 10 items for one shop by stock level, descending.
///
/// A shop id matching no records yields an empty list, not an error.
pub fn inventory_recommendation(
    data: &Dataset,
    shop_id: &str,
    category: Option<&str>,
) -> Vec<String> {
    let subset = filter_by_category(data, shop_records(data, shop_id), category);
    top_names_by(subset, DEFAULT_TOP_N, true, |r| r.stock_level)
}

/// Top 10 restock candidates for one shop: smallest stock-to-sales ratio
/// first, i.e. the fastest-turnover items.
pub fn stock_recommendation(data: &Dataset, shop_id: &str, category: Option<&str>) -> Vec<String> {
    let subset = filter_by_category(data, shop_records(data, shop_id), category);
    top_names_by(subset, DEFAULT_TOP_N, false, |r| r.stock_to_sales_ratio)
}

/// Top 10 best-selling items at a location, grouped by item name with sales
/// counts summed across rows.
///
/// Distinguishes three outcomes: an unknown location name is
/// `InvalidLocation`, a known location whose filtered subset is empty is
/// `NoItemsFound`, and anything else is the ranked list.
pub fn location_recommendation(
    data: &Dataset,
    location: &str,
    category: Option<&str>,
) -> Result<Vec<String>, RecommendError> {
    if !data.has_location(location) {
        return Err(RecommendError::InvalidLocation(location.to_string()));
    }

    let at_location = data
        .records
        .iter()
        .filter(|r| r.at_location(location))
        .collect();
    let subset = filter_by_category(data, at_location, category);
    if subset.is_empty() {
        return Err(RecommendError::NoItemsFound(location.to_string()));
    }

    // Group by item name, summing sales. Groups keep first-appearance order
    // so that equal sums rank deterministically.
    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in &subset {
        match index.get(r.item_name.as_str()) {
            Some(&i) => totals[i].1 += r.sales_count,
            None => {
                index.insert(r.item_name.as_str(), totals.len());
                totals.push((r.item_name.clone(), r.sales_count));
            }
        }
    }

    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(totals
        .into_iter()
        .take(DEFAULT_TOP_N)
        .map(|(name, _)| name)
        .collect())
}

/// Suggested price for an item, derived from the mean profit margin, demand
/// score and stock level of its matching rows.
///
/// `None` means no rows matched ("no data"), which callers must not conflate
/// with a real price of 0.0. When a category is given it is applied as a
/// direct flag check on each row, so an unknown category filters the subset
/// to empty rather than no-opping like `filter_by_category` does.
pub fn dynamic_price(data: &Dataset, item_name: &str, category: Option<&str>) -> Option<f64> {
    let mut subset: Vec<&ItemRecord> = data
        .records
        .iter()
        .filter(|r| r.item_name == item_name)
        .collect();
    if let Some(cat) = category.filter(|c| !c.is_empty()) {
        subset.retain(|r| r.in_category(cat));
    }
    if subset.is_empty() {
        return None;
    }

    let base_price = mean(&subset, |r| r.profit_margin) * 10.0;
    let demand_factor = mean(&subset, |r| r.demand_score) / 100.0;
    // Not clamped: a mean stock level above 100 pushes the factor negative.
    let stock_factor = 1.0 - mean(&subset, |r| r.stock_level) / 100.0;

    let price = base_price * (1.0 + demand_factor) * (1.0 + stock_factor);
    Some((price * 100.0).round() / 100.0)
}

fn shop_records<'a>(data: &'a Dataset, shop_id: &str) -> Vec<&'a ItemRecord> {
    data.records
        .iter()
        .filter(|r| r.shop_id == shop_id)
        .collect()
}

/// Stable ranking over a float key: ties keep dataset order, which is the
/// documented deterministic tie-break for every recommendation list.
fn top_names_by<F>(
    mut records: Vec<&ItemRecord>,
    top_n: usize,
    descending: bool,
    key: F,
) -> Vec<String>
where
    F: Fn(&ItemRecord) -> f64,
{
    records.sort_by(|a, b| {
        let ord = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    records
        .into_iter()
        .take(top_n)
        .map(|r| r.item_name.clone())
        .collect()
}

fn mean<F>(records: &[&ItemRecord], key: F) -> f64
where
    F: Fn(&ItemRecord) -> f64,
{
    records.iter().map(|r| key(r)).sum::<f64>() / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::collections::HashMap;

    struct Row {
        name: &'static str,
        shop: &'static str,
        categories: &'static [&'static str],
        locations: &'static [&'static str],
        profit: f64,
        demand: f64,
        stock: f64,
        ratio: f64,
        sales: f64,
    }

    impl Default for Row {
        fn default() -> Self {
            Self {
                name: "widget",
                shop: "S1",
                categories: &[],
                locations: &[],
                profit: 0.0,
                demand: 0.0,
                stock: 0.0,
                ratio: 1.0,
                sales: 0.0,
            }
        }
    }

    fn build_dataset(rows: Vec<Row>) -> Dataset {
        // Schema = union of all flag names seen, the way the loader derives
        // columns from CSV headers.
        let mut categories = BTreeSet::new();
        let mut locations = BTreeSet::new();
        let records = rows
            .into_iter()
            .map(|row| {
                let mut category_flags = HashMap::new();
                for c in row.categories {
                    categories.insert(c.to_string());
                    category_flags.insert(c.to_string(), true);
                }
                let mut location_flags = HashMap::new();
                for l in row.locations {
                    locations.insert(l.to_string());
                    location_flags.insert(l.to_string(), true);
                }
                ItemRecord {
                    item_name: row.name.to_string(),
                    shop_id: row.shop.to_string(),
                    category_flags,
                    location_flags,
                    profit_margin: row.profit,
                    demand_score: row.demand,
                    stock_level: row.stock,
                    stock_to_sales_ratio: row.ratio,
                    sales_count: row.sales,
                }
            })
            .collect();
        Dataset::new(records, categories, locations)
    }

    fn sample() -> Dataset {
        build_dataset(vec![
            Row {
                name: "soap",
                shop: "S1",
                categories: &["Grocery"],
                locations: &["Delhi"],
                profit: 8.0,
                demand: 40.0,
                stock: 70.0,
                ratio: 0.5,
                sales: 120.0,
            },
            Row {
                name: "phone",
                shop: "S1",
                categories: &["Electronics"],
                locations: &["Mumbai"],
                profit: 25.0,
                demand: 90.0,
                stock: 30.0,
                ratio: 0.2,
                sales: 60.0,
            },
            Row {
                name: "soap",
                shop: "S2",
                categories: &["Grocery"],
                locations: &["Delhi"],
                profit: 7.0,
                demand: 45.0,
                stock: 60.0,
                ratio: 0.4,
                sales: 80.0,
            },
            Row {
                name: "charger",
                shop: "S2",
                categories: &["Electronics"],
                locations: &["Delhi", "Mumbai"],
                profit: 12.0,
                demand: 55.0,
                stock: 90.0,
                ratio: 0.9,
                sales: 200.0,
            },
        ])
    }

    #[test]
    fn category_filter_is_identity_without_category() {
        let data = sample();
        let all: Vec<_> = data.records.iter().collect();
        assert_eq!(filter_by_category(&data, all.clone(), None).len(), 4);
        assert_eq!(filter_by_category(&data, all, Some("")).len(), 4);
    }

    #[test]
    fn unknown_category_is_a_silent_noop() {
        let data = sample();
        let all: Vec<_> = data.records.iter().collect();
        let filtered = filter_by_category(&data, all, Some("Toys"));
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn known_category_keeps_only_flagged_rows() {
        let data = sample();
        let all: Vec<_> = data.records.iter().collect();
        let filtered = filter_by_category(&data, all, Some("Electronics"));
        let names: Vec<_> = filtered.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["phone", "charger"]);
    }

    #[test]
    fn profitable_items_ranks_by_margin_descending() {
        let data = sample();
        assert_eq!(
            profitable_items(&data, 10, None),
            vec!["phone", "charger", "soap", "soap"]
        );
    }

    #[test]
    fn profitable_items_respects_top_n_bound() {
        let data = sample();
        assert_eq!(profitable_items(&data, 2, None), vec!["phone", "charger"]);
        assert!(profitable_items(&data, 0, None).is_empty());
    }

    #[test]
    fn profitable_items_applies_category_filter() {
        let data = sample();
        assert_eq!(
            profitable_items(&data, 10, Some("Grocery")),
            vec!["soap", "soap"]
        );
    }

    #[test]
    fn ranking_tie_break_preserves_dataset_order() {
        let data = build_dataset(vec![
            Row {
                name: "first",
                profit: 5.0,
                ..Default::default()
            },
            Row {
                name: "second",
                profit: 5.0,
                ..Default::default()
            },
            Row {
                name: "third",
                profit: 5.0,
                ..Default::default()
            },
        ]);
        assert_eq!(
            profitable_items(&data, 10, None),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn inventory_recommendation_filters_by_shop() {
        let data = sample();
        assert_eq!(
            inventory_recommendation(&data, "S2", None),
            vec!["charger", "soap"]
        );
        assert!(inventory_recommendation(&data, "S9", None).is_empty());
    }

    #[test]
    fn stock_recommendation_ranks_ascending_by_ratio() {
        let data = sample();
        // Smallest stock-to-sales ratio first: fastest turnover.
        assert_eq!(
            stock_recommendation(&data, "S1", None),
            vec!["phone", "soap"]
        );
    }

    #[test]
    fn location_recommendation_groups_and_sums_sales() {
        let data = build_dataset(vec![
            Row {
                name: "widget",
                locations: &["Delhi"],
                sales: 3.0,
                ..Default::default()
            },
            Row {
                name: "gadget",
                locations: &["Delhi"],
                sales: 7.0,
                ..Default::default()
            },
            Row {
                name: "widget",
                shop: "S2",
                locations: &["Delhi"],
                sales: 5.0,
                ..Default::default()
            },
        ]);
        // widget sums to 8 and outranks gadget's 7.
        assert_eq!(
            location_recommendation(&data, "Delhi", None).unwrap(),
            vec!["widget", "gadget"]
        );
    }

    #[test]
    fn equal_sales_sums_rank_by_first_appearance() {
        let data = build_dataset(vec![
            Row {
                name: "alpha",
                locations: &["Delhi"],
                sales: 4.0,
                ..Default::default()
            },
            Row {
                name: "beta",
                locations: &["Delhi"],
                sales: 6.0,
                ..Default::default()
            },
            Row {
                name: "alpha",
                shop: "S2",
                locations: &["Delhi"],
                sales: 2.0,
                ..Default::default()
            },
        ]);
        // Both sum to 6; alpha appears first in the filtered subset and
        // keeps that position through the stable sort.
        assert_eq!(
            location_recommendation(&data, "Delhi", None).unwrap(),
            vec!["alpha", "beta"]
        );
    }

    #[test]
    fn unknown_location_is_an_explicit_error() {
        let data = sample();
        assert_eq!(
            location_recommendation(&data, "Pluto", None),
            Err(RecommendError::InvalidLocation("Pluto".to_string()))
        );
    }

    #[test]
    fn empty_location_result_is_distinct_from_invalid() {
        let data = sample();
        // Mumbai exists but holds no Grocery rows.
        assert_eq!(
            location_recommendation(&data, "Mumbai", Some("Grocery")),
            Err(RecommendError::NoItemsFound("Mumbai".to_string()))
        );
    }

    #[test]
    fn dynamic_price_matches_worked_example() {
        let data = build_dataset(vec![Row {
            name: "lamp",
            profit: 5.0,
            demand: 50.0,
            stock: 20.0,
            ..Default::default()
        }]);
        // base 50, demand factor 0.5, stock factor 0.8 -> 50 * 1.5 * 1.8.
        assert_eq!(dynamic_price(&data, "lamp", None), Some(135.0));
    }

    #[test]
    fn dynamic_price_averages_across_matching_rows() {
        let data = build_dataset(vec![
            Row {
                name: "lamp",
                profit: 4.0,
                demand: 40.0,
                stock: 10.0,
                ..Default::default()
            },
            Row {
                name: "lamp",
                shop: "S2",
                profit: 6.0,
                demand: 60.0,
                stock: 30.0,
                ..Default::default()
            },
        ]);
        // Means are 5, 50, 20: same as the single-row worked example.
        assert_eq!(dynamic_price(&data, "lamp", None), Some(135.0));
    }

    #[test]
    fn dynamic_price_absent_item_is_no_data() {
        let data = sample();
        assert_eq!(dynamic_price(&data, "ghost", None), None);
    }

    #[test]
    fn dynamic_price_category_subfilter_is_strict() {
        let data = sample();
        // "soap" exists, but not under Electronics; unlike the category
        // filter this path does not no-op on a non-matching category.
        assert_eq!(dynamic_price(&data, "soap", Some("Electronics")), None);
        assert_eq!(dynamic_price(&data, "soap", Some("NoSuchCategory")), None);
    }

    #[test]
    fn dynamic_price_stock_factor_not_clamped() {
        let data = build_dataset(vec![Row {
            name: "overstocked",
            profit: 10.0,
            demand: 0.0,
            stock: 150.0,
            ..Default::default()
        }]);
        // stock factor = 1 - 1.5 = -0.5 -> 100 * 1.0 * 0.5.
        assert_eq!(dynamic_price(&data, "overstocked", None), Some(50.0));
    }

    #[test]
    fn queries_are_idempotent() {
        let data = sample();
        let first = location_recommendation(&data, "Delhi", None).unwrap();
        let second = location_recommendation(&data, "Delhi", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            profitable_items(&data, 3, None),
            profitable_items(&data, 3, None)
        );
    }
}
