use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One row of the source dataset: one item's attributes at one shop.
///
/// Item names are normalized (trimmed, lowercased) once by the loader and are
/// not unique; the same item may appear in multiple shops and locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_name: String,
    pub shop_id: String,
    /// Dynamic membership flags keyed by category name.
    pub category_flags: HashMap<String, bool>,
    /// Dynamic availability flags keyed by location name.
    pub location_flags: HashMap<String, bool>,
    pub profit_margin: f64,
    pub demand_score: f64,
    pub stock_level: f64,
    pub stock_to_sales_ratio: f64,
    pub sales_count: f64,
}

impl ItemRecord {
    pub fn in_category(&self, category: &str) -> bool {
        self.category_flags.get(category).copied().unwrap_or(false)
    }

    pub fn at_location(&self, location: &str) -> bool {
        self.location_flags.get(location).copied().unwrap_or(false)
    }
}

/// The in-memory dataset: an ordered sequence of records plus the category
/// and location column names the source schema defined.
///
/// The schema sets are kept separately from the rows so that "does this
/// column exist" checks do not depend on any particular record, mirroring a
/// column-oriented source table. Built once at startup, never mutated; every
/// query borrows it read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<ItemRecord>,
    pub categories: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

impl Dataset {
    pub fn new(
        records: Vec<ItemRecord>,
        categories: BTreeSet<String>,
        locations: BTreeSet<String>,
    ) -> Self {
        Self {
            records,
            categories,
            locations,
        }
    }

    /// True if the named category column exists in the source schema.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains(name)
    }

    /// True if the named location column exists in the source schema.
    pub fn has_location(&self, name: &str) -> bool {
        self.locations.contains(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
