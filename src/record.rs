//! Normalized listing records and exact-duplicate elimination
//!
//! An [`AdRecord`] is the fixed ten-field output row of the harvest. Two
//! records are duplicates only when every field matches; dedup keeps the
//! first occurrence.

use std::collections::HashSet;

/// Column headers in output order
pub const CSV_HEADERS: [&str; 10] = [
    "post_date",
    "production_year",
    "origin",
    "location",
    "body_type",
    "odometer",
    "transmission",
    "condition",
    "fuel",
    "price",
];

/// One normalized listing record
///
/// All text fields default to empty when the source attribute is absent;
/// `price` defaults to 0 like the gateway reports for price-on-request ads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdRecord {
    /// Date the ad was posted, `YYYY-MM-DD` (empty when unknown)
    pub post_date: String,

    /// Production year of the vehicle
    pub production_year: String,

    /// Country of origin
    pub origin: String,

    /// Seller location
    pub location: String,

    /// Body type (sedan, SUV, ...)
    pub body_type: String,

    /// Odometer reading
    pub odometer: String,

    /// Transmission type
    pub transmission: String,

    /// Listed condition (new/used)
    pub condition: String,

    /// Fuel type
    pub fuel: String,

    /// Asking price
    pub price: i64,
}

impl AdRecord {
    /// Whether the record carries enough signal to be worth keeping
    ///
    /// A record with neither a production year nor a fuel type is treated
    /// as an incomplete response and the fetch is retried.
    pub fn has_signal(&self) -> bool {
        !self.production_year.is_empty() || !self.fuel.is_empty()
    }

    /// Renders the record as its ten column values in header order
    pub fn to_fields(&self) -> [String; 10] {
        [
            self.post_date.clone(),
            self.production_year.clone(),
            self.origin.clone(),
            self.location.clone(),
            self.body_type.clone(),
            self.odometer.clone(),
            self.transmission.clone(),
            self.condition.clone(),
            self.fuel.clone(),
            self.price.to_string(),
        ]
    }
}

/// Removes records that are identical across every field
///
/// Keeps the first occurrence of each distinct record, preserving the
/// original ordering of survivors. Records differing in any single field
/// are retained as distinct.
///
/// # Arguments
///
/// * `records` - The accumulated result set, in fetch order
///
/// # Returns
///
/// The deduplicated sequence
pub fn dedupe_records(records: Vec<AdRecord>) -> Vec<AdRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(record.clone()) {
            unique.push(record);
        }
    }

    unique
}
