//! Sample records used to seed an empty database

use serde_json::{json, Value};

use super::kind::EntityKind;

/// One valid sample record per entity kind
pub fn sample(kind: EntityKind) -> Value {
    match kind {
        EntityKind::Country => json!({
            "name": "United States of America",
            "population": 340000000,
            "continent": "North America",
            "capital": "Washington DC",
            "gdp": "29.18 trillion USD",
            "area": "3,810,000 sq mi",
            "founded": "1776",
            "president": "Donald Trump"
        }),
        EntityKind::State => json!({
            "name": "New York",
            "population": 19870000,
            "capital": "Albany",
            "governor": "Kathy Hochul",
            "country_code": "US",
            "code": "NY"
        }),
        EntityKind::County => json!({
            "name": "Los Angeles County",
            "population": 10000000,
            "state": "California",
            "area": "4,751 sq mi",
            "founded": "1850",
            "county_seat": "Los Angeles",
            "state_code": "CA"
        }),
        EntityKind::City => json!({
            "name": "New York City",
            "population": 8478000,
            "state": "New York",
            "area": "469 sq mi",
            "founded": "1624",
            "mayor": "Eric Adams"
        }),
    }
}
