//! The four geographic entity kinds and their schemas

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::schema::{EntitySchema, FieldDef, FieldType};

use super::identity::Identity;

pub const NAME: &str = "name";
pub const POPULATION: &str = "population";
pub const CONTINENT: &str = "continent";
pub const CAPITAL: &str = "capital";
pub const GDP: &str = "gdp";
pub const AREA: &str = "area";
pub const FOUNDED: &str = "founded";
pub const PRESIDENT: &str = "president";
pub const COUNTRY_CODE: &str = "country_code";
pub const GOVERNOR: &str = "governor";
pub const CODE: &str = "code";
pub const STATE: &str = "state";
pub const COUNTY_SEAT: &str = "county_seat";
pub const STATE_CODE: &str = "state_code";
pub const MAYOR: &str = "mayor";

/// Natural key of a county: state code, then name
const COUNTY_KEY: &[&str] = &[STATE_CODE, NAME];

/// Entity kinds served by this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Country,
    State,
    County,
    City,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Country,
        EntityKind::State,
        EntityKind::County,
        EntityKind::City,
    ];

    /// Database collection name, also the HTTP path segment
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Country => "countries",
            EntityKind::State => "states",
            EntityKind::County => "counties",
            EntityKind::City => "cities",
        }
    }

    /// Lower-case singular name
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::State => "state",
            EntityKind::County => "county",
            EntityKind::City => "city",
        }
    }

    /// Capitalized singular name for user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Country => "Country",
            EntityKind::State => "State",
            EntityKind::County => "County",
            EntityKind::City => "City",
        }
    }

    pub fn identity(&self) -> Identity {
        match self {
            EntityKind::County => Identity::NaturalKey(COUNTY_KEY),
            _ => Identity::OpaqueId,
        }
    }

    /// Looks up a kind by its collection name
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.collection() == collection)
    }

    /// Declarative schema; field order is validation order.
    pub fn schema(&self) -> EntitySchema {
        use FieldType::{Int, Measurement, String as Text};

        let fields = match self {
            EntityKind::Country => vec![
                FieldDef::required(NAME, Text),
                FieldDef::required(POPULATION, Int),
                FieldDef::required(CONTINENT, Text),
                FieldDef::required(CAPITAL, Text),
                FieldDef::required(GDP, Measurement),
                FieldDef::required(AREA, Measurement),
                FieldDef::required(FOUNDED, Measurement),
                FieldDef::required(PRESIDENT, Text),
            ],
            EntityKind::State => vec![
                FieldDef::required(NAME, Text),
                FieldDef::required(CAPITAL, Text),
                FieldDef::required(POPULATION, Int),
                FieldDef::required(COUNTRY_CODE, Text),
                FieldDef::optional(GOVERNOR, Text),
                FieldDef::optional(CODE, Text),
            ],
            EntityKind::County => vec![
                FieldDef::required(NAME, Text),
                FieldDef::required(POPULATION, Int),
                FieldDef::required(STATE, Text),
                FieldDef::required(AREA, Measurement),
                FieldDef::required(FOUNDED, Measurement),
                FieldDef::required(COUNTY_SEAT, Text),
                // part of the natural key, so it must be present
                FieldDef::required(STATE_CODE, Text),
            ],
            EntityKind::City => vec![
                FieldDef::required(NAME, Text),
                FieldDef::optional(POPULATION, Int),
                FieldDef::optional(STATE, Text),
                FieldDef::optional(AREA, Measurement),
                FieldDef::optional(FOUNDED, Measurement),
                FieldDef::optional(MAYOR, Text),
            ],
        };

        EntitySchema::new(self.name(), fields)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.collection() == s || k.name() == s)
            .ok_or_else(|| format!("unknown entity kind '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(EntityKind::from_collection("planets"), None);
    }

    #[test]
    fn test_from_str_accepts_singular_and_plural() {
        assert_eq!("county".parse::<EntityKind>().unwrap(), EntityKind::County);
        assert_eq!("counties".parse::<EntityKind>().unwrap(), EntityKind::County);
        assert!("planet".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_country_schema_order() {
        let schema = EntityKind::Country.schema();
        let required: Vec<_> = schema.required_fields().collect();
        assert_eq!(
            required,
            vec![NAME, POPULATION, CONTINENT, CAPITAL, GDP, AREA, FOUNDED, PRESIDENT]
        );
    }

    #[test]
    fn test_city_requires_only_name() {
        let schema = EntityKind::City.schema();
        let required: Vec<_> = schema.required_fields().collect();
        assert_eq!(required, vec![NAME]);
    }

    #[test]
    fn test_natural_key_fields_are_required() {
        for kind in EntityKind::ALL {
            let schema = kind.schema();
            for field in kind.identity().key_fields() {
                assert!(schema.field(field).map(|f| f.required).unwrap_or(false));
            }
        }
    }
}
