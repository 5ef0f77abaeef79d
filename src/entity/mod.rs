//! Geographic entity kinds
//!
//! Countries, states and cities are addressed by gateway-assigned ids.
//! Counties are addressed by their natural key (name + state code).

mod identity;
mod kind;
mod samples;

pub use identity::{is_valid_id, EntityKey, Identity, MIN_ID_LEN};
pub use kind::{
    EntityKind, AREA, CAPITAL, CODE, CONTINENT, COUNTRY_CODE, COUNTY_SEAT, FOUNDED, GDP,
    GOVERNOR, MAYOR, NAME, POPULATION, PRESIDENT, STATE, STATE_CODE,
};
pub use samples::sample;
